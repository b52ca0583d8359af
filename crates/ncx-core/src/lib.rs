//! Resolution and reconciliation engine behind the `ncx` provisioning tool.
//!
//! Input rows become [`WorkItem`]s ([`loader`]); each item resolves to
//! routers through a [`DeviceDirectory`], each router to a validated exchange
//! [`Site`] through an [`ExchangeDirectory`] ([`resolve`]); the pipeline's
//! resources are derived ([`build`]), submitted, and the loosely typed reply
//! is classified by [`classify_submission`] ([`reconcile`]).
//!
//! [`Provisioner`] drives a whole batch strictly in order and reports every
//! step as a [`RunEvent`]. Per-item problems are [`ItemFailure`]s and never
//! abort the run; only a [`LoadError`] stops it, before any remote call.

pub mod build;
pub mod convert;
pub mod directory;
pub mod error;
pub mod event;
pub mod loader;
pub mod model;
pub mod network;
pub mod pipeline;
pub mod reconcile;
pub mod resolve;

// ── Primary re-exports ──────────────────────────────────────────────
pub use directory::{DeviceDirectory, ExchangeDirectory};
pub use error::{ItemFailure, LoadError};
pub use event::{EventSink, RunEvent};
pub use loader::{LoadedConfig, load_work_items, parse_work_items};
pub use model::{
    Device, ItemPayload, Pipeline, ResourceSpec, Site, TargetMode, TargetSelector, WorkItem,
};
pub use network::IpNetwork;
pub use pipeline::{Provisioner, RunSummary};
pub use reconcile::{Rejection, SubmissionOutcome, classify_submission};
pub use resolve::SiteRejection;
