// NCM v2 API client
//
// Device-management surface: routers, groups, and per-router LAN listings.
// Authenticated with the four `X-CP-*` / `X-ECM-*` key headers.

pub mod client;
pub mod models;
pub mod routers;

pub use client::NcmClient;
pub use models::{Group, Lan, Router};
