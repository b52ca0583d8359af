// ncx-api: Async Rust clients for the NCM device API (v2) and the NCX exchange API (v3)

pub mod auth;
pub mod error;
pub mod ncm;
pub mod ncx;
pub mod transport;

pub use auth::NcmApiKeys;
pub use error::Error;
pub use ncm::{Group, Lan, NcmClient, Router};
pub use ncx::{NcxClient, ResourceTarget};
pub use transport::TransportConfig;
