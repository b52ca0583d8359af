// NCX exchange API client (NCM v3, `/beta/exchange_*`)
//
// Bearer-token auth, JSON:API bodies. Replies are returned untyped: the
// exchange endpoints answer with objects, bare maps, or plain error text
// depending on outcome, and interpreting that shape is the caller's job.

pub mod client;
pub mod models;

pub use client::NcxClient;
pub use models::ResourceTarget;
