use thiserror::Error;

/// Top-level error type for the `ncx-api` crate.
///
/// Covers transport-level failures of both API surfaces (NCM v2 and the
/// NCX exchange endpoints on v3). Non-2xx replies from the exchange API are
/// *not* errors here: they are handed back as raw text so the caller can
/// classify them (see `NcxClient`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials were rejected or could not be turned into headers.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success reply from the NCM v2 API.
    #[error("NCM API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = Error::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "NCM API error (HTTP 500): boom");
    }

    #[test]
    fn timeout_display() {
        let err = Error::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }
}
