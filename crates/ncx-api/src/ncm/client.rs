// NCM v2 HTTP client
//
// Wraps `reqwest::Client` with NCM-specific URL construction, list-envelope
// unwrapping, and `meta.next` pagination. Endpoint methods live in
// `routers.rs` to keep this module focused on transport mechanics.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::NcmApiKeys;
use crate::error::Error;
use crate::ncm::models::Page;
use crate::transport::TransportConfig;

/// Upper bound on followed `next` links; a server that keeps handing out
/// pages past this is looping.
const MAX_PAGES: usize = 10_000;

/// Raw HTTP client for the NCM v2 API.
///
/// All list methods return the concatenated `data` payloads of every page.
pub struct NcmClient {
    http: reqwest::Client,
    base_url: Url,
    transport: TransportConfig,
}

impl NcmClient {
    /// Create a client that sends the four NCM key headers on every request.
    ///
    /// `base_url` is the API root, e.g. `https://www.cradlepointecm.com/api/v2`.
    pub fn new(base_url: Url, keys: &NcmApiKeys, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(keys.headers()?)?;
        Ok(Self {
            http,
            base_url,
            transport: transport.clone(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client` (caller manages headers).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            transport: TransportConfig::default(),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}/`. NCM v2 collection paths end in a slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the decoded JSON body.
    pub(crate) async fn get_json(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// GET a list endpoint and follow `meta.next` until exhausted.
    pub(crate) async fn get_all<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            pages += 1;
            let body = self.get_json(url.clone()).await?;
            let page: Page<T> =
                serde_json::from_value(body.clone()).map_err(|e| Error::Deserialization {
                    message: e.to_string(),
                    body: body.to_string(),
                })?;
            trace!(count = page.data.len(), page = pages, "received page");
            items.extend(page.data);

            if let Some(link) = page.meta.and_then(|m| m.next) {
                let link = Url::parse(&link)?;
                if link != url && pages < MAX_PAGES {
                    next = Some(link);
                }
            }
        }

        Ok(items)
    }
}

/// First 200 characters of a response body, cut on a char boundary.
pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> NcmClient {
        NcmClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_appends_trailing_slash() {
        let c = client("https://ncm.example/api/v2");
        let url = c.endpoint(&["routers", "42", "lans"]).unwrap();
        assert_eq!(url.as_str(), "https://ncm.example/api/v2/routers/42/lans/");
    }

    #[test]
    fn endpoint_tolerates_base_with_slash() {
        let c = client("https://ncm.example/api/v2/");
        let url = c.endpoint(&["routers"]).unwrap();
        assert_eq!(url.as_str(), "https://ncm.example/api/v2/routers/");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(300);
        assert_eq!(preview(&body).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
