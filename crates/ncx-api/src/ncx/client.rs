// NCX exchange HTTP client
//
// Unlike the NCM client, HTTP error statuses are not mapped to `Error`:
// the exchange API reports conflicts (e.g. overlapping resources) and
// licensing problems through the response body, so non-2xx bodies are
// handed back verbatim as a JSON string value. Only transport failures
// surface as `Err`.

use reqwest::header::CONTENT_TYPE;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{JSON_API_MEDIA_TYPE, bearer_headers};
use crate::error::Error;
use crate::ncx::models::{ResourceTarget, resource_body, site_body};
use crate::transport::TransportConfig;

/// Async client for the NCX exchange endpoints.
pub struct NcxClient {
    http: reqwest::Client,
    base_url: Url,
    transport: TransportConfig,
}

impl NcxClient {
    /// Build from a bearer token. `base_url` is the v3 root,
    /// e.g. `https://api.cradlepointecm.com/api/v3`.
    pub fn new(base_url: Url, token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client_with_headers(bearer_headers(token)?)?;
        Ok(Self {
            http,
            base_url,
            transport: transport.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, collection: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(["beta", collection]);
        Ok(url)
    }

    // ── Sites ────────────────────────────────────────────────────────

    /// Look up exchange sites by exact name.
    ///
    /// `GET /beta/exchange_sites?filter[name]={name}`
    ///
    /// Returns the `data` entries on success. An error reply becomes a
    /// single string entry holding the response text.
    pub async fn get_exchange_sites(&self, name: &str) -> Result<Vec<Value>, Error> {
        let mut url = self.endpoint("exchange_sites")?;
        url.query_pairs_mut().append_pair("filter[name]", name);
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            warn!(%status, "site lookup rejected");
            return Ok(vec![Value::String(text)]);
        }

        Ok(match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(mut map)) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) => Vec::new(),
                Some(single) => vec![single],
                None => vec![Value::Object(map)],
            },
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => vec![other],
            Err(_) => vec![Value::String(text)],
        })
    }

    /// Create an exchange site for a router in an exchange network.
    ///
    /// `POST /beta/exchange_sites`
    pub async fn create_exchange_site(
        &self,
        name: &str,
        network_id: &str,
        router_id: &str,
    ) -> Result<Value, Error> {
        let url = self.endpoint("exchange_sites")?;
        debug!(name, network_id, router_id, "creating exchange site");
        self.submit(url, &site_body(name, network_id, router_id)).await
    }

    /// Create a resource attached to an exchange site.
    ///
    /// `POST /beta/exchange_resources`
    pub async fn create_exchange_resource(
        &self,
        site_id: &str,
        name: &str,
        target: &ResourceTarget,
    ) -> Result<Value, Error> {
        let url = self.endpoint("exchange_resources")?;
        debug!(
            site_id,
            name,
            resource_type = target.resource_type(),
            "creating exchange resource"
        );
        self.submit(url, &resource_body(site_id, name, target)).await
    }

    /// POST a JSON:API document and return the reply as untyped JSON.
    ///
    /// 2xx: decoded JSON (`Null` for an empty body, a string for non-JSON
    /// text). Anything else: the raw body text as a string.
    async fn submit(&self, url: Url, body: &Value) -> Result<Value, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_API_MEDIA_TYPE)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| self.transport.send_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            warn!(%status, "exchange API rejected request");
            return Ok(Value::String(text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
