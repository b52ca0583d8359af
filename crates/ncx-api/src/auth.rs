use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// JSON:API media type used by the v3 exchange endpoints.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// The four key pairs the NCM v2 API expects on every request.
///
/// `X-CP-*` identifies the application, `X-ECM-*` the account.
#[derive(Debug, Clone)]
pub struct NcmApiKeys {
    pub cp_api_id: SecretString,
    pub cp_api_key: SecretString,
    pub ecm_api_id: SecretString,
    pub ecm_api_key: SecretString,
}

impl NcmApiKeys {
    /// Render the keys as default request headers (marked sensitive).
    pub fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, secret) in [
            ("x-cp-api-id", &self.cp_api_id),
            ("x-cp-api-key", &self.cp_api_key),
            ("x-ecm-api-id", &self.ecm_api_id),
            ("x-ecm-api-key", &self.ecm_api_key),
        ] {
            headers.insert(HeaderName::from_static(name), sensitive(name, secret)?);
        }
        Ok(headers)
    }
}

/// Default headers for the v3 exchange API: bearer token + JSON:API accept.
pub fn bearer_headers(token: &SecretString) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
    let bearer = SecretString::from(format!("Bearer {}", token.expose_secret()));
    headers.insert(AUTHORIZATION, sensitive("Authorization", &bearer)?);
    Ok(headers)
}

fn sensitive(name: &str, secret: &SecretString) -> Result<HeaderValue, Error> {
    let mut value =
        HeaderValue::from_str(secret.expose_secret()).map_err(|e| Error::Authentication {
            message: format!("invalid {name} header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys() -> NcmApiKeys {
        NcmApiKeys {
            cp_api_id: "cp-id".to_string().into(),
            cp_api_key: "cp-key".to_string().into(),
            ecm_api_id: "ecm-id".to_string().into(),
            ecm_api_key: "ecm-key".to_string().into(),
        }
    }

    #[test]
    fn ncm_headers_are_sensitive() {
        let headers = keys().headers().unwrap();
        let id = headers.get("x-cp-api-id").unwrap();
        assert_eq!(id.to_str().unwrap(), "cp-id");
        assert!(id.is_sensitive());
        assert_eq!(headers.get("X-ECM-API-KEY").unwrap(), "ecm-key");
    }

    #[test]
    fn bearer_header_carries_token() {
        let headers = bearer_headers(&"tok".to_string().into()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert_eq!(headers.get(ACCEPT).unwrap(), JSON_API_MEDIA_TYPE);
    }

    #[test]
    fn newline_in_key_is_rejected() {
        let mut bad = keys();
        bad.cp_api_key = "line\nbreak".to_string().into();
        assert!(matches!(bad.headers(), Err(Error::Authentication { .. })));
    }
}
