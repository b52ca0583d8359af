//! Settings and credentials for the `ncx` provisioning tool.
//!
//! Endpoint URLs and the request timeout come from serialized defaults, an
//! optional TOML file, then `NCX_*` environment variables. The five API
//! credentials come from the process environment only and are all required.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use ncx_api::{NcmApiKeys, NcmClient, NcxClient, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required environment variables: {}", missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to build API client: {0}")]
    Client(#[from] ncx_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Non-secret runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// NCM v2 device API root.
    #[serde(default = "default_ncm_base_url")]
    pub ncm_base_url: String,

    /// NCM v3 root hosting the `/beta/exchange_*` endpoints.
    #[serde(default = "default_ncx_base_url")]
    pub ncx_base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ncm_base_url: default_ncm_base_url(),
            ncx_base_url: default_ncx_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_ncm_base_url() -> String {
    "https://www.cradlepointecm.com/api/v2".into()
}
fn default_ncx_base_url() -> String {
    "https://api.cradlepointecm.com/api/v3".into()
}
fn default_timeout() -> u64 {
    30
}

impl Settings {
    pub fn ncm_url(&self) -> Result<Url, ConfigError> {
        parse_url("ncm_base_url", &self.ncm_base_url)
    }

    pub fn ncx_url(&self) -> Result<Url, ConfigError> {
        parse_url("ncx_base_url", &self.ncx_base_url)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

// ── Settings file path ──────────────────────────────────────────────

/// Platform config path (`~/.config/ncx/config.toml` on Linux).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ncx", "ncx").map_or_else(
        || PathBuf::from(".ncx").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// `NCX_CONFIG` when set, else [`config_path`].
pub fn settings_path() -> PathBuf {
    std::env::var_os("NCX_CONFIG").map_or_else(config_path, PathBuf::from)
}

// ── Settings loading ────────────────────────────────────────────────

/// Load settings from the default file location and environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&settings_path())
}

/// Defaults, then `path` if it exists, then `NCX_*` variables.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NCX_").only(&["ncm_base_url", "ncx_base_url", "timeout_secs"]))
        .extract()?;
    if settings.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "timeout_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(settings)
}

// ── Credentials ─────────────────────────────────────────────────────

/// Bearer token for the v3 exchange API.
pub const TOKEN_VAR: &str = "TOKEN";
/// Read when `TOKEN` is unset or empty.
pub const TOKEN_FALLBACK_VAR: &str = "NCM_API_TOKEN";

/// Every secret the tool needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub ncm: NcmApiKeys,
    pub token: SecretString,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve through `lookup`; empty values count as missing. All missing
    /// names are reported together.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut missing = Vec::new();
        let mut take = |name: &'static str| {
            let value = read(name);
            if value.is_none() {
                missing.push(name);
            }
            value.map(SecretString::from)
        };
        let ecm_api_id = take("X_ECM_API_ID");
        let ecm_api_key = take("X_ECM_API_KEY");
        let cp_api_id = take("X_CP_API_ID");
        let cp_api_key = take("X_CP_API_KEY");
        let token = read(TOKEN_VAR)
            .or_else(|| read(TOKEN_FALLBACK_VAR))
            .map(SecretString::from);
        if token.is_none() {
            missing.push(TOKEN_VAR);
        }

        match (ecm_api_id, ecm_api_key, cp_api_id, cp_api_key, token) {
            (Some(ecm_api_id), Some(ecm_api_key), Some(cp_api_id), Some(cp_api_key), Some(token)) => {
                Ok(Self {
                    ncm: NcmApiKeys {
                        cp_api_id,
                        cp_api_key,
                        ecm_api_id,
                        ecm_api_key,
                    },
                    token,
                })
            }
            _ => Err(ConfigError::MissingCredentials { missing }),
        }
    }
}

// ── Client construction ─────────────────────────────────────────────

/// Build both API clients from explicit settings and credentials.
pub fn build_clients(
    settings: &Settings,
    credentials: &Credentials,
) -> Result<(NcmClient, NcxClient), ConfigError> {
    let transport = settings.transport();
    let ncm = NcmClient::new(settings.ncm_url()?, &credentials.ncm, &transport)?;
    let ncx = NcxClient::new(settings.ncx_url()?, &credentials.token, &transport)?;
    Ok((ncm, ncx))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const ALL: [(&str, &str); 5] = [
        ("X_ECM_API_ID", "ecm-id"),
        ("X_ECM_API_KEY", "ecm-key"),
        ("X_CP_API_ID", "cp-id"),
        ("X_CP_API_KEY", "cp-key"),
        ("TOKEN", "tok"),
    ];

    #[test]
    fn all_credentials_present() {
        let creds = Credentials::from_lookup(lookup(&ALL)).unwrap();
        assert_eq!(creds.ncm.cp_api_key.expose_secret(), "cp-key");
        assert_eq!(creds.token.expose_secret(), "tok");
    }

    #[test]
    fn token_falls_back_to_ncm_api_token() {
        let mut vars = ALL[..4].to_vec();
        vars.push(("TOKEN", ""));
        vars.push(("NCM_API_TOKEN", "fallback"));
        let creds = Credentials::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(creds.token.expose_secret(), "fallback");
    }

    #[test]
    fn every_missing_name_is_reported() {
        let err = Credentials::from_lookup(lookup(&[("X_CP_API_ID", "id"), ("X_ECM_API_KEY", " ")]))
            .unwrap_err();
        match err {
            ConfigError::MissingCredentials { missing } => {
                assert_eq!(missing, ["X_ECM_API_ID", "X_ECM_API_KEY", "X_CP_API_KEY", "TOKEN"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_credentials_message_lists_names() {
        let err = ConfigError::MissingCredentials {
            missing: vec!["X_CP_API_ID", "TOKEN"],
        };
        assert_eq!(
            err.to_string(),
            "missing required environment variables: X_CP_API_ID, TOKEN"
        );
    }

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|jail| {
            let settings = load_settings_from(&jail.directory().join("absent.toml")).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.transport().timeout, Duration::from_secs(30));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "ncx.toml",
                r#"
                    ncm_base_url = "http://localhost:8080/api/v2"
                    timeout_secs = 5
                "#,
            )?;
            jail.set_env("NCX_TIMEOUT_SECS", "12");

            let settings = load_settings_from(&jail.directory().join("ncx.toml")).unwrap();
            assert_eq!(settings.ncm_base_url, "http://localhost:8080/api/v2");
            assert_eq!(settings.ncx_base_url, default_ncx_base_url());
            assert_eq!(settings.timeout_secs, 12);
            Ok(())
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("NCX_TIMEOUT_SECS", "0");
            let err = load_settings_from(&jail.directory().join("absent.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { .. }), "{err}");
            Ok(())
        });
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let settings = Settings {
            ncm_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.ncm_url(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn builds_clients_from_settings() {
        let creds = Credentials::from_lookup(lookup(&ALL)).unwrap();
        let (ncm, ncx) = build_clients(&Settings::default(), &creds).unwrap();
        assert_eq!(ncm.base_url().as_str(), "https://www.cradlepointecm.com/api/v2");
        assert_eq!(ncx.base_url().as_str(), "https://api.cradlepointecm.com/api/v3");
    }
}
