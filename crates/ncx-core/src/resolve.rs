// ── Target and site resolution ──
//
// Work item → devices, then device → validated exchange site. A site is
// only ever accepted for a device listed among its endpoints; a name match
// bound to another router is rejected, never substituted.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use ncx_api::ncm::models::scalar_text;

use crate::directory::{DeviceDirectory, ExchangeDirectory};
use crate::error::ItemFailure;
use crate::model::{Device, Site, TargetSelector};
use crate::reconcile::{EXCERPT_LIMIT, excerpt, shape_name, value_excerpt};

/// Longest excerpt of a site's `relationships` object in diagnostics.
pub const RELATIONSHIPS_EXCERPT_LIMIT: usize = 250;

/// Why a site lookup did not yield a usable site for a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteRejection {
    #[error("site not found: no site returned for name '{name}'")]
    NotFound { name: String },

    #[error("site lookup for '{name}' returned an unexpected {shape} instead of site data: {detail}")]
    UnexpectedShape {
        name: String,
        shape: &'static str,
        detail: String,
    },

    #[error("site '{name}' has no readable endpoint relationships: {detail}")]
    MalformedRelationships { name: String, detail: String },

    #[error("site '{name}' does not match router: site endpoint {site_endpoint} != router {device_id}")]
    EndpointMismatch {
        name: String,
        site_endpoint: String,
        device_id: String,
    },
}

impl SiteRejection {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Devices matching `selector`. An empty match is a per-item failure.
pub async fn resolve_targets<D: DeviceDirectory>(
    devices: &D,
    selector: &TargetSelector,
) -> Result<Vec<Device>, ItemFailure> {
    let found = devices
        .find_devices(selector)
        .await
        .map_err(|e| ItemFailure::remote("router lookup", &e))?;
    debug!(%selector, count = found.len(), "resolved targets");
    if found.is_empty() {
        return Err(ItemFailure::NoTargets {
            target: selector.clone(),
        });
    }
    Ok(found)
}

/// Look up the site for `device` by `site_override`, or the device name,
/// and check it is bound to the device.
pub async fn resolve_site<X: ExchangeDirectory>(
    exchange: &X,
    device: &Device,
    site_override: Option<&str>,
) -> Result<Site, ItemFailure> {
    let name = site_override.unwrap_or(&device.name).trim();
    if name.is_empty() {
        return Err(SiteRejection::NotFound {
            name: String::new(),
        }
        .into());
    }
    let entries = exchange
        .find_sites(name)
        .await
        .map_err(|e| ItemFailure::remote("site lookup", &e))?;
    validate_site(&entries, name, device).map_err(ItemFailure::from)
}

/// Validate the first entry of a site lookup against `device`.
pub fn validate_site(entries: &[Value], name: &str, device: &Device) -> Result<Site, SiteRejection> {
    let Some(first) = entries.first() else {
        return Err(SiteRejection::NotFound {
            name: name.to_owned(),
        });
    };

    let object = match first {
        Value::Object(map) => map,
        Value::String(text) => {
            return Err(SiteRejection::UnexpectedShape {
                name: name.to_owned(),
                shape: "string",
                detail: excerpt(text, EXCERPT_LIMIT),
            });
        }
        other => {
            return Err(SiteRejection::UnexpectedShape {
                name: name.to_owned(),
                shape: shape_name(other),
                detail: value_excerpt(other, EXCERPT_LIMIT),
            });
        }
    };

    let Some(id) = object.get("id").and_then(scalar_text) else {
        return Err(SiteRejection::UnexpectedShape {
            name: name.to_owned(),
            shape: "object",
            detail: format!("no site id ({})", value_excerpt(first, EXCERPT_LIMIT)),
        });
    };

    let relationships = object.get("relationships");
    let Some(endpoints) = relationships.and_then(endpoint_ids) else {
        let detail = relationships.map_or_else(
            || "(no relationships)".to_owned(),
            |rel| value_excerpt(rel, RELATIONSHIPS_EXCERPT_LIMIT),
        );
        return Err(SiteRejection::MalformedRelationships {
            name: name.to_owned(),
            detail,
        });
    };

    let site = Site {
        display_name: site_display_name(first).unwrap_or_else(|| id.clone()),
        id,
        associated_device_ids: endpoints,
    };
    if !site.is_associated_with(device) {
        return Err(SiteRejection::EndpointMismatch {
            name: name.to_owned(),
            site_endpoint: site
                .associated_device_ids
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
            device_id: device.id.clone(),
        });
    }
    Ok(site)
}

/// `relationships.endpoints.data[*].id`; `data` may be a list or a single
/// object. `None` unless at least one id is present and all are readable.
fn endpoint_ids(relationships: &Value) -> Option<BTreeSet<String>> {
    let data = relationships.get("endpoints")?.get("data")?;
    let entries = match data {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        Value::Object(_) => vec![data],
        _ => return None,
    };
    if entries.is_empty() {
        return None;
    }
    entries
        .into_iter()
        .map(|entry| entry.get("id").and_then(scalar_text))
        .collect()
}

fn site_display_name(site: &Value) -> Option<String> {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    non_empty(site.get("attributes").and_then(|a| a.get("name")))
        .or_else(|| non_empty(site.get("name")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn device() -> Device {
        Device::new("111", "Branch 1")
    }

    fn site(id: Value, endpoint: Value) -> Value {
        json!({
            "id": id,
            "type": "exchange_sites",
            "attributes": {"name": "Alpha"},
            "relationships": {"endpoints": {"data": [{"id": endpoint, "type": "endpoints"}]}}
        })
    }

    #[test]
    fn accepts_site_bound_to_device() {
        let got = validate_site(&[site(json!("s-1"), json!("111"))], "Alpha", &device()).unwrap();
        assert_eq!(got.id, "s-1");
        assert_eq!(got.display_name, "Alpha");
        assert!(got.is_associated_with(&device()));
    }

    #[test]
    fn numeric_ids_compare_as_strings() {
        let got = validate_site(&[site(json!(9), json!(111))], "Alpha", &device()).unwrap();
        assert_eq!(got.id, "9");
        assert!(got.associated_device_ids.contains("111"));
    }

    #[test]
    fn single_object_endpoint_data_is_accepted() {
        let entry = json!({
            "id": "s-2",
            "name": "Top Level",
            "relationships": {"endpoints": {"data": {"id": "111"}}}
        });
        let got = validate_site(&[entry], "Top Level", &device()).unwrap();
        assert_eq!(got.display_name, "Top Level");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let entry = json!({
            "id": "s-3",
            "relationships": {"endpoints": {"data": [{"id": "111"}]}}
        });
        assert_eq!(
            validate_site(&[entry], "x", &device()).unwrap().display_name,
            "s-3"
        );
    }

    #[test]
    fn empty_result_is_not_found() {
        let err = validate_site(&[], "Alpha", &device()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "site not found: no site returned for name 'Alpha'");
    }

    #[test]
    fn string_entry_is_unexpected_shape_with_text() {
        let err = validate_site(&[json!("401 Unauthorized")], "Alpha", &device()).unwrap_err();
        assert_eq!(
            err,
            SiteRejection::UnexpectedShape {
                name: "Alpha".into(),
                shape: "string",
                detail: "401 Unauthorized".into(),
            }
        );
    }

    #[test]
    fn object_without_id_is_unexpected_shape() {
        let err = validate_site(&[json!({"name": "Alpha"})], "Alpha", &device()).unwrap_err();
        assert!(matches!(err, SiteRejection::UnexpectedShape { shape: "object", .. }), "{err}");
    }

    #[test]
    fn missing_relationships_are_malformed() {
        let err = validate_site(&[json!({"id": "s"})], "Alpha", &device()).unwrap_err();
        assert_eq!(
            err,
            SiteRejection::MalformedRelationships {
                name: "Alpha".into(),
                detail: "(no relationships)".into(),
            }
        );
    }

    #[test]
    fn empty_endpoint_list_is_malformed() {
        let entry = json!({"id": "s", "relationships": {"endpoints": {"data": []}}});
        let err = validate_site(&[entry], "Alpha", &device()).unwrap_err();
        assert!(matches!(err, SiteRejection::MalformedRelationships { .. }), "{err}");
    }

    #[test]
    fn relationships_excerpt_is_bounded() {
        let entry = json!({"id": "s", "relationships": {"junk": "x".repeat(600)}});
        let SiteRejection::MalformedRelationships { detail, .. } =
            validate_site(&[entry], "Alpha", &device()).unwrap_err()
        else {
            panic!("expected malformed relationships");
        };
        assert_eq!(detail.chars().count(), RELATIONSHIPS_EXCERPT_LIMIT);
    }

    #[test]
    fn other_router_is_mismatch() {
        let err = validate_site(&[site(json!("s"), json!("222"))], "Alpha", &device()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "site 'Alpha' does not match router: site endpoint 222 != router 111"
        );
    }
}
