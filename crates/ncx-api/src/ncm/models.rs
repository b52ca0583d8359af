// NCM v2 response models
//
// Only the fields the provisioning workflow reads are modelled; ids arrive as
// strings on most firmware but as bare numbers on some, so they are
// normalized to `String` on the way in.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `{ data: [...], meta: { next, ... } }` list envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageMeta {
    #[serde(default)]
    pub next: Option<String>,
}

/// A managed router (device).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Router {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A configuration group of routers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Group {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `GET /routers/{id}/lans/`.
///
/// Every field is optional: entries are read leniently so a single odd LAN
/// never hides the rest of the router's networks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lan {
    pub ip_address: Option<String>,
    pub netmask: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub interface_name: Option<String>,
    pub label: Option<String>,
}

impl Lan {
    /// Build from an untyped LAN object. Non-object values yield an empty entry.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(scalar_text);
        Self {
            ip_address: field("ip_address"),
            netmask: field("netmask"),
            name: field("name"),
            description: field("description"),
            interface_name: field("interface_name"),
            label: field("label"),
        }
    }
}

/// Text form of a JSON scalar (string or number); `None` for anything else.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    scalar_text(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid id: {raw}")))
}
