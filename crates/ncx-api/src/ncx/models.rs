// NCX exchange request bodies

use serde_json::{Value, json};

/// What an exchange resource points at, tagged by resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTarget {
    /// An IP address or CIDR subnet.
    IpSubnet(String),
    /// A fully-qualified domain name.
    Fqdn(String),
    /// A `*.`-prefixed wildcard domain.
    WildcardFqdn(String),
}

impl ResourceTarget {
    /// The JSON:API `type` of the resource collection.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::IpSubnet(_) => "exchange_ipsubnet_resources",
            Self::Fqdn(_) => "exchange_fqdn_resources",
            Self::WildcardFqdn(_) => "exchange_wildcard_fqdn_resources",
        }
    }

    /// The attribute carrying the value: `ip` for subnets, `domain` otherwise.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::IpSubnet(_) => "ip",
            Self::Fqdn(_) | Self::WildcardFqdn(_) => "domain",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::IpSubnet(v) | Self::Fqdn(v) | Self::WildcardFqdn(v) => v,
        }
    }
}

pub(crate) fn site_body(name: &str, network_id: &str, router_id: &str) -> Value {
    json!({
        "data": {
            "type": "exchange_sites",
            "attributes": {
                "name": name,
                "primary_dns": null,
                "secondary_dns": null,
                "lan_as_dns": false,
                "local_domain": null,
                "tags": []
            },
            "relationships": {
                "exchange_network": {
                    "data": { "id": network_id, "type": "exchange_networks" }
                },
                "endpoint": {
                    "data": { "id": router_id, "type": "endpoints" }
                }
            }
        }
    })
}

pub(crate) fn resource_body(site_id: &str, name: &str, target: &ResourceTarget) -> Value {
    let mut attributes = json!({
        "name": name,
        "protocols": ["TCP", "UDP", "ICMP"],
        "tags": []
    });
    attributes[target.attribute()] = Value::String(target.value().to_owned());

    json!({
        "data": {
            "type": target.resource_type(),
            "attributes": attributes,
            "relationships": {
                "site": {
                    "data": { "id": site_id, "type": "exchange_sites" }
                }
            }
        }
    })
}
