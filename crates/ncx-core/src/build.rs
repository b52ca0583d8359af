// ── Resource builders ──
//
// Derive what each pipeline submits: site names, LAN subnet resources, and
// classified generic resources. Pure functions over already-fetched data.

use tracing::debug;

use ncx_api::{Lan, ResourceTarget};

use crate::convert::{lan_label, lan_network};
use crate::error::ItemFailure;
use crate::model::{Device, ResourceSpec, Site};
use crate::network::IpNetwork;

/// Shortest name the exchange API accepts, in characters after trimming.
pub const MIN_NAME_LEN: usize = 3;

/// Trimmed `name`, or `NameTooShort`.
pub fn validate_name(name: &str) -> Result<String, ItemFailure> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(ItemFailure::NameTooShort {
            name: name.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// IP address or CIDR subnet first; otherwise a domain, wildcard when it
/// starts with `*.`. The trimmed raw value is kept as the payload.
pub fn classify_resource(value: &str) -> ResourceTarget {
    let value = value.trim();
    if value.parse::<IpNetwork>().is_ok() {
        ResourceTarget::IpSubnet(value.to_owned())
    } else if value.starts_with("*.") {
        ResourceTarget::WildcardFqdn(value.to_owned())
    } else {
        ResourceTarget::Fqdn(value.to_owned())
    }
}

/// Name of the site to create for `device`: the override, else the device name.
pub fn site_name_for(device: &Device, site_override: Option<&str>) -> Result<String, ItemFailure> {
    validate_name(site_override.unwrap_or(&device.name))
}

/// Generic pipeline: one resource from a row value and optional name.
pub fn generic_resource_spec(
    value: &str,
    name_override: Option<&str>,
) -> Result<ResourceSpec, ItemFailure> {
    let name = validate_name(name_override.unwrap_or(value))?;
    Ok(ResourceSpec::new(name, classify_resource(value)))
}

/// A LAN resource, or the reason it could not be built.
pub type LanSpec = Result<ResourceSpec, ItemFailure>;

/// LAN pipeline: one IP-subnet resource per valid LAN of the device.
///
/// Entries without a parseable address and mask are dropped. Unnamed LANs
/// are numbered by their position in the raw listing, dropped entries
/// included, so `LAN 3` always means the third entry the API returned.
pub fn lan_resource_specs(site: &Site, lans: &[Lan]) -> Result<Vec<LanSpec>, ItemFailure> {
    let specs: Vec<LanSpec> = lans
        .iter()
        .enumerate()
        .filter_map(|(i, lan)| match lan_network(lan) {
            Ok(network) => {
                let label = lan_label(lan).map_or_else(|| format!("LAN {}", i + 1), str::to_owned);
                let name = format!("{} {label}", site.display_name);
                Some(
                    validate_name(&name)
                        .map(|name| ResourceSpec::new(name, ResourceTarget::IpSubnet(network.to_string()))),
                )
            }
            Err(e) => {
                debug!(index = i, error = %e, "skipping unusable LAN entry");
                None
            }
        })
        .collect();

    if specs.is_empty() {
        return Err(ItemFailure::NoLocalNetworks);
    }
    Ok(specs)
}
