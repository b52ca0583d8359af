// ── API-to-domain type conversions ──
//
// Bridges raw `ncx_api` response types into `ncx_core::model` domain types
// and reads the loosely-typed fields of NCM LAN entries.

use ncx_api::{Lan, Router};

use crate::model::Device;
use crate::network::{IpNetwork, NetworkParseError};

impl From<Router> for Device {
    fn from(router: Router) -> Self {
        Self {
            id: router.id,
            name: router.name.map(|n| n.trim().to_owned()).unwrap_or_default(),
        }
    }
}

/// Canonical network of a LAN entry. Entries with a missing or unparseable
/// address or mask are errors.
pub fn lan_network(lan: &Lan) -> Result<IpNetwork, NetworkParseError> {
    let address = lan.ip_address.as_deref().unwrap_or_default();
    let Some(mask) = lan.netmask.as_deref() else {
        return Err(NetworkParseError::Mask {
            address: address.to_owned(),
            mask: String::new(),
        });
    };
    IpNetwork::from_address_mask(address, mask)
}

/// First non-empty of `name`, `description`, `interface_name`, `label`.
pub fn lan_label(lan: &Lan) -> Option<&str> {
    [&lan.name, &lan.description, &lan.interface_name, &lan.label]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .map(str::trim)
        .find(|text| !text.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lan(address: &str, mask: &str) -> Lan {
        Lan {
            ip_address: Some(address.into()),
            netmask: Some(mask.into()),
            ..Lan::default()
        }
    }

    #[test]
    fn router_without_name_becomes_unnamed_device() {
        let device = Device::from(Router {
            id: "111".into(),
            name: None,
        });
        assert_eq!(device, Device::new("111", ""));
        assert_eq!(device.to_string(), "111");
    }

    #[test]
    fn lan_network_clears_host_bits() {
        let net = lan_network(&lan("10.1.1.1", "255.255.255.0")).unwrap();
        assert_eq!(net.to_string(), "10.1.1.0/24");
    }

    #[test]
    fn lan_network_accepts_hostmask_and_prefix() {
        assert_eq!(
            lan_network(&lan("192.168.7.9", "0.0.0.255")).unwrap().to_string(),
            "192.168.7.0/24"
        );
        assert_eq!(
            lan_network(&lan("172.16.5.5", "16")).unwrap().to_string(),
            "172.16.0.0/16"
        );
    }

    #[test]
    fn lan_network_rejects_missing_fields() {
        assert!(lan_network(&Lan::default()).is_err());
        let no_mask = Lan {
            ip_address: Some("10.0.0.1".into()),
            ..Lan::default()
        };
        assert!(lan_network(&no_mask).is_err());
    }

    #[test]
    fn lan_label_skips_blank_fields() {
        let entry = Lan {
            name: Some("  ".into()),
            description: None,
            interface_name: Some("eth1".into()),
            label: Some("Guest".into()),
            ..Lan::default()
        };
        assert_eq!(lan_label(&entry), Some("eth1"));
        assert_eq!(lan_label(&Lan::default()), None);
    }
}
