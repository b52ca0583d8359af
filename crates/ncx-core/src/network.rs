// ── IP network parsing ──
//
// Canonical `network/prefix` form for LAN address/mask pairs and CIDR
// resource values. Host bits are always cleared. IPv4 masks may be a
// prefix length, a dotted netmask (255.255.255.0) or a dotted host mask
// (0.0.0.255); IPv6 only takes a prefix length.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkParseError {
    #[error("invalid IP address '{0}'")]
    Address(String),

    #[error("invalid mask '{mask}' for {address}")]
    Mask { address: String, mask: String },
}

/// An IP network with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    network: IpAddr,
    prefix: u8,
}

impl IpNetwork {
    /// Build from any address inside the network; host bits are dropped.
    pub fn new(address: IpAddr, prefix: u8) -> Option<Self> {
        let network = match address {
            IpAddr::V4(v4) => {
                if prefix > 32 {
                    return None;
                }
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                if prefix > 128 {
                    return None;
                }
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };
        Some(Self { network, prefix })
    }

    /// Parse a LAN-style `(address, mask)` pair.
    pub fn from_address_mask(address: &str, mask: &str) -> Result<Self, NetworkParseError> {
        let address = address.trim();
        let ip: IpAddr = address
            .parse()
            .map_err(|_| NetworkParseError::Address(address.to_owned()))?;
        let mask = mask.trim();
        let prefix = prefix_from_mask(ip, mask).ok_or_else(|| NetworkParseError::Mask {
            address: address.to_owned(),
            mask: mask.to_owned(),
        })?;
        Self::new(ip, prefix).ok_or_else(|| NetworkParseError::Mask {
            address: address.to_owned(),
            mask: mask.to_owned(),
        })
    }
}

/// Accepts `addr`, `addr/prefix`, or (IPv4) `addr/netmask`.
/// A bare address is a single-host network.
impl FromStr for IpNetwork {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('/') {
            Some((address, mask)) => Self::from_address_mask(address, mask),
            None => {
                let ip: IpAddr = s
                    .parse()
                    .map_err(|_| NetworkParseError::Address(s.to_owned()))?;
                let full = if ip.is_ipv4() { 32 } else { 128 };
                Self::new(ip, full).ok_or_else(|| NetworkParseError::Address(s.to_owned()))
            }
        }
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

fn prefix_from_mask(ip: IpAddr, mask: &str) -> Option<u8> {
    if !mask.is_empty() && mask.bytes().all(|b| b.is_ascii_digit()) {
        let prefix: u8 = mask.parse().ok()?;
        let max = if ip.is_ipv4() { 32 } else { 128 };
        return (prefix <= max).then_some(prefix);
    }

    if !ip.is_ipv4() {
        return None;
    }
    let bits = u32::from(mask.parse::<Ipv4Addr>().ok()?);
    if is_contiguous(bits) {
        return u8::try_from(bits.leading_ones()).ok();
    }
    let inverted = !bits;
    if is_contiguous(inverted) {
        return u8::try_from(inverted.leading_ones()).ok();
    }
    None
}

/// True when the set bits form a single leading run (`1…10…0`).
fn is_contiguous(bits: u32) -> bool {
    bits.leading_ones() + bits.trailing_zeros() == 32
}
