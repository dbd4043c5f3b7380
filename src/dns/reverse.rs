use std::fmt::Write as _;
use std::net::IpAddr;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Zone used for reverse lookups of IPv6 addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum ReverseZone {
    /// Decimal byte labels under `in-addr.arpa.` for every address family.
    ///
    /// This is the historical behaviour. For IPv6 it produces names that
    /// public resolvers do not serve.
    #[default]
    InAddrArpa,
    /// Nibble-reversed hex labels under `ip6.arpa.` for IPv6 addresses
    Ip6Arpa,
}

impl std::fmt::Display for ReverseZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InAddrArpa => write!(f, "in-addr.arpa"),
            Self::Ip6Arpa => write!(f, "ip6.arpa"),
        }
    }
}

/// Reduce an address to its canonical byte form: 4 bytes for IPv4 and
/// IPv4-mapped IPv6, 16 bytes otherwise.
fn canonical_octets(ip: IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => v4.octets().to_vec(),
            None => v6.octets().to_vec(),
        },
    }
}

/// Build the reverse-lookup name for `ip`.
///
/// Bytes are emitted in reverse storage order, so `9.8.7.6` becomes
/// `6.7.8.9.in-addr.arpa.`.
#[must_use]
pub fn reverse_name(ip: IpAddr, zone: ReverseZone) -> String {
    let octets = canonical_octets(ip);

    if octets.len() == 16 && zone == ReverseZone::Ip6Arpa {
        let mut name = String::with_capacity(72);
        for byte in octets.iter().rev() {
            write!(name, "{:x}.{:x}.", byte & 0x0f, byte >> 4).ok();
        }
        name.push_str("ip6.arpa.");
        return name;
    }

    if octets.len() == 16 {
        log::debug!("building in-addr.arpa reverse name for IPv6 address {ip}");
    }

    let mut name = String::with_capacity(octets.len() * 4 + 13);
    for byte in octets.iter().rev() {
        write!(name, "{byte}.").ok();
    }
    name.push_str("in-addr.arpa.");
    name
}
