use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Independent filter numbering spaces on the router.
///
/// Ranges of different types never collide: an `ip` filter 100 and a `mac`
/// filter 100 are unrelated objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AclType {
    Ip,
    Ipv6,
    Mac,
    IpDynamic,
    Ipv6Dynamic,
    Extended,
}

impl AclType {
    /// Every supported type, in display order.
    pub const ALL: [AclType; 6] = [
        AclType::Ip,
        AclType::Ipv6,
        AclType::Mac,
        AclType::IpDynamic,
        AclType::Ipv6Dynamic,
        AclType::Extended,
    ];

    /// Stable lowercase name used in plans, reports and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            AclType::Ip => "ip",
            AclType::Ipv6 => "ipv6",
            AclType::Mac => "mac",
            AclType::IpDynamic => "ip-dynamic",
            AclType::Ipv6Dynamic => "ipv6-dynamic",
            AclType::Extended => "extended",
        }
    }
}

impl Display for AclType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`AclType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ACL type '{0}' (expected one of: ip, ipv6, mac, ip-dynamic, ipv6-dynamic, extended)")]
pub struct UnknownAclType(pub String);

impl FromStr for AclType {
    type Err = UnknownAclType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        AclType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownAclType(s.to_string()))
    }
}
