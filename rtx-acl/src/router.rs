//! Filter numbers already configured on the router.
//!
//! The input is the text printed by `show config`. Only filter definition
//! lines matter here; everything else is ignored.
//!
//! | line prefix            | numbering space |
//! |------------------------|-----------------|
//! | `ip filter N`          | ip, extended    |
//! | `ip filter dynamic N`  | ip-dynamic      |
//! | `ipv6 filter N`        | ipv6            |
//! | `ipv6 filter dynamic N`| ipv6-dynamic    |
//! | `ethernet filter N`    | mac             |

use std::collections::BTreeMap;

use rtx_acl_core::AclType;
use tracing::{debug, warn};

/// Owner recorded for filters read from the router.
pub const ROUTER_OWNER: &str = "router";

/// Filter table a definition line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpace {
    Ip,
    IpDynamic,
    Ipv6,
    Ipv6Dynamic,
    Ethernet,
}

impl FilterSpace {
    /// Router table backing an ACL type. Standard and extended IP ACLs share one table.
    pub fn for_acl_type(acl_type: AclType) -> Self {
        match acl_type {
            AclType::Ip | AclType::Extended => FilterSpace::Ip,
            AclType::IpDynamic => FilterSpace::IpDynamic,
            AclType::Ipv6 => FilterSpace::Ipv6,
            AclType::Ipv6Dynamic => FilterSpace::Ipv6Dynamic,
            AclType::Mac => FilterSpace::Ethernet,
        }
    }
}

/// Numbers of every filter in `acl_type`'s table, each owned by [`ROUTER_OWNER`].
pub fn router_sequences(config: &str, acl_type: AclType) -> BTreeMap<u32, String> {
    let wanted = FilterSpace::for_acl_type(acl_type);
    let mut out = BTreeMap::new();

    for (lineno, line) in config.lines().enumerate() {
        let Some((space, number)) = classify_line(line) else {
            continue;
        };
        if space != wanted {
            continue;
        }
        match number.parse::<u32>() {
            Ok(seq) => {
                out.insert(seq, ROUTER_OWNER.to_string());
            }
            Err(_) => warn!(
                line = lineno + 1,
                token = number,
                "skipping filter line with non-numeric id"
            ),
        }
    }

    debug!(acl_type = %acl_type, filters = out.len(), "collected router filters");
    out
}

fn classify_line(line: &str) -> Option<(FilterSpace, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match tokens.as_slice() {
        ["ip", "filter", "dynamic", n, ..] => Some((FilterSpace::IpDynamic, *n)),
        ["ip", "filter", n, ..] => Some((FilterSpace::Ip, *n)),
        ["ipv6", "filter", "dynamic", n, ..] => Some((FilterSpace::Ipv6Dynamic, *n)),
        ["ipv6", "filter", n, ..] => Some((FilterSpace::Ipv6, *n)),
        ["ethernet", "filter", n, ..] => Some((FilterSpace::Ethernet, *n)),
        _ => None,
    }
}
