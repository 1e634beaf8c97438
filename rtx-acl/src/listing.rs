//! Per-group sequence listing for `rtx-acl sequences`.

use rtx_acl_core::{AclType, SequenceMode};
use serde::Serialize;

use crate::plan::{AclGroup, AclPlan};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupListing {
    pub name: String,
    pub acl_type: AclType,
    pub mode: SequenceMode,
    pub range: String,
    /// Resolved sequence per entry; `None` where the entry has no usable number.
    pub sequences: Vec<Option<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceListing {
    pub groups: Vec<GroupListing>,
}

pub fn build_sequence_listing(plan: &AclPlan) -> SequenceListing {
    SequenceListing {
        groups: plan.groups.iter().map(group_listing).collect(),
    }
}

fn group_listing(group: &AclGroup) -> GroupListing {
    GroupListing {
        name: group.name.clone(),
        acl_type: group.acl_type,
        mode: group.mode(),
        range: group.range_owned_by(&group.name).to_string(),
        sequences: group.resolved_sequences(),
    }
}

pub fn render_listing_text(listing: &SequenceListing) -> String {
    let mut out = vec![format!("groups={}", listing.groups.len())];
    for g in &listing.groups {
        let sequences = g
            .sequences
            .iter()
            .map(|s| s.map_or_else(|| "?".to_string(), |v| v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        out.push(format!(
            "- {} type={} mode={} sequences={}",
            g.name, g.acl_type, g.mode, sequences
        ));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{build_sequence_listing, render_listing_text};
    use crate::plan::parse_plan;

    #[test]
    fn lists_auto_and_manual_groups() {
        let plan = parse_plan(
            r#"
[[acl]]
name = "lan-in"
type = "ip"
sequence_start = 100
[[acl.entry]]
[[acl.entry]]

[[acl]]
name = "v6"
type = "ipv6"
[[acl.entry]]
sequence = 7
[[acl.entry]]
"#,
            "inline".to_string(),
        )
        .expect("plan should parse");

        let listing = build_sequence_listing(&plan);
        assert_eq!(listing.groups[0].range, "lan-in (sequences 100-110, count=2)");
        assert_eq!(listing.groups[1].sequences, vec![Some(7), None]);

        assert_eq!(
            render_listing_text(&listing),
            "groups=2\n\
             - lan-in type=ip mode=auto sequences=100,110\n\
             - v6 type=ipv6 mode=manual sequences=7,?"
        );
    }
}
