use std::collections::BTreeMap;

use rtx_acl_core::{
    check_against_existing, suggest_next_start, validate_internal, validate_no_overlap, AclType,
    SequenceError, SequenceRange,
};

fn router(values: &[u32]) -> BTreeMap<u32, String> {
    values.iter().map(|v| (*v, "router".to_string())).collect()
}

#[test]
fn every_overlap_is_reported_in_one_pass() {
    let ranges = vec![
        SequenceRange::new("acl.lan", "lan", AclType::Ip, vec![100, 110, 120]),
        SequenceRange::new("acl.wan", "wan", AclType::Ip, vec![120, 130]),
        SequenceRange::new("acl.dmz", "dmz", AclType::Ip, vec![100, 200]),
        SequenceRange::new("acl.mac", "mac", AclType::Mac, vec![100, 110, 120]),
    ];

    let err = validate_no_overlap(&ranges).expect_err("overlaps");
    let pairs: Vec<(u32, String, String)> = err
        .collisions()
        .iter()
        .map(|c| (c.sequence, c.owned_by.clone(), c.conflicts_with.clone()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (120, "acl.lan".to_string(), "acl.wan".to_string()),
            (100, "acl.lan".to_string(), "acl.dmz".to_string()),
        ]
    );
    assert!(err.to_string().starts_with("detected 2 sequence collision(s):"));
}

#[test]
fn internal_check_passes_for_computed_runs() {
    let range = SequenceRange::new("acl.lan", "lan", AclType::Ipv6, vec![10, 20, 30]);
    assert_eq!(validate_internal(&range), Ok(()));
}

#[test]
fn collision_then_suggestion_resolves_conflict() {
    let existing = router(&[100, 110, 120]);
    let planned = SequenceRange::new("acl.lan", "lan", AclType::Ip, vec![100, 110]);

    let err = check_against_existing(&planned, &existing, None).expect_err("conflict");
    assert!(matches!(err, SequenceError::AggregateCollision(_)));

    let start = suggest_next_start(&existing, planned.len(), 10, 100).expect("free start");
    assert_eq!(start, 10);

    let moved = SequenceRange::new("acl.lan", "lan", AclType::Ip, vec![start, start + 10]);
    assert_eq!(check_against_existing(&moved, &existing, None), Ok(()));
}

#[test]
fn collision_records_serialize_for_reports() {
    let existing = router(&[100]);
    let planned = SequenceRange::new("acl.lan", "lan", AclType::IpDynamic, vec![100]);
    let err = check_against_existing(&planned, &existing, None).expect_err("conflict");

    let json = serde_json::to_value(err.collisions()).expect("serialize");
    assert_eq!(json[0]["sequence"], 100);
    assert_eq!(json[0]["acl_type"], "ip-dynamic");
    assert_eq!(json[0]["conflicts_with"], "router");
}
