use std::collections::BTreeMap;
use std::fs;

use anyhow::{bail, Context, Result};
use rtx_acl::plan::load_plan;
use rtx_acl::router::{router_sequences, FilterSpace};
use rtx_acl_core::suggest_next_start;
use tracing::info;

use crate::cli::SuggestArgs;

pub fn run_suggest(args: SuggestArgs) -> Result<()> {
    let mut existing: BTreeMap<u32, String> = match &args.router_config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read router config {}", path.display()))?;
            router_sequences(&raw, args.acl_type)
        }
        None => BTreeMap::new(),
    };

    if let Some(path) = &args.plan {
        let plan = load_plan(path)?;
        let space = FilterSpace::for_acl_type(args.acl_type);
        for group in plan
            .groups
            .iter()
            .filter(|g| FilterSpace::for_acl_type(g.acl_type) == space)
        {
            let range = group.range();
            for seq in range.sequences() {
                existing
                    .entry(*seq)
                    .or_insert_with(|| range.owner().to_string());
            }
        }
    }
    info!(acl_type = %args.acl_type, used = existing.len(), "searching for free start");

    match suggest_next_start(&existing, args.count, args.step, args.prefer) {
        Some(start) => {
            println!("sequence_start = {start}");
            Ok(())
        }
        None => bail!(
            "no free range of {} {} sequences with step {} below the maximum",
            args.count,
            args.acl_type,
            args.step
        ),
    }
}
