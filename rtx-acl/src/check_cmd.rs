use std::fs;

use anyhow::{bail, Context, Result};
use rtx_acl::check::{build_check_report, render_check_text};
use rtx_acl::plan::load_plan;
use rtx_acl::report::colorize_check_text;
use rtx_acl::state::load_state;
use tracing::warn;

use crate::cli::{CheckArgs, OutputFormat};

pub fn run_check(args: CheckArgs) -> Result<()> {
    let plan = load_plan(&args.plan)?;
    let router = args
        .router_config
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read router config {}", path.display()))
        })
        .transpose()?;
    let state = args.state.as_deref().map(load_state).transpose()?;

    if router.is_none() && state.is_some() {
        warn!("state file given without --router-config; router collisions are not checked");
    }

    let report = build_check_report(&plan, router.as_deref(), state.as_ref());

    match args.format {
        OutputFormat::Text => println!(
            "{}",
            colorize_check_text(&render_check_text(&report, args.explain))
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.errors > 0 {
        bail!("check failed: {} errors", report.errors);
    }
    if args.strict && report.warnings > 0 {
        bail!("check failed in strict mode: {} warnings", report.warnings);
    }
    Ok(())
}
