use anyhow::{Context, Result};
use clap::Parser;
use rtx_acl::listing::{build_sequence_listing, render_listing_text};
use rtx_acl::plan::load_plan;
use rtx_acl::report::colorize_listing_text;
use rtx_acl_core::compute_sequence_run;
use tracing_subscriber::EnvFilter;

mod check_cmd;
mod cli;
mod suggest_cmd;

use cli::{Cli, Command, OutputFormat, RunArgs, SequencesArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Sequences(args) => run_sequences(args),
        Command::Check(args) => check_cmd::run_check(args),
        Command::Suggest(args) => suggest_cmd::run_suggest(args),
        Command::Run(args) => run_run(args),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_sequences(args: SequencesArgs) -> Result<()> {
    let plan = load_plan(&args.plan)?;
    let listing = build_sequence_listing(&plan);

    match args.format {
        OutputFormat::Text => println!("{}", colorize_listing_text(&render_listing_text(&listing))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
    }
    Ok(())
}

fn run_run(args: RunArgs) -> Result<()> {
    let run = compute_sequence_run(args.start, args.step, args.count)
        .with_context(|| "failed to compute sequence run")?;
    let joined = run
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    println!("{joined}");
    Ok(())
}
