use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use rtx_acl_core::{AclType, DEFAULT_SEQUENCE_START, DEFAULT_SEQUENCE_STEP};

#[derive(Parser, Debug)]
#[command(name = "rtx-acl")]
#[command(about = "Plan and check ACL filter sequence numbers for RTX routers")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the sequences every group in a plan resolves to.
    Sequences(SequencesArgs),
    /// Validate a plan, optionally against router configuration.
    Check(CheckArgs),
    /// Find a free sequence_start for a group of a given size.
    Suggest(SuggestArgs),
    /// Print the run computed from a start, step and count.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct SequencesArgs {
    /// Plan file (TOML).
    pub plan: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Plan file (TOML).
    pub plan: PathBuf,
    /// Router `show config` output to check for existing filters.
    #[arg(long)]
    pub router_config: Option<PathBuf>,
    /// State file recording the sequences each group owned after its last apply.
    #[arg(long)]
    pub state: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub strict: bool,
    /// Print remediation help under each suggestion.
    #[arg(long)]
    pub explain: bool,
}

#[derive(Parser, Debug)]
pub struct SuggestArgs {
    /// ACL type whose numbering space is searched.
    #[arg(long = "type", value_parser = parse_acl_type)]
    pub acl_type: AclType,
    /// Number of entries the group needs.
    #[arg(long)]
    pub count: usize,
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_STEP)]
    pub step: u32,
    /// Start to try first.
    #[arg(long, default_value_t = 0)]
    pub prefer: u32,
    /// Router `show config` output whose filters are treated as taken.
    #[arg(long)]
    pub router_config: Option<PathBuf>,
    /// Plan whose groups of the same type are treated as taken.
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    #[arg(long, default_value_t = i64::from(DEFAULT_SEQUENCE_START), allow_negative_numbers = true)]
    pub start: i64,
    #[arg(long, default_value_t = i64::from(DEFAULT_SEQUENCE_STEP), allow_negative_numbers = true)]
    pub step: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub count: i64,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_acl_type(raw: &str) -> Result<AclType, String> {
    raw.parse::<AclType>().map_err(|e| e.to_string())
}
