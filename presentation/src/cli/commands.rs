//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for casematch
#[derive(Parser, Debug)]
#[command(name = "casematch")]
#[command(author, version, about = "Two-stage case triage against a chat backend")]
#[command(long_about = r#"
casematch sends a query to a conversational backend in up to two stages:

1. Triage: a fast profile answers first, with its session model overridden
2. Detailed: when the triage answer contains the trigger marker
   (default "case_inquiry"), the same query is sent to an in-depth profile

Both answers are streamed to stdout as they arrive. Ctrl-C aborts the run.

Configuration files are loaded from (in priority order):
1. --config <path>      Explicit config file
2. ./casematch.toml     Project-level config
3. ~/.config/casematch/config.toml   Global config
4. CASEMATCH_* environment variables (e.g. CASEMATCH_BACKEND__BASE_URL)

Example:
  casematch "My insurance claim for water damage was denied"
  casematch -v --transcript run.jsonl "Can I appeal a parking fine?"
"#)]
pub struct Cli {
    /// The query to send (read from stdin when omitted)
    pub query: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators and stage headers
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a JSONL transcript of exchange events to PATH
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}
