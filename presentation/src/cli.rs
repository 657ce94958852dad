//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Simulated panel discussion between AI personas")]
#[command(long_about = r#"
Roundtable runs a moderated panel discussion on a topic you choose.

A fixed panel of personas takes turns on each agenda point, the moderator
builds the agenda up front and closes with a summary. While the meeting is
running, anything you type on stdin is delivered into the next persona's
turn as an interjection; Ctrl-C stops the meeting.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./roundtable.toml   Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Should we ship the redesign this quarter?"
  roundtable --turn-delay 2 "Hiring plan for 2027"
"#)]
pub struct Cli {
    /// The discussion topic
    pub topic: String,

    /// Seconds to pause between turns (overrides config)
    #[arg(long, value_name = "SECONDS")]
    pub turn_delay: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress per-entry console output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
