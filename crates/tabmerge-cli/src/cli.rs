//! CLI argument definitions for tabmerge.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tabmerge_cli::overrides::{ColumnOverride, parse_override};
use tabmerge_map::{DEFAULT_LIMIT, DEFAULT_THRESHOLD, MatchOptions};

#[derive(Parser)]
#[command(
    name = "tabmerge",
    version,
    about = "Reconcile column names and append one CSV table to another",
    long_about = "Reconcile column names between a source and a target CSV file and\n\
                  append the source rows to the target.\n\n\
                  Columns with identical names are mapped automatically. Other target\n\
                  columns get fuzzy suggestions that can be accepted or overridden."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the proposed column mapping without touching any file.
    Suggest(SuggestArgs),

    /// Append the source rows to the target file.
    Append(AppendArgs),
}

#[derive(Args)]
pub struct MatchArgs {
    /// Minimum fuzzy score (0-100) for a source column to be suggested.
    #[arg(
        long = "threshold",
        value_name = "SCORE",
        default_value_t = DEFAULT_THRESHOLD,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub threshold: u8,

    /// Maximum number of suggestions per target column.
    #[arg(long = "limit", value_name = "N", default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Only map columns with identical names.
    #[arg(long = "no-fuzzy")]
    pub no_fuzzy: bool,
}

impl MatchArgs {
    pub fn options(&self) -> MatchOptions {
        MatchOptions::default()
            .with_threshold(self.threshold)
            .with_limit(self.limit)
            .with_fuzzy(!self.no_fuzzy)
    }
}

#[derive(Args)]
pub struct SuggestArgs {
    /// File whose rows would be appended.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// File that would receive the rows.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Print the mapping as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct AppendArgs {
    /// File whose rows are appended.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// File that receives the rows.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Map a target column to a source column (repeatable).
    #[arg(long = "map", value_name = "TARGET=SOURCE", value_parser = parse_override)]
    pub map: Vec<ColumnOverride>,

    /// Leave a target column without source data (repeatable).
    #[arg(long = "unmap", value_name = "TARGET")]
    pub unmap: Vec<String>,

    /// JSON object of target column to source column (null to unmap).
    #[arg(long = "mapping-file", value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Use the best suggestion for every column without an exact match.
    #[arg(long = "accept-suggestions")]
    pub accept_suggestions: bool,

    /// Write the merged table here instead of overwriting TARGET.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report the merge without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
