use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "scriptsync")]
#[command(about = "Parse timed transcripts and follow the spoken sentence and word during playback.")]
pub struct Args {
    /// Path to config TOML (defaults to ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a script and print its sentence timeline
    Parse(ParseCmd),
    /// Parse a script and print sentences grouped by speaker
    Groups(GroupsCmd),
    /// Report the active sentence and word at the given times
    Locate(LocateCmd),
    /// Drive a simulated playback clock through the timeline
    Replay(ReplayCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct ParseCmd {
    /// Script file (.json, .srt, .vtt, .txt)
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Allow overwriting the output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct GroupsCmd {
    /// Script file (.json, .srt, .vtt, .txt)
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct LocateCmd {
    /// Script file (.json, .srt, .vtt, .txt)
    pub input: PathBuf,

    /// Playback times, in seconds (62.5) or as timestamps (00:01:02.500)
    #[arg(long = "at", required = true, num_args = 1..)]
    pub at: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct ReplayCmd {
    /// Script file; the configured default pair is loaded when omitted
    pub input: Option<PathBuf>,

    /// Media file played alongside the script
    #[arg(long)]
    pub media: Option<PathBuf>,

    /// Start time (seconds or timestamp)
    #[arg(long)]
    pub from: Option<String>,

    /// Stop time (seconds or timestamp); defaults to the end of the timeline
    #[arg(long)]
    pub to: Option<String>,

    /// Override the configured time-update rate
    #[arg(long)]
    pub tick_hz: Option<f64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
