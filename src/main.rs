use anyhow::Result;
use clap::Parser;

use scriptsync::config;

mod cli;
mod pipeline;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    let cfg = config::Config::load(args.config.as_deref())?;
    config::init_tracing(&cfg.logging, args.log_level.as_deref())?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "scriptsync starting");

    match args.command {
        cli::Command::Parse(cmd) => pipeline::run_parse(cmd, &cfg),
        cli::Command::Groups(cmd) => pipeline::run_groups(cmd, &cfg),
        cli::Command::Locate(cmd) => pipeline::run_locate(cmd, &cfg),
        cli::Command::Replay(cmd) => pipeline::run_replay(cmd, &cfg),
        cli::Command::PrintDefaultConfig => {
            let s = cfg.to_toml_pretty()?;
            print!("{s}");
            Ok(())
        }
    }
}
