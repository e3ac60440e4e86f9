//! Layerfont CLI - chromatic layered lettering from the command line

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match &cli.command {
        Commands::Render(args) => commands::render::run(args, cli.quiet),
        Commands::Info(args) => commands::info::run(args),
    }
}

/// Initialize logging based on verbosity flags; `RUST_LOG` still applies on top
fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else if quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
