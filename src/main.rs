mod cli;
mod commands;
mod model;

use anyhow::Result;
use clap::Parser;
use statute_structure::config::{ConfigSource, ConverterConfig};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let (config, source) = match ConverterConfig::load_or_create(&cli.config) {
        Ok(loaded) => loaded,
        Err(err) => {
            init_tracing("info");
            error!(error = %err, "failed to prepare configuration");
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);
    match source {
        ConfigSource::Loaded => info!(path = %cli.config.display(), "loaded configuration"),
        ConfigSource::Created => info!(path = %cli.config.display(), "wrote default configuration"),
        ConfigSource::Fallback { reason } => warn!(
            path = %cli.config.display(),
            reason = %reason,
            "configuration unreadable, using defaults"
        ),
    }

    if let Err(err) = run(cli.command, config) {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(command: Commands, config: ConverterConfig) -> Result<()> {
    match command {
        Commands::Convert(args) => commands::convert::run(args, config),
        Commands::Classify(args) => commands::classify::run(args, config),
        Commands::Verify(args) => commands::verify::run(args),
    }
}

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
