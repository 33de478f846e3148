mod cli;
mod commands;
mod config;
mod package;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use detforge_core::{load_dotenv, BuildConfig};
use detforge_rules::{CompileOptions, FailurePolicy};

use crate::cli::{CliArgs, Command};

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize tracing
    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let config = BuildConfig::from_env().rooted_at(&args.root);
    config.log_summary();

    let options = CompileOptions {
        failure_policy: if args.skip_invalid {
            FailurePolicy::SkipInvalid
        } else {
            FailurePolicy::FailFast
        },
        strict_placeholders: args.strict_placeholders,
    };

    match args.command {
        Command::Build { patch, no_archive } => {
            commands::build(&args.root, &config, &options, patch, !no_archive)
        }
        Command::Compile { out } => commands::compile(&config, &options, out.as_deref()),
        Command::Check => commands::check(&config, &options),
    }
}
