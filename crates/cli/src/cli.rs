use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Build a detection content app from YAML detections and flat
/// configuration files.
#[derive(Parser, Debug)]
#[command(name = "detforge", version, about = "Detection compiler and app packager")]
pub struct CliArgs {
    /// Project root; relative source and output directories resolve against it
    #[arg(long, short = 'C', env = "DETFORGE_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Log at info level (RUST_LOG still wins when set)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Leave out detections that fail validation instead of aborting
    #[arg(long, env = "DETFORGE_SKIP_INVALID", global = true)]
    pub skip_invalid: bool,

    /// Reject unknown %placeholder% tokens in templated fields
    #[arg(long, env = "DETFORGE_STRICT_PLACEHOLDERS", global = true)]
    pub strict_placeholders: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile and package the app into dist/<appid>_<version>.tgz
    Build {
        /// Patch number override (default: git commit count, or 0)
        #[arg(long, env = "DETFORGE_PATCH")]
        patch: Option<u64>,

        /// Stop after writing the app directory
        #[arg(long)]
        no_archive: bool,
    },
    /// Compile only; print the artifacts or write them to a directory
    Compile {
        /// Directory to write savedsearches.conf and macros.conf into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compile and report counts without writing anything
    Check,
}
