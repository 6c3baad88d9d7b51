use clap::Subcommand;
use probecache_utils::XdgPaths;
use std::path::PathBuf;

pub mod check;
pub mod config;
pub mod inspect;

use self::config::ConfigArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the buckets and entries stored in a snapshot
    Inspect {
        /// Snapshot file to read [default: the user cache snapshot]
        path: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a snapshot without printing its contents
    Check {
        /// Snapshot file to validate [default: the user cache snapshot]
        path: Option<PathBuf>,
    },

    /// Show the effective cache configuration
    Config(ConfigArgs),
}

impl Commands {
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { path, json } => inspect::execute(&snapshot_path(path), json),
            Commands::Check { path } => check::execute(&snapshot_path(path)),
            Commands::Config(args) => config::execute(args),
        }
    }
}

fn snapshot_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(XdgPaths::default_snapshot)
}
