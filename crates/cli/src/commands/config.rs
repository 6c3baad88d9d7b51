use clap::Args;
use probecache_cache::{CacheConfigLoader, CacheConfigOverrides};
use probecache_utils::XdgPaths;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Read settings from this file instead of the user config file
    #[arg(long, value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Override whether the cache is enabled
    #[arg(long)]
    enabled: Option<bool>,

    /// Override the snapshot written at shutdown
    #[arg(long, value_name = "PATH")]
    dump_path: Option<PathBuf>,

    /// Override the snapshot read at startup
    #[arg(long, value_name = "PATH")]
    load_path: Option<PathBuf>,

    /// Override the per-tier entry bound
    #[arg(long)]
    max_entries: Option<usize>,

    /// Override whether location tokens are written
    #[arg(long)]
    verbose: Option<bool>,
}

impl ConfigArgs {
    fn overrides(&self) -> CacheConfigOverrides {
        CacheConfigOverrides {
            enabled: self.enabled,
            dump_path: self.dump_path.clone(),
            load_path: self.load_path.clone(),
            max_entries: self.max_entries,
            verbose: self.verbose,
        }
    }
}

pub fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let config_file = args
        .config_file
        .clone()
        .unwrap_or_else(XdgPaths::config_file);
    let resolved = CacheConfigLoader::load_from(&config_file)?;
    let resolved = CacheConfigLoader::apply_cli_args(resolved, args.overrides());

    resolved.cache.validate()?;
    println!("{}", serde_json::to_string_pretty(&resolved.cache)?);
    tracing::debug!(source = ?resolved.source, "Configuration source");
    Ok(())
}
