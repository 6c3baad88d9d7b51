use std::env;
use std::path::PathBuf;

use probecache_core::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

const SNAPSHOT_FILE_NAME: &str = "lookup.snapshot";

/// XDG Base Directory paths for probecache
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CONFIG_HOME/probecache or fallback
    pub fn config_dir() -> PathBuf {
        env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::config_dir()
                    .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
                    .unwrap_or_else(|| PathBuf::from(".config"))
            })
            .join(CONFIG_DIR_NAME)
    }

    /// Get XDG_CACHE_HOME/probecache or fallback
    pub fn cache_dir() -> PathBuf {
        env::var("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".cache"))
                    .unwrap_or_else(|| PathBuf::from(".cache"))
            })
            .join(CONFIG_DIR_NAME)
    }

    /// The JSON configuration file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Where tools look for a snapshot when none is given
    pub fn default_snapshot() -> PathBuf {
        Self::cache_dir().join(SNAPSHOT_FILE_NAME)
    }
}
