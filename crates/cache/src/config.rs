//! Cache configuration management with precedence and validation
use crate::errors::{Error, RecoveryHint, Result};
use probecache_core::{
    DEFAULT_MAX_ENTRIES, PROBECACHE_DUMP_PATH_VAR, PROBECACHE_ENABLED_VAR,
    PROBECACHE_LOAD_PATH_VAR, PROBECACHE_MAX_ENTRIES_VAR, PROBECACHE_VERBOSE_VAR,
};
use probecache_utils::XdgPaths;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Settings for the lookup cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; when false the registry is never created
    pub enabled: bool,
    /// Write a snapshot here at shutdown
    pub dump_path: Option<PathBuf>,
    /// Read a snapshot from here at startup
    pub load_path: Option<PathBuf>,
    /// Per-store bound for both the positive and the negative cache
    pub max_entries: usize,
    /// Persist location tokens alongside indexes
    pub verbose: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dump_path: None,
            load_path: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            verbose: false,
        }
    }
}

impl CacheConfig {
    /// Reject contradictory settings
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            if let Some(path) = &self.dump_path {
                return Err(Error::Configuration {
                    message: format!(
                        "dump path '{}' is set but the cache is disabled",
                        path.display()
                    ),
                    recovery_hint: RecoveryHint::UpdateConfiguration,
                });
            }
            if let Some(path) = &self.load_path {
                return Err(Error::Configuration {
                    message: format!(
                        "load path '{}' is set but the cache is disabled",
                        path.display()
                    ),
                    recovery_hint: RecoveryHint::UpdateConfiguration,
                });
            }
        }

        self.capacity().map(|_| ())
    }

    /// `max_entries` as a non-zero capacity
    pub fn capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.max_entries).ok_or_else(|| Error::Configuration {
            message: "max_entries must be greater than zero".to_string(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        })
    }

    pub fn dump_enabled(&self) -> bool {
        self.enabled && self.dump_path.is_some()
    }

    pub fn load_enabled(&self) -> bool {
        self.enabled && self.load_path.is_some()
    }
}

/// Partial settings from one configuration source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfigOverrides {
    pub enabled: Option<bool>,
    pub dump_path: Option<PathBuf>,
    pub load_path: Option<PathBuf>,
    pub max_entries: Option<usize>,
    pub verbose: Option<bool>,
}

impl CacheConfigOverrides {
    fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply_to(self, config: &mut CacheConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if self.dump_path.is_some() {
            config.dump_path = self.dump_path;
        }
        if self.load_path.is_some() {
            config.load_path = self.load_path;
        }
        if let Some(max_entries) = self.max_entries {
            config.max_entries = max_entries;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
    }
}

/// Resolved configuration together with where its last layer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfiguration {
    pub cache: CacheConfig,
    pub source: ConfigSource,
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            source: ConfigSource::Default,
        }
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// Builder for creating cache configurations
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CacheConfig::default(),
        }
    }

    /// Set the master switch
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Dump a snapshot to this path at shutdown
    pub fn with_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dump_path = Some(path.into());
        self
    }

    /// Load a snapshot from this path at startup
    pub fn with_load_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.load_path = Some(path.into());
        self
    }

    /// Set the per-store entry bound
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.config.max_entries = max_entries;
        self
    }

    /// Persist location tokens
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cache: CacheConfigOverrides,
}

/// Configuration loader that handles precedence
pub struct CacheConfigLoader;

impl CacheConfigLoader {
    /// Defaults, then the user config file, then `PROBECACHE_*` variables
    pub fn load() -> Result<CacheConfiguration> {
        Self::load_from(&XdgPaths::config_file())
    }

    /// Like [`load`](Self::load) with an explicit config file location
    pub fn load_from(config_file: &Path) -> Result<CacheConfiguration> {
        let mut config = CacheConfiguration::default();

        if let Some(file_overrides) = Self::load_from_config_file(config_file)? {
            config = Self::merge_config(
                config,
                file_overrides,
                ConfigSource::ConfigFile(config_file.to_path_buf()),
            );
        }

        if let Some(env_overrides) = Self::load_from_env()? {
            config = Self::merge_config(
                config,
                env_overrides,
                ConfigSource::EnvironmentVariable("PROBECACHE_*".to_string()),
            );
        }

        tracing::debug!(source = ?config.source, config = ?config.cache, "Resolved cache configuration");
        Ok(config)
    }

    /// Load configuration from config file
    fn load_from_config_file(path: &Path) -> Result<Option<CacheConfigOverrides>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            path: path.to_path_buf(),
            operation: "read config file",
            source: e,
            recovery_hint: RecoveryHint::CheckPermissions {
                path: path.to_path_buf(),
            },
        })?;

        let file: ConfigFile = serde_json::from_str(&content)?;
        Ok(Some(file.cache))
    }

    /// Load configuration from environment variables
    fn load_from_env() -> Result<Option<CacheConfigOverrides>> {
        let mut overrides = CacheConfigOverrides::default();

        if let Ok(value) = std::env::var(PROBECACHE_ENABLED_VAR) {
            overrides.enabled = Some(parse_bool(PROBECACHE_ENABLED_VAR, &value)?);
        }

        if let Ok(value) = std::env::var(PROBECACHE_DUMP_PATH_VAR) {
            if !value.is_empty() {
                overrides.dump_path = Some(PathBuf::from(value));
            }
        }

        if let Ok(value) = std::env::var(PROBECACHE_LOAD_PATH_VAR) {
            if !value.is_empty() {
                overrides.load_path = Some(PathBuf::from(value));
            }
        }

        if let Ok(value) = std::env::var(PROBECACHE_MAX_ENTRIES_VAR) {
            let max_entries = value.trim().parse::<usize>().map_err(|_| Error::Configuration {
                message: format!("{PROBECACHE_MAX_ENTRIES_VAR}='{value}' is not a number"),
                recovery_hint: RecoveryHint::UpdateConfiguration,
            })?;
            overrides.max_entries = Some(max_entries);
        }

        if let Ok(value) = std::env::var(PROBECACHE_VERBOSE_VAR) {
            overrides.verbose = Some(parse_bool(PROBECACHE_VERBOSE_VAR, &value)?);
        }

        if overrides.is_empty() {
            Ok(None)
        } else {
            Ok(Some(overrides))
        }
    }

    /// Merge configurations with precedence
    fn merge_config(
        base: CacheConfiguration,
        overrides: CacheConfigOverrides,
        source: ConfigSource,
    ) -> CacheConfiguration {
        let mut cache = base.cache;
        overrides.apply_to(&mut cache);
        CacheConfiguration { cache, source }
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_args(
        config: CacheConfiguration,
        overrides: CacheConfigOverrides,
    ) -> CacheConfiguration {
        if overrides.is_empty() {
            return config;
        }
        Self::merge_config(config, overrides, ConfigSource::CommandLine)
    }
}

fn parse_bool(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Configuration {
            message: format!("{variable}='{value}' is not a boolean"),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }),
    }
}
