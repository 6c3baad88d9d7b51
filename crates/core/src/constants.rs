/// Constants used throughout the probecache codebase
// Snapshot line prefixes
pub const HEADER_PREFIX: char = 'L';
pub const ENTRY_PREFIX: char = 'E';

// Field delimiter. Not escaped; names containing it cannot be persisted.
pub const FIELD_DELIMITER: char = '|';

// Written in place of an absent owner instance name
pub const NULL_INSTANCE_TOKEN: &str = "<null>";

// Index recorded for a definitive "not found" answer
pub const NOT_FOUND: i32 = -1;

// Suffix of the sibling lock file used while dumping
pub const LOCK_FILE_SUFFIX: &str = ".tmp";

// Default per-store bound for the positive and negative caches
pub const DEFAULT_MAX_ENTRIES: usize = 2000;

// Environment variable names
pub const PROBECACHE_ENABLED_VAR: &str = "PROBECACHE_ENABLED";
pub const PROBECACHE_DUMP_PATH_VAR: &str = "PROBECACHE_DUMP_PATH";
pub const PROBECACHE_LOAD_PATH_VAR: &str = "PROBECACHE_LOAD_PATH";
pub const PROBECACHE_MAX_ENTRIES_VAR: &str = "PROBECACHE_MAX_ENTRIES";
pub const PROBECACHE_VERBOSE_VAR: &str = "PROBECACHE_VERBOSE";

// Config file location relative to the user config directory
pub const CONFIG_DIR_NAME: &str = "probecache";
pub const CONFIG_FILE_NAME: &str = "config.json";
