//! Rendering and parsing of individual snapshot lines

use crate::errors::{FormatViolation, LineKind};
use probecache_core::{
    CacheEntry, FingerprintKey, LoadedEntry, ENTRY_PREFIX, FIELD_DELIMITER, HEADER_PREFIX,
    LOCK_FILE_SUFFIX, NOT_FOUND, NULL_INSTANCE_TOKEN,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLine {
    Header(FingerprintKey),
    Entry { name: String, entry: LoadedEntry },
}

impl SnapshotLine {
    /// Parse a single line (without its terminator)
    pub fn parse(line: &str) -> Result<Self, FormatViolation> {
        let mut chars = line.chars();
        let prefix = chars.next();
        if chars.next() != Some(FIELD_DELIMITER) {
            return Err(FormatViolation::UnknownPrefix);
        }

        let fields: Vec<&str> = line.split(FIELD_DELIMITER).skip(1).collect();
        match prefix {
            Some(HEADER_PREFIX) => parse_header(&fields),
            Some(ENTRY_PREFIX) => parse_entry(&fields),
            _ => Err(FormatViolation::UnknownPrefix),
        }
    }
}

fn parse_header(fields: &[&str]) -> Result<SnapshotLine, FormatViolation> {
    let [type_name, instance_name, hash] = fields else {
        return Err(FormatViolation::FieldCount {
            kind: LineKind::Header,
            expected: "4",
            found: fields.len() + 1,
        });
    };

    let instance_name = if *instance_name == NULL_INSTANCE_TOKEN {
        None
    } else {
        Some((*instance_name).to_string())
    };
    let hash = parse_i32("search path hash", hash)?;

    Ok(SnapshotLine::Header(FingerprintKey::new(
        *type_name,
        instance_name,
        hash,
    )))
}

fn parse_entry(fields: &[&str]) -> Result<SnapshotLine, FormatViolation> {
    let (name, index, token) = match fields {
        [name, index] => (*name, *index, None),
        [name, index, token] => (*name, *index, Some(*token)),
        _ => {
            return Err(FormatViolation::FieldCount {
                kind: LineKind::Entry,
                expected: "3 or 4",
                found: fields.len() + 1,
            })
        }
    };

    let index = parse_i32("index", index)?;
    if index == NOT_FOUND && token.is_some() {
        return Err(FormatViolation::TokenOnNegativeEntry);
    }

    Ok(SnapshotLine::Entry {
        name: name.to_string(),
        entry: LoadedEntry::new(index, token.map(str::to_string)),
    })
}

fn parse_i32(field: &'static str, value: &str) -> Result<i32, FormatViolation> {
    value
        .parse::<i32>()
        .map_err(|_| FormatViolation::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Render the `L` line opening a bucket
pub(crate) fn render_header(fingerprint: &FingerprintKey) -> String {
    format!(
        "{HEADER_PREFIX}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
        fingerprint.owner_type_name(),
        fingerprint
            .owner_instance_name()
            .unwrap_or(NULL_INSTANCE_TOKEN),
        fingerprint.search_path_hash()
    )
}

/// Render the `E` line for one entry
pub(crate) fn render_entry(name: &str, entry: &CacheEntry, verbose: bool) -> String {
    match entry.location_token() {
        Some(token) if verbose && entry.index() != NOT_FOUND => format!(
            "{ENTRY_PREFIX}{FIELD_DELIMITER}{name}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{token}",
            entry.index()
        ),
        _ => format!(
            "{ENTRY_PREFIX}{FIELD_DELIMITER}{name}{FIELD_DELIMITER}{}",
            entry.index()
        ),
    }
}

/// Whether a field survives a write/read cycle unchanged
pub(crate) fn is_persistable(field: &str) -> bool {
    !field.contains([FIELD_DELIMITER, '\n', '\r'])
}

/// An instance literally named `<null>` would reload as an unnamed owner
pub(crate) fn header_is_persistable(fingerprint: &FingerprintKey) -> bool {
    is_persistable(fingerprint.owner_type_name())
        && fingerprint
            .owner_instance_name()
            .map_or(true, |name| name != NULL_INSTANCE_TOKEN && is_persistable(name))
}

pub(crate) fn entry_is_persistable(name: &str, entry: &CacheEntry, verbose: bool) -> bool {
    is_persistable(name)
        && (!verbose
            || entry.index() == NOT_FOUND
            || entry.location_token().map_or(true, is_persistable))
}

/// Sibling lock file used while dumping to `path`
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(LOCK_FILE_SUFFIX);
    PathBuf::from(name)
}
