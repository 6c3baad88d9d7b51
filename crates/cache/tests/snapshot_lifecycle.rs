//! End-to-end tests for the dump/load lifecycle across simulated restarts
use probecache_cache::{
    CacheConfigBuilder, CacheEntry, CacheError, CacheStore, DumpOutcome, FingerprintKey,
    FormatViolation, LoadedEntry, LookupFailure, Registry, ResourceProbe, SnapshotWriter,
};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn dumping_registry(path: &Path, verbose: bool) -> Registry {
    Registry::initialize(
        CacheConfigBuilder::new()
            .with_enabled(true)
            .with_dump_path(path)
            .with_verbose(verbose)
            .build(),
    )
    .unwrap()
    .expect("cache enabled")
}

fn loading_registry(path: &Path) -> Registry {
    Registry::initialize(
        CacheConfigBuilder::new()
            .with_enabled(true)
            .with_load_path(path)
            .build(),
    )
    .unwrap()
    .expect("cache enabled")
}

fn loader_x() -> FingerprintKey {
    FingerprintKey::new("TypeA", Some("loaderX".to_string()), 77)
}

fn unnamed() -> FingerprintKey {
    FingerprintKey::new("TypeB", None, 0)
}

#[test]
fn test_recorded_entry_is_returned() {
    let registry = Registry::initialize(CacheConfigBuilder::new().with_enabled(true).build())
        .unwrap()
        .unwrap();
    let store = CacheStore::create(loader_x(), &registry);

    let entry = CacheEntry::found("a/B.class", 3, None);
    store.record("a/B.class", entry.clone());
    assert_eq!(store.lookup("a/B.class"), Some(entry));
}

#[test]
fn test_two_stores_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");

    // First run
    let first = dumping_registry(&path, false);
    let a = CacheStore::create(loader_x(), &first);
    let _b = CacheStore::create(unnamed(), &first);
    a.record("a/B.class", CacheEntry::found("a/B.class", 3, None));
    a.record("a/Missing.class", CacheEntry::not_found("a/Missing.class"));

    assert_eq!(
        first.shutdown(),
        Some(DumpOutcome::Written {
            stores: 2,
            entries: 2
        })
    );

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().filter(|l| l.starts_with("L|")).count(), 2);
    assert_eq!(content.lines().filter(|l| l.starts_with("E|")).count(), 2);

    // Second run
    let second = loading_registry(&path);
    let restored = CacheStore::create(loader_x(), &second);
    let bucket = restored.loaded_bucket();
    assert_eq!(bucket.len(), 2);
    assert_eq!(
        restored.loaded_lookup("a/B.class"),
        Some(&LoadedEntry::new(3, None))
    );
    assert_eq!(
        restored.loaded_lookup("a/Missing.class"),
        Some(&LoadedEntry::not_found())
    );

    let other = CacheStore::create(unnamed(), &second);
    assert!(other.loaded_bucket().is_empty());
    assert_eq!(second.load_table().len(), 2);
}

#[test]
fn test_verbose_round_trip_keeps_tokens() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");

    let first = dumping_registry(&path, true);
    let store = CacheStore::create(loader_x(), &first);
    store.record(
        "a/B.class",
        CacheEntry::found("a/B.class", 1, Some("file:/opt/lib/b.jar".to_string())),
    );
    first.shutdown();

    let second = loading_registry(&path);
    let restored = CacheStore::create(loader_x(), &second);
    assert_eq!(
        restored
            .loaded_lookup("a/B.class")
            .and_then(LoadedEntry::location_token),
        Some("file:/opt/lib/b.jar")
    );
}

#[test]
fn test_evicted_entries_are_not_persisted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");

    let first = Registry::initialize(
        CacheConfigBuilder::new()
            .with_enabled(true)
            .with_dump_path(&path)
            .with_max_entries(2)
            .build(),
    )
    .unwrap()
    .unwrap();
    let store = CacheStore::create(loader_x(), &first);
    for (i, name) in ["A", "B", "C"].into_iter().enumerate() {
        store.record(name, CacheEntry::found(name, i as i32, None));
    }
    first.shutdown();

    let second = loading_registry(&path);
    let restored = CacheStore::create(loader_x(), &second);
    assert!(restored.loaded_lookup("A").is_none());
    assert!(restored.loaded_lookup("B").is_some());
    assert!(restored.loaded_lookup("C").is_some());
}

#[test]
fn test_second_dump_leaves_first_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");

    let first = dumping_registry(&path, false);
    let store = CacheStore::create(loader_x(), &first);
    store.record("a/B.class", CacheEntry::found("a/B.class", 3, None));
    assert!(matches!(
        SnapshotWriter::dump(&path, &first),
        DumpOutcome::Written { .. }
    ));
    let original = fs::read(&path).unwrap();

    // A later process with different answers must not replace the snapshot
    let second = dumping_registry(&path, false);
    let store = CacheStore::create(loader_x(), &second);
    store.record("z/Z.class", CacheEntry::found("z/Z.class", 9, None));
    assert_eq!(
        SnapshotWriter::dump(&path, &second),
        DumpOutcome::AlreadyExists
    );
    assert_eq!(fs::read(&path).unwrap(), original);
}

#[test]
fn test_garbage_snapshot_fails_before_any_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");
    fs::write(&path, "X|garbage\n").unwrap();

    let result = Registry::initialize(
        CacheConfigBuilder::new()
            .with_enabled(true)
            .with_load_path(&path)
            .build(),
    );
    match result {
        Err(CacheError::Format {
            line_number,
            violation,
            ..
        }) => {
            assert_eq!(line_number, 1);
            assert_eq!(violation, FormatViolation::UnknownPrefix);
        }
        other => panic!("expected format error, got {other:?}"),
    }
}

struct CountingProbe {
    calls: Cell<usize>,
}

impl ResourceProbe for CountingProbe {
    fn probe(&self, name: &str) -> Result<CacheEntry, LookupFailure> {
        self.calls.set(self.calls.get() + 1);
        Err(LookupFailure::not_found(name))
    }
}

#[test]
fn test_cached_failure_skips_probe() {
    let registry = Registry::initialize(CacheConfigBuilder::new().with_enabled(true).build())
        .unwrap()
        .unwrap();
    let store = CacheStore::create(loader_x(), &registry);
    let probe = CountingProbe {
        calls: Cell::new(0),
    };

    store.record_failure("missing/Foo", LookupFailure::not_found("missing/Foo"));
    for _ in 0..5 {
        assert_eq!(
            store.resolve("missing/Foo", &probe),
            Err(LookupFailure::not_found("missing/Foo"))
        );
    }
    assert_eq!(probe.calls.get(), 0);
}

#[test]
fn test_restored_negative_answer_skips_probe_next_run() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");

    let first = dumping_registry(&path, false);
    let store = CacheStore::create(loader_x(), &first);
    store.record("gone/X.class", CacheEntry::not_found("gone/X.class"));
    first.shutdown();

    let second = loading_registry(&path);
    let store = CacheStore::create(loader_x(), &second);
    let probe = CountingProbe {
        calls: Cell::new(0),
    };
    let entry = store.resolve("gone/X.class", &probe).unwrap();
    assert!(!entry.is_found());
    assert_eq!(probe.calls.get(), 0);
}
