use probecache_cache::SnapshotReader;
use std::path::Path;

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let table = SnapshotReader::load(path)?;
    let entries: usize = table.values().map(|bucket| bucket.len()).sum();
    println!(
        "{}: ok ({} buckets, {} entries)",
        path.display(),
        table.len(),
        entries
    );
    Ok(())
}
