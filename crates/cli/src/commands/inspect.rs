use probecache_cache::{LoadTable, LoadedBucket, SnapshotReader};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct BucketView<'a> {
    owner_type_name: &'a str,
    owner_instance_name: Option<&'a str>,
    search_path_hash: i32,
    entries: Vec<EntryView<'a>>,
}

#[derive(Serialize)]
struct EntryView<'a> {
    name: &'a str,
    index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_token: Option<&'a str>,
}

pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let table = SnapshotReader::load(path)?;
    let buckets = sorted_views(&table);

    if json {
        println!("{}", serde_json::to_string_pretty(&buckets)?);
        return Ok(());
    }

    if buckets.is_empty() {
        println!("{}: empty snapshot", path.display());
        return Ok(());
    }

    for bucket in &buckets {
        match bucket.owner_instance_name {
            Some(instance) => println!(
                "{} ({}) #{}: {} entries",
                bucket.owner_type_name,
                instance,
                bucket.search_path_hash,
                bucket.entries.len()
            ),
            None => println!(
                "{} #{}: {} entries",
                bucket.owner_type_name,
                bucket.search_path_hash,
                bucket.entries.len()
            ),
        }

        let width = bucket
            .entries
            .iter()
            .map(|entry| entry.name.len())
            .max()
            .unwrap_or(0);
        for entry in &bucket.entries {
            let index = if entry.index < 0 {
                "missing".to_string()
            } else {
                entry.index.to_string()
            };
            match entry.location_token {
                Some(token) => println!("  {:<width$}  {index:>7}  {token}", entry.name),
                None => println!("  {:<width$}  {index:>7}", entry.name),
            }
        }
    }
    Ok(())
}

/// Buckets and entries in a stable order for display
fn sorted_views(table: &LoadTable) -> Vec<BucketView<'_>> {
    let mut views: Vec<BucketView<'_>> = table.values().map(|b| bucket_view(b)).collect();
    views.sort_by(|a, b| {
        (a.owner_type_name, a.owner_instance_name, a.search_path_hash).cmp(&(
            b.owner_type_name,
            b.owner_instance_name,
            b.search_path_hash,
        ))
    });
    views
}

fn bucket_view(bucket: &LoadedBucket) -> BucketView<'_> {
    let fingerprint = bucket.fingerprint();
    let mut entries: Vec<EntryView<'_>> = bucket
        .entries()
        .iter()
        .map(|(name, entry)| EntryView {
            name,
            index: entry.index(),
            location_token: entry.location_token(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(b.name));

    BucketView {
        owner_type_name: fingerprint.owner_type_name(),
        owner_instance_name: fingerprint.owner_instance_name(),
        search_path_hash: fingerprint.search_path_hash(),
        entries,
    }
}
