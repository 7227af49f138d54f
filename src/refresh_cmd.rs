//! Command implementations behind `srcache refresh`, `changes`, `review`
//! and `review-all`.
//!
//! Each command builds a fresh [`SourceCache`] from the configuration,
//! performs one round of work, and prints the outcome to stdout. Logging
//! goes to stderr so `--json` output stays machine-readable.

use anyhow::{bail, Context, Result};
use source_cache_core::models::{CacheRecord, ChangedFile, RecordKind};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::cache::SourceCache;
use crate::config::Config;
use crate::history;
use crate::resolver::Resolver;

fn open_cache(config: &Config) -> Result<SourceCache> {
    Ok(SourceCache::new(Resolver::from_config(config)?))
}

/// Resolve a single source, failing if it is unknown or unreachable.
async fn resolve_required(
    cache: &SourceCache,
    config: &Config,
    source_id: &str,
) -> Result<Arc<CacheRecord>> {
    if config.find_source(source_id).is_none() {
        bail!("Unknown source: '{}'", source_id);
    }
    match cache.refresh_one(config, source_id).await {
        Some(record) => Ok(record),
        None => bail!("No candidate of source '{}' could be resolved", source_id),
    }
}

fn summary_line(record: &CacheRecord) -> String {
    let detail = match record.kind() {
        RecordKind::File => format!(
            "{} bytes",
            record.contents.as_ref().map(|c| c.len()).unwrap_or(0)
        ),
        RecordKind::Directory => format!("{} changed", record.file_cache.len()),
    };
    format!(
        "{:<32} {:<10} {:<20} {:<14} {}",
        record.source_id,
        record.kind(),
        record.updated_date.format("%Y-%m-%dT%H:%M:%SZ"),
        detail,
        record.source_url
    )
}

pub async fn run_refresh(config: &Config, source_id: Option<&str>, json: bool) -> Result<()> {
    let cache = open_cache(config)?;

    let records: BTreeMap<String, Arc<CacheRecord>> = match source_id {
        Some(id) => {
            let record = resolve_required(&cache, config, id).await?;
            BTreeMap::from([(id.to_string(), record)])
        }
        None => cache.refresh_all(config).await.into_iter().collect(),
    };

    if json {
        let plain: BTreeMap<&str, &CacheRecord> = records
            .iter()
            .map(|(id, record)| (id.as_str(), record.as_ref()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&plain)?);
        return Ok(());
    }

    for record in records.values() {
        println!("{}", summary_line(record));
    }

    let failed: Vec<&str> = config
        .sources
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| source_id.map_or(true, |wanted| wanted == *id))
        .filter(|id| !records.contains_key(*id))
        .collect();
    println!(
        "refreshed {} source(s), {} unresolved",
        records.len(),
        failed.len()
    );
    for id in failed {
        println!("  unresolved: {}", id);
    }

    Ok(())
}

fn print_changes(changes: &[ChangedFile], json: bool) -> Result<()> {
    let mut sorted: Vec<&ChangedFile> = changes.iter().collect();
    sorted.sort_by(|a, b| a.file.cmp(&b.file));

    if json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    for change in &sorted {
        println!(
            "{}  {}",
            change.mtime.format("%Y-%m-%dT%H:%M:%SZ"),
            change.file
        );
    }
    println!("{} changed file(s)", sorted.len());
    Ok(())
}

pub async fn run_changes(config: &Config, source_id: &str, json: bool) -> Result<()> {
    let cache = open_cache(config)?;
    let record = resolve_required(&cache, config, source_id).await?;
    if !record.is_directory() {
        bail!(
            "Source '{}' resolved to a file ({}), not a directory",
            source_id,
            record.source_url
        );
    }
    print_changes(&record.file_cache, json)
}

pub async fn run_review(config: &Config, path: &Path) -> Result<()> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
    let written = history::mark_reviewed(&config.cache.history_dir, &absolute).await?;
    println!("reviewed {}", absolute.display());
    println!("  history: {}", written.display());
    Ok(())
}

pub async fn run_review_all(config: &Config, source_id: &str) -> Result<()> {
    let cache = open_cache(config)?;
    let record = resolve_required(&cache, config, source_id).await?;
    if !record.is_directory() {
        bail!("Source '{}' is not a directory source", source_id);
    }

    let count = history::mark_all_reviewed(
        &config.cache.history_dir,
        &record.local_file,
        &record.file_cache,
    )
    .await?;
    println!("reviewed {} file(s) in {}", count, record.local_file.display());
    Ok(())
}
