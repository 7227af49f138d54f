use anyhow::Result;
use source_cache_core::uri;

use crate::config::Config;

/// Where a candidate URI points, judged from its text alone.
pub fn location_label(candidate: &str) -> &'static str {
    if !uri::is_global_uri(candidate) {
        "invalid"
    } else if uri::is_local_file_or_loopback(candidate) {
        "local"
    } else {
        "remote"
    }
}

/// One row per configured source, as printed by `srcache sources`.
pub fn source_rows(config: &Config) -> Vec<(String, usize, &'static str, String)> {
    config
        .sources
        .iter()
        .map(|s| {
            (
                s.id.clone(),
                s.candidates().count(),
                location_label(&s.work_url),
                s.work_url.clone(),
            )
        })
        .collect()
}

pub fn list_sources(config: &Config) -> Result<()> {
    if config.sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }

    println!(
        "{:<32} {:<10} {:<8} WORK_URL",
        "SOURCE", "CANDIDATES", "LOCATION"
    );
    for (id, candidates, location, work_url) in source_rows(config) {
        println!("{:<32} {:<10} {:<8} {}", id, candidates, location, work_url);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_cache_core::models::SourceDefinition;

    #[test]
    fn test_location_labels() {
        assert_eq!(location_label("file:///tmp/a"), "local");
        assert_eq!(location_label("http://localhost:8080/a"), "local");
        assert_eq!(location_label("https://example.org/a"), "remote");
        assert_eq!(location_label("/tmp/a"), "invalid");
    }

    #[test]
    fn test_rows_count_all_candidates() {
        let config = Config {
            sources: vec![SourceDefinition::new("s1", "file:///a")
                .with_url("https://example.org/a")
                .with_url("file:///b")],
            ..Config::minimal()
        };
        let rows = source_rows(&config);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1, 3);
        assert_eq!(rows[0].2, "local");
    }
}
