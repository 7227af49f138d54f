use anyhow::{Context, Result};
use serde::Deserialize;
use source_cache_core::models::SourceDefinition;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config dir.
const APP_DIR: &str = "source-cache";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: Vec<SourceDefinition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Where fetched network candidates are persisted, one file per source.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
    /// Root of the mirrored history tree.
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            history_dir: default_history_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".source-cache"))
}

fn default_cache_dir() -> PathBuf {
    app_config_dir().join("cache")
}
fn default_history_dir() -> PathBuf {
    app_config_dir().join("history")
}
fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Configuration with no sources and default directories.
    pub fn minimal() -> Self {
        Self::default()
    }

    pub fn find_source(&self, id: &str) -> Option<&SourceDefinition> {
        self.sources.iter().find(|s| s.id == id)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.fetch.timeout_secs == 0 {
        anyhow::bail!("fetch.timeout_secs must be > 0");
    }

    let mut seen = HashSet::new();
    for source in &config.sources {
        if source.id.trim().is_empty() {
            anyhow::bail!("sources[].id must not be empty");
        }
        if source.work_url.trim().is_empty() {
            anyhow::bail!("source '{}' has an empty work_url", source.id);
        }
        if !seen.insert(source.id.as_str()) {
            anyhow::bail!("duplicate source id: '{}'", source.id);
        }
    }

    Ok(config)
}
