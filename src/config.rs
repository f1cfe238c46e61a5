use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    pub scan_roots: Vec<PathBuf>,
    pub max_scan_depth: usize,
    pub max_records: usize,
    pub chromium_history_file: String,
    pub firefox_history_file: String,
    pub chromium_products: Vec<String>,
    pub firefox_products: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    pub cache_subdir: String,
    pub file_name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub user_agent: String,
    pub probe_timeout_ms: u64,
    pub deadline_ms: u64,
    pub duckduckgo_endpoint: String,
    pub bing_endpoint: String,
    pub bing_excluded_domains: Vec<String>,
}

impl SearchConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Names stripped from the end of titles; shared by every title cleaner.
    pub app_names: Vec<String>,
    pub history: HistoryConfig,
    pub snapshot: SnapshotConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Default snapshot location: `<cache dir>/<cache_subdir>/<file_name>`.
    pub fn snapshot_path(&self) -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(&self.snapshot.cache_subdir)
            .join(&self.snapshot.file_name)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_hash: String,
}

pub fn load_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let bytes: Vec<u8> = if let Some(p) = path {
        std::fs::read(p).with_context(|| format!("reading config {}", p.display()))?
    } else {
        include_bytes!("../config/default.yml").to_vec()
    };

    let config: Config = serde_yaml::from_slice(&bytes).context("parsing config")?;
    validate(&config)?;

    let config_hash = hash_bytes(&bytes);

    Ok(LoadedConfig { config, config_hash })
}

fn validate(config: &Config) -> Result<()> {
    if config.app_names.iter().all(|name| name.trim().is_empty()) {
        bail!("config: app_names must not be empty");
    }
    if config.history.chromium_products.is_empty() {
        bail!("config: history.chromium_products must not be empty");
    }
    if config.history.firefox_products.is_empty() {
        bail!("config: history.firefox_products must not be empty");
    }
    if config.history.max_records == 0 {
        bail!("config: history.max_records must be greater than zero");
    }
    if config.search.probe_timeout_ms == 0 {
        bail!("config: search.probe_timeout_ms must be greater than zero");
    }
    if config.search.deadline_ms == 0 {
        bail!("config: search.deadline_ms must be greater than zero");
    }
    Ok(())
}

fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(digest)
}
