//! Heuristic discovery of history databases under the user's home.
//!
//! A file is accepted when its name is exactly the family's history file
//! name and the path below the scan root mentions one of the family's
//! product names. Every call is a fresh scan; nothing is cached.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::HistoryConfig;
use crate::history::{BrowserFamily, HistoryStoreRef};

#[derive(Debug, Clone)]
pub struct StoreLocator {
    roots: Vec<PathBuf>,
    max_depth: usize,
    chromium_file: String,
    firefox_file: String,
    chromium_products: Vec<String>,
    firefox_products: Vec<String>,
}

impl StoreLocator {
    /// Resolve the configured scan roots against `home`.
    pub fn new(cfg: &HistoryConfig, home: &Path) -> Self {
        Self {
            roots: cfg.scan_roots.iter().map(|root| home.join(root)).collect(),
            max_depth: cfg.max_scan_depth,
            chromium_file: cfg.chromium_history_file.clone(),
            firefox_file: cfg.firefox_history_file.clone(),
            chromium_products: lowercase_all(&cfg.chromium_products),
            firefox_products: lowercase_all(&cfg.firefox_products),
        }
    }

    pub fn for_current_user(cfg: &HistoryConfig) -> Self {
        match dirs::home_dir() {
            Some(home) => Self::new(cfg, &home),
            None => {
                warn!("no home directory; nothing to scan");
                Self {
                    roots: Vec::new(),
                    ..Self::new(cfg, Path::new(""))
                }
            }
        }
    }

    /// Walk every root and return the deduplicated set of stores.
    pub fn locate(&self) -> BTreeSet<HistoryStoreRef> {
        let mut found = BTreeSet::new();
        for root in &self.roots {
            if !root.is_dir() {
                debug!("scan root absent: {}", root.display());
                continue;
            }
            self.scan_root(root, &mut found);
        }
        found
    }

    fn scan_root(&self, root: &Path, found: &mut BTreeSet<HistoryStoreRef>) {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(family) = self.classify(root, entry.path()) {
                debug!("found {family} history store: {}", entry.path().display());
                found.insert(HistoryStoreRef::new(family, entry.path()));
            }
        }
    }

    fn classify(&self, root: &Path, path: &Path) -> Option<BrowserFamily> {
        let name = path.file_name()?.to_str()?;
        // Only the part below the scan root counts, so a home directory
        // that happens to contain a product name does not match everything.
        let relative = path.strip_prefix(root).unwrap_or(path).parent()?;
        let haystack = relative.to_string_lossy().to_lowercase();

        if name == self.chromium_file && mentions_any(&haystack, &self.chromium_products) {
            Some(BrowserFamily::Chromium)
        } else if name == self.firefox_file && mentions_any(&haystack, &self.firefox_products) {
            Some(BrowserFamily::Firefox)
        } else {
            None
        }
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn mentions_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
