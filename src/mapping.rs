//! # Exact Mapping
//!
//! Builds the cleaned-title → URL table from every located history store and
//! persists it as the snapshot file consumed by the favicon renderer.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::history::HistoryStoreRef;
use crate::history::locate::StoreLocator;
use crate::history::sqlite_db::HistoryReader;
use crate::title::TitleCleaner;

/// Title → URL table. Insertion order is discovery order; the first URL seen
/// for a title is kept.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TitleUrlTable {
    entries: IndexMap<String, String>,
}

impl TitleUrlTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless `title` is already present. Returns whether it was added.
    pub fn insert_first(&mut self, title: String, url: String) -> bool {
        match self.entries.entry(title) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(url);
                true
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries.get(title).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(title, url)| (title.as_str(), url.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub stores_found: usize,
    pub stores_failed: usize,
    pub records_read: usize,
    pub entries: usize,
}

pub struct MappingBuilder<'a> {
    reader: &'a HistoryReader,
    cleaner: &'a TitleCleaner,
}

impl<'a> MappingBuilder<'a> {
    pub fn new(reader: &'a HistoryReader, cleaner: &'a TitleCleaner) -> Self {
        Self { reader, cleaner }
    }

    /// Read each store in order and merge its rows into one table.
    /// A store that cannot be read contributes nothing.
    pub fn build_table<'s, I>(&self, stores: I) -> (TitleUrlTable, BuildSummary)
    where
        I: IntoIterator<Item = &'s HistoryStoreRef>,
    {
        let mut table = TitleUrlTable::new();
        let mut summary = BuildSummary::default();

        for store in stores {
            summary.stores_found += 1;
            let records = match self.reader.read(store) {
                Ok(records) => records,
                Err(err) => {
                    summary.stores_failed += 1;
                    warn!(
                        "skipping {} store {}: {err}",
                        store.family,
                        store.path.display()
                    );
                    continue;
                }
            };
            debug!(
                "read {} records from {} (newest visit {:?})",
                records.len(),
                store.path.display(),
                records.first().and_then(|record| record.visited_at)
            );
            summary.records_read += records.len();

            for record in records {
                let Some(title) = self.cleaner.clean_opt(record.raw_title.as_deref()) else {
                    continue;
                };
                table.insert_first(title, record.url);
            }
        }

        summary.entries = table.len();
        (table, summary)
    }

    /// Locate stores, build the table and overwrite the snapshot at `snapshot_path`.
    pub fn run(&self, locator: &StoreLocator, snapshot_path: &Path) -> Result<BuildSummary> {
        let stores = locator.locate();
        info!("located {} history stores", stores.len());
        let (table, summary) = self.build_table(&stores);
        write_snapshot(&table, snapshot_path)?;
        info!(
            "wrote {} titles to {} ({} stores, {} failed, {} records)",
            summary.entries,
            snapshot_path.display(),
            summary.stores_found,
            summary.stores_failed,
            summary.records_read
        );
        Ok(summary)
    }
}

/// Write the table as a 2-space indented JSON object, replacing any
/// previous snapshot in place.
pub fn write_snapshot(table: &TitleUrlTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating snapshot directory {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating snapshot {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let map = serde_json::from_str(&content)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    Ok(map)
}
