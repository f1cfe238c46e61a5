//! Lock-free extraction of recent history rows.
//!
//! Browsers keep their history database open (and often locked) while
//! running, so the store is first copied into a private temporary directory
//! and only the copy is opened. Firefox keeps recent visits in the `-wal`
//! and `-shm` sidecars until a checkpoint, so those travel with the copy.
//! The temporary directory is removed when the reader returns, on every path.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tempfile::TempDir;
use tracing::debug;

use crate::history::{BrowserFamily, HistoryError, HistoryRecord, HistoryStoreRef};

/// Prefix of the temporary directories created for each read.
pub const TEMP_PREFIX: &str = "titlemap-history-";

const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

const CHROMIUM_QUERY: &str =
    "SELECT url, title, last_visit_time FROM urls ORDER BY last_visit_time DESC LIMIT ?1";
const FIREFOX_QUERY: &str = "SELECT url, title, last_visit_date FROM moz_places \
     WHERE title IS NOT NULL ORDER BY last_visit_date DESC LIMIT ?1";

#[derive(Debug, Clone)]
pub struct HistoryReader {
    max_records: usize,
    temp_root: Option<PathBuf>,
}

impl HistoryReader {
    pub fn new(max_records: usize) -> Self {
        Self {
            max_records,
            temp_root: None,
        }
    }

    /// Place temporary copies under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Read up to `max_records` rows from `store`, newest first.
    pub fn read(&self, store: &HistoryStoreRef) -> Result<Vec<HistoryRecord>, HistoryError> {
        let workspace = self.temp_workspace()?;
        let copy = copy_store(store, workspace.path())?;
        let records = query_copy(&copy, store.family, self.max_records);
        // `workspace` drops here and removes the copy and any sidecars,
        // whether or not the query succeeded.
        drop(workspace);
        records
    }

    fn temp_workspace(&self) -> Result<TempDir, HistoryError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

fn copy_store(store: &HistoryStoreRef, workspace: &Path) -> Result<PathBuf, HistoryError> {
    let file_name = store
        .path
        .file_name()
        .ok_or_else(|| HistoryError::InvalidPath(store.path.clone()))?;
    let copy = workspace.join(file_name);
    std::fs::copy(&store.path, &copy)?;

    if store.family == BrowserFamily::Firefox {
        for suffix in SIDECAR_SUFFIXES {
            let source = with_suffix(&store.path, suffix);
            if source.is_file() {
                std::fs::copy(&source, with_suffix(&copy, suffix))?;
                debug!("copied sidecar {}", source.display());
            }
        }
    }
    Ok(copy)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn query_copy(
    path: &Path,
    family: BrowserFamily,
    max_records: usize,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let (sql, to_datetime): (&str, fn(i64) -> Option<chrono::NaiveDateTime>) = match family {
        BrowserFamily::Chromium => (CHROMIUM_QUERY, webkit_timestamp_to_datetime),
        BrowserFamily::Firefox => (FIREFOX_QUERY, unix_micro_to_datetime),
    };
    let limit = i64::try_from(max_records).unwrap_or(i64::MAX);

    let mut out = Vec::new();
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([limit], |row| {
        let url: String = row.get(0)?;
        let title: Option<String> = row.get(1)?;
        let last_visit: Option<i64> = row.get(2)?;
        Ok((url, title, last_visit))
    })?;

    for row in rows {
        let (url, raw_title, last_visit) = row?;
        out.push(HistoryRecord {
            raw_title,
            url,
            visited_at: last_visit.and_then(to_datetime),
        });
    }

    Ok(out)
}

fn webkit_timestamp_to_datetime(microseconds: i64) -> Option<chrono::NaiveDateTime> {
    if microseconds <= 0 {
        return None;
    }
    let unix_offset_seconds = 11_644_473_600i64;
    let secs = microseconds / 1_000_000 - unix_offset_seconds;
    if secs < 0 {
        return None;
    }
    let nsecs = ((microseconds % 1_000_000).abs() as u32) * 1000;
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nsecs).map(|dt| dt.naive_utc())
}

fn unix_micro_to_datetime(microseconds: i64) -> Option<chrono::NaiveDateTime> {
    if microseconds <= 0 {
        return None;
    }
    let secs = microseconds / 1_000_000;
    let nsecs = ((microseconds % 1_000_000).abs() as u32) * 1000;
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, nsecs).map(|dt| dt.naive_utc())
}
