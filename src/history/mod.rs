//! # History Module
//!
//! Discovery of browser history databases on disk ([`locate`]) and safe
//! extraction of recent `(title, url)` rows from them ([`sqlite_db`]).

pub mod locate;
pub mod sqlite_db;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Schema family of a history database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    /// `urls` table keyed by `last_visit_time`.
    Chromium,
    /// `moz_places` table keyed by `last_visit_date`.
    Firefox,
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserFamily::Chromium => f.write_str("chromium"),
            BrowserFamily::Firefox => f.write_str("firefox"),
        }
    }
}

/// A located history database. Identity is `(family, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HistoryStoreRef {
    pub family: BrowserFamily,
    pub path: PathBuf,
}

impl HistoryStoreRef {
    pub fn new(family: BrowserFamily, path: impl Into<PathBuf>) -> Self {
        Self {
            family,
            path: path.into(),
        }
    }
}

/// One history row, as read from a store (newest first).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub raw_title: Option<String>,
    pub url: String,
    pub visited_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("history store has no file name: {0}")]
    InvalidPath(PathBuf),
}
