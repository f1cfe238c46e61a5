//! Shared fixtures for history and snapshot tests.
//!
//! Builds minimal Chromium and Firefox history databases inside a fake home
//! directory laid out the way the browsers lay out their profiles.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use titlemap::config::{self, Config};

/// WebKit timestamp (µs since 1601) for a Unix time in seconds.
pub fn webkit_time(unix_secs: i64) -> i64 {
    (unix_secs + 11_644_473_600) * 1_000_000
}

/// Unix time in microseconds, as Firefox stores it.
pub fn firefox_time(unix_secs: i64) -> i64 {
    unix_secs * 1_000_000
}

pub fn default_config() -> Config {
    config::load_config(None).expect("config").config
}

/// Create a Chromium `History` file under `<home>/.config/<product>/Default`.
pub fn chromium_store(home: &Path, product: &str, rows: &[(&str, &str, i64)]) -> PathBuf {
    let dir = home.join(".config").join(product).join("Default");
    fs::create_dir_all(&dir).expect("profile dir");
    let path = dir.join("History");
    let conn = Connection::open(&path).expect("conn");
    conn.execute(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY, url TEXT NOT NULL, title TEXT NOT NULL DEFAULT '', last_visit_time INTEGER NOT NULL)",
        [],
    )
    .expect("create urls");
    for (url, title, time) in rows {
        conn.execute(
            "INSERT INTO urls (url, title, last_visit_time) VALUES (?1, ?2, ?3)",
            (url, title, webkit_time(*time)),
        )
        .expect("insert url");
    }
    path
}

/// Create a Firefox `places.sqlite` under `<home>/.mozilla/firefox/<profile>`.
pub fn firefox_store(home: &Path, profile: &str, rows: &[(&str, Option<&str>, i64)]) -> PathBuf {
    let dir = home.join(".mozilla").join("firefox").join(profile);
    fs::create_dir_all(&dir).expect("profile dir");
    let path = dir.join("places.sqlite");
    let conn = Connection::open(&path).expect("conn");
    conn.execute(
        "CREATE TABLE moz_places (id INTEGER PRIMARY KEY, url TEXT, title TEXT, last_visit_date INTEGER)",
        [],
    )
    .expect("create moz_places");
    for (url, title, time) in rows {
        conn.execute(
            "INSERT INTO moz_places (url, title, last_visit_date) VALUES (?1, ?2, ?3)",
            (url, title, firefox_time(*time)),
        )
        .expect("insert place");
    }
    path
}

/// Entries left behind in `dir`.
pub fn leftovers(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .expect("read_dir")
        .map(|entry| entry.expect("entry").path())
        .collect()
}
