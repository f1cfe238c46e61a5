//! # Title Cleaning
//!
//! Strips trailing browser/application decoration (`"Page - Google Chrome"`)
//! so that titles taken from history stores and titles handed in by callers
//! compare equal. Both the snapshot builder and the search fallback go
//! through [`TitleCleaner`]; it must be built from the same name list on
//! both sides.

use anyhow::{Result, bail};
use regex::Regex;

use crate::config::Config;

/// Separators that may precede an application name at the end of a title.
const SEPARATORS: &str = "-—·";

#[derive(Debug, Clone)]
pub struct TitleCleaner {
    suffix: Regex,
}

impl TitleCleaner {
    pub fn new<S: AsRef<str>>(app_names: &[S]) -> Result<Self> {
        let mut names: Vec<&str> = app_names
            .iter()
            .map(|name| name.as_ref().trim())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            bail!("title cleaner needs at least one application name");
        }
        // Longest first so "Mozilla Firefox" is preferred over "Firefox".
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        names.dedup();

        let alternatives: Vec<String> = names.iter().map(|name| regex::escape(name)).collect();
        let pattern = format!(
            r"(?i)\s*[{}]\s*(?:{})\s*$",
            regex::escape(SEPARATORS),
            alternatives.join("|")
        );
        Ok(Self {
            suffix: Regex::new(&pattern)?,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.app_names)
    }

    /// Returns the cleaned title, or `None` when nothing meaningful is left.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let stripped = self.suffix.replace(raw, "");
        let trimmed = stripped.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn clean_opt(&self, raw: Option<&str>) -> Option<String> {
        raw.and_then(|raw| self.clean(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> TitleCleaner {
        let cfg = crate::config::load_config(None).expect("config").config;
        TitleCleaner::from_config(&cfg).expect("cleaner")
    }

    #[test]
    fn strips_browser_suffix() {
        let c = cleaner();
        assert_eq!(c.clean("X - Google Chrome").as_deref(), Some("X"));
        assert_eq!(
            c.clean("Rust Programming Language — Mozilla Firefox").as_deref(),
            Some("Rust Programming Language")
        );
        assert_eq!(c.clean("Inbox · Brave").as_deref(), Some("Inbox"));
    }

    #[test]
    fn strips_every_configured_shell_and_browser_name() {
        let c = cleaner();
        for name in [
            "Chrome",
            "Zen",
            "Zen Browser",
            "Mullvad",
            "Tor Browser",
            "Web Browser",
            "Browser",
            "Quickshell",
            "Antigravity",
            "Opera",
            "Edge",
        ] {
            let title = format!("X - {name}");
            assert_eq!(c.clean(&title).as_deref(), Some("X"), "suffix {name}");
        }
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        let c = cleaner();
        assert_eq!(c.clean("Docs - google chrome").as_deref(), Some("Docs"));
        assert_eq!(c.clean("Docs - VIVALDI  ").as_deref(), Some("Docs"));
    }

    #[test]
    fn clean_title_is_unchanged() {
        let c = cleaner();
        assert_eq!(c.clean("Example Domain").as_deref(), Some("Example Domain"));
        let once = c.clean("News - Firefox").expect("cleaned");
        assert_eq!(c.clean(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn only_trailing_suffix_is_removed() {
        let c = cleaner();
        assert_eq!(
            c.clean("Chromium - build notes").as_deref(),
            Some("Chromium - build notes")
        );
        assert_eq!(
            c.clean("Edge cases - Opera").as_deref(),
            Some("Edge cases")
        );
    }

    #[test]
    fn blank_results_are_absent() {
        let c = cleaner();
        assert_eq!(c.clean("   "), None);
        assert_eq!(c.clean(""), None);
        assert_eq!(c.clean("- Brave"), None);
        assert_eq!(c.clean_opt(None), None);
    }

    #[test]
    fn rejects_empty_name_list() {
        let names: [&str; 1] = ["  "];
        assert!(TitleCleaner::new(&names).is_err());
    }
}
