//! # Search Probes
//!
//! Each probe issues one scraping query to a public search engine and
//! reports the domain of the first plausible result. Results depend on the
//! engine's incidental HTML, so "no answer" is an ordinary outcome.

pub mod bing;
pub mod duckduckgo;

use std::fmt;
use std::time::Duration;

use url::Url;

/// Which engine produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    DuckDuckGo,
    Bing,
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchEngine::DuckDuckGo => f.write_str("duckduckgo"),
            SearchEngine::Bing => f.write_str("bing"),
        }
    }
}

/// Result of a single probe. `NoResult` and `Failed` are both treated as
/// absent by the resolver but kept apart for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Domain(String),
    NoResult,
    Failed(String),
}

impl ProbeOutcome {
    pub fn domain(&self) -> Option<&str> {
        match self {
            ProbeOutcome::Domain(domain) => Some(domain),
            ProbeOutcome::NoResult | ProbeOutcome::Failed(_) => None,
        }
    }

    fn from_domain(domain: Option<String>) -> Self {
        domain.map_or(ProbeOutcome::NoResult, ProbeOutcome::Domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub engine: SearchEngine,
    pub outcome: ProbeOutcome,
}

pub trait SearchProbe: Send + Sync {
    fn engine(&self) -> SearchEngine;
    /// Never panics or errors; failures are folded into the outcome.
    fn probe(&self, query: &str) -> ProbeOutcome;
}

/// Shared HTTP settings for both engines.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
}

impl HttpSettings {
    pub fn from_config(cfg: &crate::config::SearchConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            timeout: cfg.probe_timeout(),
        }
    }

    /// GET `endpoint` + url-encoded `query` and return the body.
    fn fetch(&self, endpoint: &str, query: &str) -> Result<String, String> {
        let url = format!("{endpoint}{}", urlencoding::encode(query));
        let agent = ureq::AgentBuilder::new()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build();

        match agent.get(&url).call() {
            Ok(response) => response
                .into_string()
                .map_err(|e| format!("failed to read body: {e}")),
            Err(ureq::Error::Status(code, _)) => Err(format!("HTTP error {code}")),
            Err(ureq::Error::Transport(transport)) => Err(format!("transport error: {transport}")),
        }
    }
}

/// Host of an absolute http(s) URL, lowercased, without a leading `www.`.
pub fn registrable_host(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// Undo the entity escaping search pages apply inside attribute values.
fn unescape_attr(value: &str) -> String {
    // `&amp;` last, so an escaped entity stays literal.
    value
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
