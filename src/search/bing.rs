use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{HttpSettings, ProbeOutcome, SearchEngine, SearchProbe, registrable_host, unescape_attr};

static OUTBOUND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*["'](https?://[^"']+)["']"#).expect("link pattern")
});

/// Engine B: Bing. Takes the first outbound link that is not Bing's own.
pub struct BingProbe {
    endpoint: String,
    excluded: Vec<String>,
    http: HttpSettings,
}

impl BingProbe {
    pub fn new(endpoint: impl Into<String>, excluded: &[String], http: HttpSettings) -> Self {
        Self {
            endpoint: endpoint.into(),
            excluded: excluded
                .iter()
                .map(|domain| domain.trim().to_ascii_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
            http,
        }
    }

    /// Domain of the first outbound result link in a results page.
    pub fn extract_domain(&self, body: &str) -> Option<String> {
        OUTBOUND_RE
            .captures_iter(body)
            .map(|caps| unescape_attr(&caps[1]))
            .filter_map(|link| registrable_host(&link))
            .find(|host| !self.is_excluded(host))
    }

    fn is_excluded(&self, host: &str) -> bool {
        self.excluded.iter().any(|domain| {
            host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}

impl SearchProbe for BingProbe {
    fn engine(&self) -> SearchEngine {
        SearchEngine::Bing
    }

    fn probe(&self, query: &str) -> ProbeOutcome {
        match self.http.fetch(&self.endpoint, query) {
            Ok(body) => ProbeOutcome::from_domain(self.extract_domain(&body)),
            Err(err) => {
                debug!("bing probe failed: {err}");
                ProbeOutcome::Failed(err)
            }
        }
    }
}
