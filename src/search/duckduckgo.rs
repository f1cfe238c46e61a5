use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::{HttpSettings, ProbeOutcome, SearchEngine, SearchProbe, registrable_host, unescape_attr};

static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a\s[^>]*>").expect("anchor pattern"));
static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).expect("href pattern"));

/// Class marker on organic result links in the lite HTML page.
const RESULT_MARKER: &str = "result-link";
/// Query parameter carrying the destination in redirect links.
const REDIRECT_PARAM: &str = "uddg";

/// Engine A: DuckDuckGo lite.
pub struct DuckDuckGoProbe {
    endpoint: String,
    http: HttpSettings,
}

impl DuckDuckGoProbe {
    pub fn new(endpoint: impl Into<String>, http: HttpSettings) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }
}

impl SearchProbe for DuckDuckGoProbe {
    fn engine(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }

    fn probe(&self, query: &str) -> ProbeOutcome {
        match self.http.fetch(&self.endpoint, query) {
            Ok(body) => ProbeOutcome::from_domain(extract_domain(&body)),
            Err(err) => {
                debug!("duckduckgo probe failed: {err}");
                ProbeOutcome::Failed(err)
            }
        }
    }
}

/// Domain of the first result link in a lite results page.
pub fn extract_domain(body: &str) -> Option<String> {
    ANCHOR_RE
        .find_iter(body)
        .map(|m| m.as_str())
        .filter(|tag| tag.contains(RESULT_MARKER))
        .filter_map(|tag| HREF_RE.captures(tag).map(|caps| unescape_attr(&caps[1])))
        .filter_map(|href| resolve_link(&href))
        .find_map(|link| registrable_host(&link))
}

/// Turn a result href into an absolute destination URL, unwrapping the
/// `/l/?uddg=` redirect when present.
fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };
    let url = Url::parse(&absolute).ok()?;

    let is_redirect = url
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"))
        && url.path().starts_with("/l/");
    if is_redirect {
        return url
            .query_pairs()
            .find(|(key, _)| key == REDIRECT_PARAM)
            .map(|(_, value)| value.into_owned());
    }
    Some(absolute)
}
