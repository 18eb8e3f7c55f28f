//! Record identifiers from Lightning record page URLs

use once_cell::sync::Lazy;
use regex::Regex;

// `/r/<Object>/<recordId>/view`, `/r/<Object>/<recordId>?...`
static RECORD_PAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/r/[^/?#]+/([A-Za-z0-9]+)(?:[/?#]|$)").expect("record page pattern is valid")
});

/// Record id embedded in a Lightning record page URL
///
/// Returns `None` when the URL is not a record page.
#[must_use]
pub fn record_id_from_url(url: &str) -> Option<&str> {
    let id = RECORD_PAGE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());
    if id.is_none() {
        tracing::warn!(url, "no record id found in URL");
    }
    id
}
