//! Pack index retrieval and parsing.
//!
//! The vendor publishes its pack catalog as a plain HTML listing; each
//! downloadable pack is an anchor of the form
//!
//! ```text
//! <a href="Microchip.SAML10_DFP.3.5.87.atpack" download="">
//! ```
//!
//! The schema is owned by the vendor and treated as fragile: entries that
//! do not match the expected naming are logged and skipped, but a document
//! with no pack links at all is a hard parse failure.

use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};
use crate::pack::DevicePack;

/// Default pack repository index URL.
pub const DEFAULT_INDEX_URL: &str = "https://packs.download.microchip.com/";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP client for the vendor's pack index.
#[derive(Debug)]
pub struct IndexClient {
    client: Client,
    index_url: String,
    timeout: Duration,
}

impl Default for IndexClient {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL)
    }
}

impl IndexClient {
    /// Create a client for the given index URL with the default timeout.
    pub fn new(index_url: impl Into<String>) -> Self {
        Self::with_timeout(index_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(index_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client,
            index_url: index_url.into(),
            timeout,
        }
    }

    /// The index URL this client reads from.
    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    /// Retrieve and parse the pack index.
    ///
    /// Performs one GET of the index document. Transport failures and
    /// non-success statuses map to [`FetchError::IndexFetchFailed`] (or
    /// [`FetchError::Timeout`]); a document without any pack links maps to
    /// [`FetchError::IndexParseFailed`].
    pub fn fetch(&self) -> FetchResult<Vec<DevicePack>> {
        let response = self.client.get(&self.index_url).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: self.index_url.clone(),
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::IndexFetchFailed {
                    url: self.index_url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::IndexFetchFailed {
                url: self.index_url.clone(),
                reason: format!("request failed with status {}", status),
            });
        }

        let body = response.text().map_err(|e| FetchError::IndexFetchFailed {
            url: self.index_url.clone(),
            reason: format!("failed to read response body: {}", e),
        })?;

        parse_index(&self.index_url, &body)
    }
}

/// Parse pack download links out of an index document.
///
/// Only anchors carrying a `download` attribute and an `.atpack` href count
/// as pack links. Links whose filename does not follow the vendor naming
/// scheme are skipped with a warning rather than failing the run.
pub fn parse_index(index_url: &str, html: &str) -> FetchResult<Vec<DevicePack>> {
    // Unwraps are fine here: the patterns are fixed at compile time.
    let anchor_re = Regex::new(r"(?is)<a\s[^>]*>").unwrap();
    let href_re = Regex::new(r#"(?i)href\s*=\s*"([^"]+\.atpack)""#).unwrap();
    // Attribute position only: the index host's own name contains the word
    // "download", so require preceding whitespace.
    let download_attr_re = Regex::new(r"(?i)\sdownload\s*[=>\s/]").unwrap();

    let mut packs = Vec::new();
    let mut saw_pack_link = false;

    for anchor in anchor_re.find_iter(html) {
        let tag = anchor.as_str();

        if !download_attr_re.is_match(tag) {
            continue;
        }
        let Some(href) = href_re.captures(tag).map(|c| c[1].to_string()) else {
            continue;
        };

        saw_pack_link = true;
        match DevicePack::from_href(index_url, &href) {
            Ok(pack) => {
                debug!(family = %pack.family, version = %pack.version, "parsed pack link");
                packs.push(pack);
            }
            Err(e) => {
                warn!("skipping malformed pack link: {}", e);
            }
        }
    }

    if !saw_pack_link {
        return Err(FetchError::IndexParseFailed {
            url: index_url.to_string(),
            reason: "no pack download links found in index document".to_string(),
        });
    }

    Ok(packs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://packs.download.microchip.com/";

    #[test]
    fn test_parse_index_basic() {
        let html = r#"
            <html><body>
            <a href="Microchip.SAML10_DFP.3.5.87.atpack" download="">SAML10</a>
            <a href="Microchip.SAMD21_DFP.3.6.144.atpack" download="">SAMD21</a>
            </body></html>
        "#;

        let packs = parse_index(BASE, html).unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].family, "SAML10_DFP");
        assert_eq!(packs[1].family, "SAMD21_DFP");
        assert_eq!(
            packs[0].url,
            "https://packs.download.microchip.com/Microchip.SAML10_DFP.3.5.87.atpack"
        );
    }

    #[test]
    fn test_parse_index_ignores_anchors_without_download_attr() {
        let html = r#"
            <a href="Microchip.SAML10_DFP.3.5.87.atpack" download>keep</a>
            <a href="Microchip.SAMD21_DFP.3.6.144.atpack">nav link, not a download</a>
        "#;

        let packs = parse_index(BASE, html).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].family, "SAML10_DFP");
    }

    #[test]
    fn test_parse_index_ignores_non_pack_hrefs() {
        let html = r#"
            <a href="readme.html" download="">docs</a>
            <a href="Microchip.SAML10_DFP.3.5.87.atpack" download="">pack</a>
        "#;

        let packs = parse_index(BASE, html).unwrap();
        assert_eq!(packs.len(), 1);
    }

    #[test]
    fn test_parse_index_skips_malformed_names() {
        // One good link, one with the wrong field count. The run continues
        // with the good entry.
        let html = r#"
            <a href="Microchip.SAML10_DFP.3.5.87.atpack" download="">ok</a>
            <a href="Microchip.BROKEN.atpack" download="">bad</a>
        "#;

        let packs = parse_index(BASE, html).unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].family, "SAML10_DFP");
    }

    #[test]
    fn test_parse_index_no_links_is_error() {
        let html = "<html><body><p>maintenance page</p></body></html>";

        let result = parse_index(BASE, html);
        assert!(matches!(
            result,
            Err(FetchError::IndexParseFailed { .. })
        ));
    }

    #[test]
    fn test_parse_index_host_name_is_not_a_download_attr() {
        // The href contains the word "download" but the anchor has no
        // download attribute.
        let html = r#"<a href="https://packs.download.microchip.com/Microchip.SAML10_DFP.3.5.87.atpack">x</a>"#;

        assert!(parse_index(BASE, html).is_err());
    }

    #[test]
    fn test_client_configuration() {
        let client = IndexClient::with_timeout("https://example.com/", Duration::from_secs(3));
        assert_eq!(client.index_url(), "https://example.com/");

        let default = IndexClient::default();
        assert_eq!(default.index_url(), DEFAULT_INDEX_URL);
    }
}
