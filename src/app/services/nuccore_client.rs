//! Remote retrieval of GenBank entries from NCBI nuccore
//!
//! The client only downloads text. The caller parses the body exactly as it
//! would parse a file, so fetch failures ([`Error::Fetch`], [`Error::Http`])
//! stay distinct from content errors.

use crate::config::FetchConfig;
use crate::constants::IDS_PLACEHOLDER;
use crate::{Error, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

/// GI numbers or accessions with an optional version (`U49845`, `NC_000913.3`)
static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+|[A-Za-z]{1,2}_?\d+(?:\.\d+)?)$").expect("identifier pattern is valid")
});

/// Validated, non-empty list of record identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeIds(Vec<String>);

impl GenomeIds {
    /// Validate each identifier
    pub fn new<I, T>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(Error::invalid_identifier(""));
        }
        if let Some(bad) = ids.iter().find(|id| !IDENTIFIER_PATTERN.is_match(id)) {
            return Err(Error::invalid_identifier(bad.as_str()));
        }
        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form used in the request URL
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

/// Parses a comma and/or whitespace separated list
impl FromStr for GenomeIds {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|id| !id.is_empty()),
        )
    }
}

impl fmt::Display for GenomeIds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

/// HTTP client for the nuccore efetch endpoint
#[derive(Debug, Clone)]
pub struct NuccoreClient {
    client: reqwest::Client,
    url_template: String,
    timeout: Duration,
}

impl NuccoreClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        if !config.nuccore_url.contains(IDS_PLACEHOLDER) {
            return Err(Error::configuration(format!(
                "nuccore URL template must contain {}",
                IDS_PLACEHOLDER
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gbparse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::http("Failed to build HTTP client", e))?;

        Ok(Self {
            client,
            url_template: config.nuccore_url.clone(),
            timeout,
        })
    }

    /// Request URL for `ids`
    pub fn request_url(&self, ids: &GenomeIds) -> String {
        self.url_template.replace(IDS_PLACEHOLDER, &ids.joined())
    }

    /// Download the flat-file text for `ids`
    ///
    /// Any status other than 200 is a [`Error::Fetch`].
    pub async fn fetch_text(&self, ids: &GenomeIds) -> Result<String> {
        let url = self.request_url(ids);
        info!("Fetching {} record(s) from {}", ids.len(), url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::http(
                    format!("Request timed out after {}s: {}", self.timeout.as_secs(), url),
                    e,
                )
            } else {
                Error::http(format!("Request failed: {}", url), e)
            }
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::fetch(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response body from {}", url), e))?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
