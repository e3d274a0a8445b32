//! Company profile fetcher: the only network I/O in the system.
//!
//! No retries. The caller imposes the timeout via [`fetch_with_timeout`];
//! every failure comes back as a `FetchError` value.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("tailor/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Company pages beyond this size are truncated; title and meta tags sit at
/// the top.
pub const MAX_PROFILE_BYTES: usize = 2 * 1024 * 1024;

/// Raw company data resolved from a URL. Interpreting it is the extraction
/// strategy's job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Resolves a company URL to its raw profile. Swap implementations without
/// touching the cover-letter pipeline.
#[async_trait]
pub trait CompanyProfileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<CompanyProfile, FetchError>;
}

/// Plain HTTP GET via reqwest. Reads at most `body_limit` bytes of the page.
#[derive(Clone)]
pub struct HttpProfileFetcher {
    client: Client,
    body_limit: usize,
}

impl HttpProfileFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            body_limit: MAX_PROFILE_BYTES,
        })
    }

    #[allow(dead_code)]
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }
}

#[async_trait]
impl CompanyProfileFetcher for HttpProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<CompanyProfile, FetchError> {
        let parsed = parse_company_url(url)?;
        debug!("Fetching company profile from {}", parsed.host_str().unwrap_or_default());

        let response = self.client.get(parsed.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = read_capped(response, self.body_limit).await?;

        info!("Fetched company profile: {} bytes", body.len());
        Ok(CompanyProfile {
            url: parsed.to_string(),
            content_type,
            body,
        })
    }
}

/// Reads chunks until the body ends or `limit` bytes are held, then decodes
/// lossily (a cut may split a multi-byte character).
async fn read_capped(mut response: Response, limit: usize) -> Result<String, FetchError> {
    let declared = response
        .content_length()
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0);
    if declared > limit {
        debug!("Company page declares {declared} bytes; keeping the first {limit}");
    }

    let mut buf: Vec<u8> = Vec::with_capacity(declared.min(limit));
    while let Some(chunk) = response.chunk().await? {
        let room = limit - buf.len();
        if chunk.len() >= room {
            buf.extend_from_slice(&chunk[..room]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Accepts absolute http(s) URLs only.
pub fn parse_company_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(FetchError::InvalidUrl(format!(
            "{url}: expected an http(s) URL with a host"
        )));
    }
    Ok(parsed)
}

/// Runs `fetcher` under `timeout`. An elapsed timer drops the request future.
pub async fn fetch_with_timeout(
    fetcher: &dyn CompanyProfileFetcher,
    url: &str,
    timeout: Duration,
) -> Result<CompanyProfile, FetchError> {
    tokio::time::timeout(timeout, fetcher.fetch(url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))?
}

/// Serves one canned profile for every URL; for tests of code above the fetcher.
#[cfg(test)]
pub struct StaticProfileFetcher(pub Result<CompanyProfile, u16>);

#[cfg(test)]
#[async_trait]
impl CompanyProfileFetcher for StaticProfileFetcher {
    async fn fetch(&self, url: &str) -> Result<CompanyProfile, FetchError> {
        match &self.0 {
            Ok(profile) => Ok(CompanyProfile {
                url: url.to_string(),
                ..profile.clone()
            }),
            Err(status) => Err(FetchError::Status(*status)),
        }
    }
}
