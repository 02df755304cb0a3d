//! HTTP fetcher for sitemap documents
//!
//! This module handles all HTTP requests made by the resolver:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests that ask explicitly for XML, so sites that render an HTML
//!   view of their sitemap still hand back the raw document
//! - Status checking (anything but 200 is a failure)

use crate::config::SitemapConfig;
use crate::SitemapError;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Accept header sent with every sitemap request
pub const XML_ACCEPT: &str = "application/xml, text/xml";

/// Builds an HTTP client for sitemap requests
///
/// # Example
///
/// ```no_run
/// use linkaudit::config::SitemapConfig;
/// use linkaudit::sitemap::build_http_client;
///
/// let client = build_http_client(&SitemapConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SitemapConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a sitemap document and returns its body
///
/// Transport failures, non-200 responses, and unreadable bodies are errors.
pub async fn fetch_document(client: &Client, url: &str) -> Result<String, SitemapError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .header(ACCEPT, XML_ACCEPT)
        .send()
        .await
        .map_err(|source| SitemapError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SitemapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| SitemapError::Http {
        url: url.to_string(),
        source,
    })
}
