//! Sitemap resolver
//!
//! This module turns a sitemap URL into the page URLs it publishes:
//! - Fetching the document with an XML-only `Accept` header
//! - Classifying it as a sitemap index or a leaf URL set
//! - Resolving each child of an index (one level deep) as a leaf URL set
//! - Grouping URLs by originating sitemap and building a deduplicated flat list
//!
//! A failing child sitemap never fails the whole resolution. It is logged,
//! recorded in [`FetchResult::skipped`], and contributes no URLs.

mod fetcher;
mod parser;

pub use fetcher::{build_http_client, fetch_document, XML_ACCEPT};
pub use parser::{classify_document, parse_index, parse_urlset, SitemapDocument, XmlError};

use crate::config::SitemapConfig;
use crate::SitemapError;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// URLs published by a single sitemap, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapGroup {
    /// Location of the leaf sitemap the URLs came from
    pub sitemap_url: String,

    /// Page URLs, duplicates included
    pub urls: Vec<String>,
}

/// A child sitemap that could not be fetched or parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSitemap {
    pub sitemap_url: String,
    pub reason: String,
}

/// Outcome of resolving a sitemap URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResult {
    /// Leaf sitemaps in discovery order
    pub sitemaps: Vec<SitemapGroup>,

    /// Every page URL across all groups, each exactly once, in first-seen order
    pub all_urls: Vec<String>,

    /// Child sitemaps that were skipped
    pub skipped: Vec<SkippedSitemap>,
}

impl FetchResult {
    /// Builds a result from resolved groups, deriving the flat URL list
    pub fn from_groups(sitemaps: Vec<SitemapGroup>, skipped: Vec<SkippedSitemap>) -> Self {
        let all_urls = dedupe(sitemaps.iter().flat_map(|group| group.urls.iter()));
        Self {
            sitemaps,
            all_urls,
            skipped,
        }
    }

    /// Looks up the group for a sitemap location
    pub fn group(&self, sitemap_url: &str) -> Option<&SitemapGroup> {
        self.sitemaps
            .iter()
            .find(|group| group.sitemap_url == sitemap_url)
    }

    /// Returns true if no page URLs were found
    pub fn is_empty(&self) -> bool {
        self.all_urls.is_empty()
    }
}

/// Fetches and resolves sitemaps over HTTP
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    /// Creates a resolver with a client built from the sitemap configuration
    pub fn new(config: &SitemapConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a resolver around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Resolves a sitemap or sitemap index into page URLs
    ///
    /// # Arguments
    ///
    /// * `sitemap_url` - Absolute http(s) URL of the sitemap or sitemap index
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResult)` - Grouped and flat URLs, plus any skipped children
    /// * `Err(SitemapError)` - The top-level document could not be fetched or parsed
    pub async fn resolve(&self, sitemap_url: &str) -> Result<FetchResult, SitemapError> {
        validate_sitemap_url(sitemap_url)?;

        let body = fetch_document(&self.client, sitemap_url).await?;
        let document = classify_document(&body).map_err(|source| SitemapError::Parse {
            url: sitemap_url.to_string(),
            source,
        })?;

        let result = match document {
            SitemapDocument::UrlSet(urls) => {
                tracing::debug!("{} is a URL set with {} entries", sitemap_url, urls.len());
                FetchResult::from_groups(
                    vec![SitemapGroup {
                        sitemap_url: sitemap_url.to_string(),
                        urls,
                    }],
                    Vec::new(),
                )
            }
            SitemapDocument::Index(children) => {
                tracing::info!(
                    "{} is a sitemap index with {} entries",
                    sitemap_url,
                    children.len()
                );
                self.resolve_children(children).await
            }
        };

        if !result.skipped.is_empty() {
            tracing::warn!(
                "Skipped {} of the sitemaps listed in {}",
                result.skipped.len(),
                sitemap_url
            );
        }

        Ok(result)
    }

    /// Resolves every child of an index as a leaf URL set
    async fn resolve_children(&self, children: Vec<String>) -> FetchResult {
        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        let mut skipped = Vec::new();

        for child in children {
            if !seen.insert(child.clone()) {
                tracing::debug!("Ignoring repeated index entry {}", child);
                continue;
            }

            match self.fetch_leaf(&child).await {
                Ok(urls) => {
                    tracing::debug!("{} lists {} URLs", child, urls.len());
                    groups.push(SitemapGroup {
                        sitemap_url: child,
                        urls,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping sitemap {}: {}", child, e);
                    skipped.push(SkippedSitemap {
                        sitemap_url: child,
                        reason: e.to_string(),
                    });
                }
            }
        }

        FetchResult::from_groups(groups, skipped)
    }

    /// Fetches a child sitemap and reads it as a URL set
    async fn fetch_leaf(&self, url: &str) -> Result<Vec<String>, SitemapError> {
        let body = fetch_document(&self.client, url).await?;
        parse_urlset(&body).map_err(|source| SitemapError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

/// Checks that a top-level sitemap URL is absolute http(s)
fn validate_sitemap_url(sitemap_url: &str) -> Result<(), SitemapError> {
    let parsed = Url::parse(sitemap_url).map_err(|e| SitemapError::InvalidUrl {
        url: sitemap_url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SitemapError::InvalidUrl {
            url: sitemap_url.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Removes duplicate URLs, keeping the first occurrence of each
///
/// URLs are compared as opaque strings.
pub fn dedupe<'a, I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(*url))
        .cloned()
        .collect()
}
