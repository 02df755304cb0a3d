//! Audit module tying the resolver to the checker
//!
//! [`audit`] is the main entry point: it resolves a sitemap URL and checks
//! the pages it lists in either merged or grouped mode.

mod coordinator;

pub use coordinator::{run, run_grouped, run_merged, AuditStatus, RunMode};

use crate::checker::{CheckOptions, Checker, LinkEngine};
use crate::sitemap::{FetchResult, SitemapResolver};
use crate::AuditError;
use std::io::Write;

/// Resolves a sitemap and audits every page it lists
///
/// # Arguments
///
/// * `resolver` - Resolver used to fetch the sitemap and its children
/// * `checker` - Checker wrapping the link-checking engine
/// * `sitemap_url` - Sitemap or sitemap index URL
/// * `mode` - Merged or grouped checking
/// * `options` - Engine and output options
///
/// # Returns
///
/// * `Ok(AuditStatus)` - The audit ran; the status says whether links are broken
/// * `Err(AuditError)` - The sitemap could not be resolved or a check could not run
pub async fn audit<E: LinkEngine>(
    resolver: &SitemapResolver,
    checker: &Checker<E>,
    sitemap_url: &str,
    mode: RunMode,
    options: &CheckOptions,
) -> Result<AuditStatus, AuditError> {
    println!("Fetching sitemap from {}...", sitemap_url);
    let fetch = resolver.resolve(sitemap_url).await?;
    println!(
        "Found {} pages in {} sitemap(s)\n",
        fetch.all_urls.len(),
        fetch.sitemaps.len()
    );

    run(checker, &fetch, mode, options)
}

/// Writes resolved URLs without checking them
///
/// Merged mode lists the deduplicated URLs one per line. Grouped mode lists
/// each sitemap under a `=== <sitemap> (<n> URLs) ===` header, duplicates
/// included, followed by a blank line.
pub fn write_url_listing<W: Write>(
    out: &mut W,
    fetch: &FetchResult,
    mode: RunMode,
) -> std::io::Result<()> {
    match mode {
        RunMode::Grouped => {
            for group in &fetch.sitemaps {
                writeln!(out, "=== {} ({} URLs) ===", group.sitemap_url, group.urls.len())?;
                for url in &group.urls {
                    writeln!(out, "{}", url)?;
                }
                writeln!(out)?;
            }
        }
        RunMode::Merged => {
            for url in &fetch.all_urls {
                writeln!(out, "{}", url)?;
            }
        }
    }

    Ok(())
}
