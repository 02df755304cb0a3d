//! Grouped-mode report
//!
//! One entry per sitemap that was checked, plus aggregate totals. Groups whose
//! check could not run are listed separately and do not count toward totals.

use crate::checker::CheckResult;
use crate::output::markdown::format_report_markdown;
use crate::output::{OutputFormat, OutputResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Check outcome for a single sitemap
#[derive(Debug, Clone, Serialize)]
pub struct SitemapReport {
    pub sitemap_url: String,
    pub page_count: usize,
    pub result: CheckResult,
}

/// A sitemap group whose check invocation failed
#[derive(Debug, Clone, Serialize)]
pub struct SkippedGroup {
    pub sitemap_url: String,
    pub reason: String,
}

/// Complete per-sitemap audit report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub sitemaps: Vec<SitemapReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedGroup>,
    pub total_pages: usize,
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_excluded: usize,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Creates an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            sitemaps: Vec::new(),
            skipped: Vec::new(),
            total_pages: 0,
            total_passed: 0,
            total_failed: 0,
            total_excluded: 0,
            generated_at: Utc::now(),
        }
    }

    /// Appends a checked sitemap and folds it into the totals
    pub fn add(&mut self, sitemap_url: &str, page_count: usize, result: CheckResult) {
        self.total_pages += page_count;
        self.total_passed += result.passed_count;
        self.total_failed += result.failed_count;
        self.total_excluded += result.excluded_count;

        self.sitemaps.push(SitemapReport {
            sitemap_url: sitemap_url.to_string(),
            page_count,
            result,
        });
    }

    /// Records a sitemap whose check could not run
    pub fn skip(&mut self, sitemap_url: &str, reason: impl Into<String>) {
        self.skipped.push(SkippedGroup {
            sitemap_url: sitemap_url.to_string(),
            reason: reason.into(),
        });
    }

    /// Returns true if any checked sitemap reported broken links
    pub fn has_failures(&self) -> bool {
        self.sitemaps
            .iter()
            .any(|entry| entry.result.has_failures())
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a report to disk
///
/// Markdown gets the rendered summary; every other format gets pretty JSON.
pub fn write_report(report: &Report, path: &Path, format: OutputFormat) -> OutputResult<()> {
    let bytes = if format.is_structured() {
        serde_json::to_vec_pretty(report)?
    } else {
        format_report_markdown(report).into_bytes()
    };

    std::fs::write(path, bytes)?;
    tracing::info!("Report written to {}", path.display());

    Ok(())
}
