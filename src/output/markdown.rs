//! Markdown report generation
//!
//! Markdown output is a summary only. Per-link detail stays in the JSON.

use crate::output::report::Report;

/// Link counts reported by the engine for one invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTotals {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub excludes: usize,
}

/// Formats the summary of a single check as markdown
///
/// # Arguments
///
/// * `totals` - Counts reported by the engine
/// * `page_count` - Number of pages handed to the engine
pub fn format_check_markdown(totals: &LinkTotals, page_count: usize) -> String {
    let mut md = String::new();

    md.push_str("# Link Audit Report\n\n");
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Pages checked**: {}\n", page_count));
    md.push_str(&format!("- **Total links**: {}\n", totals.total));
    md.push_str(&format!("- **Passed**: {}\n", totals.successful));
    md.push_str(&format!("- **Failed**: {}\n", totals.errors));
    md.push_str(&format!("- **Excluded**: {}\n", totals.excludes));
    md.push('\n');

    if totals.errors == 0 {
        md.push_str("All links are valid!\n");
    } else {
        md.push_str("See JSON output for failure details.\n");
    }

    md
}

/// Formats a grouped-mode report as markdown
pub fn format_report_markdown(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Link Audit Report\n\n");
    md.push_str(&format!(
        "Generated: {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Sitemaps checked**: {}\n", report.sitemaps.len()));
    md.push_str(&format!("- **Total pages**: {}\n", report.total_pages));
    md.push_str(&format!("- **Passed**: {}\n", report.total_passed));
    md.push_str(&format!("- **Failed**: {}\n", report.total_failed));
    md.push_str(&format!("- **Excluded**: {}\n\n", report.total_excluded));

    if !report.sitemaps.is_empty() {
        md.push_str("## Sitemaps\n\n");
        md.push_str("| Sitemap | Pages | Passed | Failed | Excluded |\n");
        md.push_str("|---------|-------|--------|--------|----------|\n");

        for entry in &report.sitemaps {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                entry.sitemap_url,
                entry.page_count,
                entry.result.passed_count,
                entry.result.failed_count,
                entry.result.excluded_count
            ));
        }
        md.push('\n');
    }

    let broken: Vec<_> = report
        .sitemaps
        .iter()
        .flat_map(|entry| entry.result.failed_links())
        .collect();
    if !broken.is_empty() {
        md.push_str("## Broken Links\n\n");
        md.push_str("| URL | Status | Found On |\n");
        md.push_str("|-----|--------|----------|\n");

        for link in broken {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                link.url, link.status, link.source_url
            ));
        }
        md.push('\n');
    }

    if !report.skipped.is_empty() {
        md.push_str("## Skipped Sitemaps\n\n");
        for skipped in &report.skipped {
            md.push_str(&format!("- {}: {}\n", skipped.sitemap_url, skipped.reason));
        }
        md.push('\n');
    }

    md
}
