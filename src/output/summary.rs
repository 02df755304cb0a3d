//! Console summaries
//!
//! These go to stdout alongside the engine's own progress output.

use crate::checker::CheckResult;
use crate::output::report::Report;

/// Prints the one-line summary of a merged run
pub fn print_check_summary(page_count: usize, result: &CheckResult) {
    println!(
        "\nPages checked: {} | Passed: {} | Failed: {} | Excluded: {}",
        page_count, result.passed_count, result.failed_count, result.excluded_count
    );
}

/// Prints the outcome of checking one sitemap group
pub fn print_group_outcome(result: &CheckResult) {
    if result.has_failures() {
        println!("  FAILED: {} broken links", result.failed_count);
    } else {
        println!("  OK: {} links passed", result.passed_count);
    }
}

/// Prints the totals of a grouped run
pub fn print_report_summary(report: &Report) {
    println!("\n=== Summary ===");
    println!(
        "Total pages: {} | Passed: {} | Failed: {}",
        report.total_pages, report.total_passed, report.total_failed
    );

    if !report.skipped.is_empty() {
        println!("Skipped sitemaps ({}):", report.skipped.len());
        for skipped in &report.skipped {
            println!("  - {}: {}", skipped.sitemap_url, skipped.reason);
        }
    }
}
