//! Run controller - merged and grouped audit modes
//!
//! Both modes feed resolver output into the checker:
//! - Merged mode checks the deduplicated flat URL list in one engine run
//! - Grouped mode checks each sitemap group separately and collects a
//!   [`Report`]; a group whose check fails is recorded and skipped

use crate::checker::{CheckOptions, CheckResult, Checker, LinkEngine};
use crate::output::{
    print_check_summary, print_group_outcome, print_report_summary, write_report, OutputFormat,
    Report,
};
use crate::sitemap::FetchResult;
use crate::{AuditError, CheckError};

/// How resolver output is handed to the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// One engine run over every unique URL
    #[default]
    Merged,
    /// One engine run per sitemap group
    Grouped,
}

/// Overall outcome of an audit, as seen by calling scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    /// No broken links
    Clean,
    /// At least one broken link
    LinksBroken,
}

impl AuditStatus {
    /// Process exit code for a run that completed
    pub const CLEAN_EXIT: u8 = 0;
    pub const BROKEN_LINKS_EXIT: u8 = 2;

    /// Process exit code for a run that could not complete
    pub const ERROR_EXIT: u8 = 1;

    pub fn from_failures(has_failures: bool) -> Self {
        if has_failures {
            Self::LinksBroken
        } else {
            Self::Clean
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Clean => Self::CLEAN_EXIT,
            Self::LinksBroken => Self::BROKEN_LINKS_EXIT,
        }
    }
}

/// Runs an audit over resolved sitemap URLs in the given mode
///
/// In grouped mode the report is written to `options.output_file` when set.
pub fn run<E: LinkEngine>(
    checker: &Checker<E>,
    fetch: &FetchResult,
    mode: RunMode,
    options: &CheckOptions,
) -> Result<AuditStatus, AuditError> {
    let status = match mode {
        RunMode::Merged => {
            let result = run_merged(checker, fetch, options)?;
            AuditStatus::from_failures(result.has_failures())
        }
        RunMode::Grouped => {
            let report = run_grouped(checker, fetch, options);
            if let Some(path) = &options.output_file {
                write_report(&report, path, options.format)?;
            }
            AuditStatus::from_failures(report.has_failures())
        }
    };

    Ok(status)
}

/// Checks every unique URL in a single engine run
pub fn run_merged<E: LinkEngine>(
    checker: &Checker<E>,
    fetch: &FetchResult,
    options: &CheckOptions,
) -> Result<CheckResult, CheckError> {
    let result = checker.check(&fetch.all_urls, options)?;

    // The engine's own display is the summary unless it was suppressed
    if options.no_progress || options.format == OutputFormat::Json {
        print_check_summary(fetch.all_urls.len(), &result);
    }

    Ok(result)
}

/// Checks each sitemap group in its own engine run
///
/// A group whose check returns an error is logged and recorded in
/// [`Report::skipped`]; the remaining groups still run.
pub fn run_grouped<E: LinkEngine>(
    checker: &Checker<E>,
    fetch: &FetchResult,
    options: &CheckOptions,
) -> Report {
    let group_options = options.for_group();
    let mut report = Report::new();

    for group in &fetch.sitemaps {
        println!(
            "Checking {} ({} pages)...",
            group.sitemap_url,
            group.urls.len()
        );

        match checker.check(&group.urls, &group_options) {
            Ok(result) => {
                print_group_outcome(&result);
                report.add(&group.sitemap_url, group.urls.len(), result);
            }
            Err(e) => {
                tracing::error!("Check of {} failed: {}", group.sitemap_url, e);
                report.skip(&group.sitemap_url, e.to_string());
            }
        }
    }

    print_report_summary(&report);
    report
}
