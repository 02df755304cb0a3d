//! Check orchestrator
//!
//! This module drives one run of the external link-checking engine:
//! - Writing the page URLs to a scratch file
//! - Invoking the engine with options derived from [`CheckOptions`]
//! - Decoding its JSON output into a [`CheckResult`]
//! - Optionally copying or summarising that output into a user-requested file
//!
//! Every call owns a private scratch directory that is removed when the call
//! returns, whatever the outcome.

mod engine;
mod lychee;

pub use engine::{EngineInvocation, EngineLink, EngineOutput, EngineStatus, LinkEngine};
pub use lychee::{LycheeEngine, LYCHEE_INSTALL_URL};

use crate::config::Config;
use crate::output::{format_check_markdown, OutputFormat};
use crate::sitemap::dedupe;
use crate::CheckError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Status label given to excluded links
pub const EXCLUDED_STATUS: &str = "excluded";

/// Scratch file holding the URLs handed to the engine
const URLS_FILE: &str = "urls.txt";

/// Scratch file the engine writes its JSON output to
const OUTPUT_FILE: &str = "output.json";

/// Options for a single orchestrator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub max_concurrency: u32,

    /// Per-link timeout (seconds), enforced by the engine
    pub timeout: u64,

    /// Patterns the engine should skip
    pub excludes: Vec<String>,

    /// Engine's own config file
    pub engine_config: Option<PathBuf>,

    pub format: OutputFormat,

    /// Where to copy the engine output, if anywhere
    pub output_file: Option<PathBuf>,

    /// Suppress the engine's progress display
    pub no_progress: bool,

    /// Log the full engine command line
    pub verbose: bool,

    /// Fail instead of assuming success when the engine writes no output
    pub require_output: bool,
}

/// Command-line values layered over the settings file
///
/// `None` and `false` leave the settings value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub max_concurrency: Option<u32>,
    pub timeout: Option<u64>,

    /// Added to the settings patterns
    pub excludes: Vec<String>,

    pub engine_config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub no_progress: bool,
    pub verbose: bool,
    pub require_output: bool,
}

impl CheckOptions {
    /// Builds options from the settings file values
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_concurrency: config.check.max_concurrency,
            timeout: config.check.timeout,
            excludes: dedupe(&config.check.exclude),
            engine_config: config.engine.config.clone(),
            format: config.output.format,
            output_file: config.output.path.clone(),
            no_progress: false,
            verbose: false,
            require_output: config.engine.require_output,
        }
    }

    /// Applies command-line overrides
    ///
    /// Scalar values replace the settings value when given. Exclude patterns
    /// from both sources are merged in first-seen order without duplicates.
    /// `require_output` holds if either source asks for it.
    pub fn with_overrides(self, overrides: OptionOverrides) -> Self {
        Self {
            max_concurrency: overrides.max_concurrency.unwrap_or(self.max_concurrency),
            timeout: overrides.timeout.unwrap_or(self.timeout),
            excludes: dedupe(self.excludes.iter().chain(&overrides.excludes)),
            engine_config: overrides.engine_config.or(self.engine_config),
            format: overrides.format.unwrap_or(self.format),
            output_file: overrides.output_file.or(self.output_file),
            no_progress: overrides.no_progress || self.no_progress,
            verbose: overrides.verbose || self.verbose,
            require_output: overrides.require_output || self.require_output,
        }
    }

    /// Options for checking one sitemap group
    ///
    /// Groups always use JSON, run quietly, and never write their own file;
    /// the grouped report is written once at the end instead.
    pub fn for_group(&self) -> Self {
        Self {
            format: OutputFormat::Json,
            output_file: None,
            no_progress: true,
            ..self.clone()
        }
    }
}

/// Which engine map a link came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOutcome {
    Success,
    Error,
    Excluded,
}

/// Status of one checked link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub url: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Page the link was found on
    pub source_url: String,
    pub outcome: LinkOutcome,
}

/// Result of one orchestrator call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed_count: usize,
    pub failed_count: usize,
    pub excluded_count: usize,
    pub links: Vec<LinkStatus>,

    /// Set when the engine left no output and success was assumed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub engine_output_missing: bool,
}

impl CheckResult {
    /// Returns true if the engine reported any broken links
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    /// Links from the engine's error map
    pub fn failed_links(&self) -> impl Iterator<Item = &LinkStatus> {
        self.links
            .iter()
            .filter(|link| link.outcome == LinkOutcome::Error)
    }
}

/// Runs page URLs through a link-checking engine
#[derive(Debug, Clone, Default)]
pub struct Checker<E = LycheeEngine> {
    engine: E,
}

impl<E: LinkEngine> Checker<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Checks every link on the given pages
    ///
    /// # Arguments
    ///
    /// * `urls` - Page URLs to hand to the engine
    /// * `options` - Engine and output options
    ///
    /// # Returns
    ///
    /// * `Ok(CheckResult)` - Counts and per-link statuses. An empty `urls`
    ///   yields an all-zero result without running the engine.
    /// * `Err(CheckError)` - The engine could not be run, its output could
    ///   not be decoded, or the requested output file could not be written
    pub fn check(&self, urls: &[String], options: &CheckOptions) -> Result<CheckResult, CheckError> {
        if urls.is_empty() {
            tracing::debug!("No URLs to check, skipping {}", self.engine.name());
            return Ok(CheckResult::default());
        }

        let scratch = tempfile::Builder::new().prefix("linkaudit-").tempdir()?;
        let urls_file = scratch.path().join(URLS_FILE);
        let output_file = scratch.path().join(OUTPUT_FILE);

        std::fs::write(&urls_file, urls.join("\n"))?;

        tracing::info!("Checking links on {} pages with {}", urls.len(), self.engine.name());
        self.engine.run(&EngineInvocation {
            urls_file: &urls_file,
            output_file: &output_file,
            options,
        })?;

        let bytes = match std::fs::read(&output_file) {
            Ok(bytes) => bytes,
            Err(e) => return self.missing_output(urls.len(), options, &e),
        };

        let output = EngineOutput::from_slice(&bytes).map_err(|source| CheckError::Decode {
            program: self.engine.name().to_string(),
            source,
        })?;

        let result = CheckResult {
            passed_count: output.successful,
            failed_count: output.errors,
            excluded_count: output.excludes,
            links: output.links(),
            engine_output_missing: false,
        };

        if let Some(path) = &options.output_file {
            let contents = if options.format.is_structured() {
                bytes
            } else {
                format_check_markdown(&output.totals(), urls.len()).into_bytes()
            };
            write_output_file(path, &contents)?;
        }

        Ok(result)
    }

    /// Handles an engine run that left no readable output file
    ///
    /// Unless output is required, this assumes the engine had nothing to
    /// report and counts every page as passed. A crashed engine looks the same,
    /// so the result is flagged and a warning is logged.
    fn missing_output(
        &self,
        page_count: usize,
        options: &CheckOptions,
        error: &std::io::Error,
    ) -> Result<CheckResult, CheckError> {
        if options.require_output {
            return Err(CheckError::MissingOutput {
                program: self.engine.name().to_string(),
            });
        }

        tracing::warn!(
            "{} left no JSON output ({}); assuming all {} pages passed",
            self.engine.name(),
            error,
            page_count
        );

        Ok(CheckResult {
            passed_count: page_count,
            engine_output_missing: true,
            ..CheckResult::default()
        })
    }
}

fn write_output_file(path: &Path, contents: &[u8]) -> Result<(), CheckError> {
    std::fs::write(path, contents).map_err(|source| CheckError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
