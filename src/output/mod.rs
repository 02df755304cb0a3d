//! Output module for audit reports
//!
//! This module handles:
//! - The report formats a user can ask for
//! - The grouped-mode report and its JSON/markdown rendering
//! - Human-readable summaries printed at the end of a run

mod markdown;
mod report;
mod summary;

pub use markdown::{format_check_markdown, format_report_markdown, LinkTotals};
pub use report::{write_report, Report, SitemapReport, SkippedGroup};
pub use summary::{print_check_summary, print_group_outcome, print_report_summary};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Report format requested by the user
///
/// `Compact` is the engine's terse console style; when written to a file it
/// falls back to the structured JSON.
///
/// Parsing is case-insensitive and accepts `md` for markdown, on the command
/// line and in the settings file alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    #[default]
    Compact,
    Json,
    Markdown,
}

impl OutputFormat {
    /// Returns true if files in this format are the engine's raw JSON
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Compact | Self::Json)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(format!(
                "unknown format '{}' (expected compact, json, or markdown)",
                other
            )),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Compact => "compact",
            Self::Json => "json",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}
