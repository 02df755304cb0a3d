//! Link-checking engine contract
//!
//! The engine is an opaque external capability. It reads a line-delimited file
//! of page URLs, checks every link on those pages, and writes a JSON summary to
//! the path it was given. Everything else about it (crawling, retries, HTTP
//! validation) is its own business.

use crate::checker::{CheckOptions, LinkOutcome, LinkStatus, EXCLUDED_STATUS};
use crate::output::LinkTotals;
use crate::CheckError;
use serde::de::Unexpected;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Files and options for one engine run
#[derive(Debug, Clone, Copy)]
pub struct EngineInvocation<'a> {
    /// Line-delimited page URLs to check
    pub urls_file: &'a Path,

    /// Where the engine must write its JSON output
    pub output_file: &'a Path,

    pub options: &'a CheckOptions,
}

/// An external link-checking engine
///
/// `run` returns once the engine has exited. An engine that ran and found
/// broken links is still a successful run; only a failure to execute the
/// engine at all is an error.
pub trait LinkEngine {
    /// Name used in logs and error messages
    fn name(&self) -> &str;

    /// Runs the engine to completion
    fn run(&self, invocation: &EngineInvocation<'_>) -> Result<(), CheckError>;
}

/// Status attached to a link in the engine output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineStatus {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub code: Option<u16>,
}

/// A single link in the engine output
#[derive(Debug, Clone, Deserialize)]
pub struct EngineLink {
    pub url: String,

    #[serde(default)]
    pub status: EngineStatus,
}

/// JSON document written by the engine
///
/// The three maps are keyed by the page the links were found on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineOutput {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub excludes: usize,
    pub success_map: HashMap<String, Vec<EngineLink>>,
    pub error_map: HashMap<String, Vec<EngineLink>>,
    pub excluded_map: HashMap<String, Vec<EngineLink>>,
}

impl EngineOutput {
    /// Decodes the engine's JSON output
    ///
    /// Only a JSON object is accepted. Any other top-level value is a decode
    /// error, even one serde could map onto the fields positionally.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        if !value.is_object() {
            return Err(serde::de::Error::invalid_type(
                unexpected(&value),
                &"a JSON object",
            ));
        }
        serde_json::from_value(value)
    }

    /// Headline counts
    pub fn totals(&self) -> LinkTotals {
        LinkTotals {
            total: self.total,
            successful: self.successful,
            errors: self.errors,
            excludes: self.excludes,
        }
    }

    /// Flattens all three maps into per-link records
    ///
    /// Excluded links carry no status of their own and are labelled
    /// [`EXCLUDED_STATUS`].
    pub fn links(&self) -> Vec<LinkStatus> {
        let mut links = Vec::new();

        for (outcome, map) in [
            (LinkOutcome::Success, &self.success_map),
            (LinkOutcome::Error, &self.error_map),
        ] {
            for (source_url, entries) in map {
                links.extend(entries.iter().map(|link| LinkStatus {
                    url: link.url.clone(),
                    status: link.status.text.clone(),
                    code: link.status.code,
                    source_url: source_url.clone(),
                    outcome,
                }));
            }
        }

        for (source_url, entries) in &self.excluded_map {
            links.extend(entries.iter().map(|link| LinkStatus {
                url: link.url.clone(),
                status: EXCLUDED_STATUS.to_string(),
                code: None,
                source_url: source_url.clone(),
                outcome: LinkOutcome::Excluded,
            }));
        }

        links
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
