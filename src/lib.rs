//! Linkaudit: sitemap-driven link auditing
//!
//! This crate resolves a website's sitemap (or sitemap index) into page URLs and
//! hands them to an external link-checking engine, turning the engine's output
//! into a merged or per-sitemap pass/fail report.

pub mod audit;
pub mod checker;
pub mod config;
pub mod output;
pub mod sitemap;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Linkaudit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    #[error("Link check failed: {0}")]
    Check(#[from] CheckError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while fetching and classifying sitemap documents
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Invalid sitemap URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to fetch sitemap {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Sitemap {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse sitemap XML from {url}: {source}")]
    Parse {
        url: String,
        source: sitemap::XmlError,
    },
}

/// Errors raised by a single orchestrator invocation
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to prepare scratch files: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed to parse {program} output: {source}")]
    Decode {
        program: String,
        source: serde_json::Error,
    },

    #[error("{program} finished without writing its JSON output")]
    MissingOutput { program: String },

    #[error("Failed to write output file {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Linkaudit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use audit::{run_grouped, run_merged, AuditStatus};
pub use checker::{
    CheckOptions, CheckResult, Checker, LinkEngine, LinkStatus, LycheeEngine, OptionOverrides,
};
pub use config::Config;
pub use output::{OutputFormat, Report};
pub use sitemap::{FetchResult, SitemapResolver};
