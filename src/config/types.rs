use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::PathBuf;

/// Default HTTP timeout for sitemap fetches, in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Default engine concurrency
pub const DEFAULT_MAX_CONCURRENCY: u32 = 20;

/// Default per-link engine timeout, in seconds
pub const DEFAULT_CHECK_TIMEOUT: u64 = 30;

/// Default link-checking engine executable
pub const DEFAULT_ENGINE_PROGRAM: &str = "lychee";

/// Main configuration structure for Linkaudit
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sitemap: SitemapConfig,
    pub check: CheckConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

/// Sitemap fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    /// HTTP timeout for each sitemap request (seconds)
    pub request_timeout: u64,

    /// User agent sent with sitemap requests
    pub user_agent: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("linkaudit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Options forwarded to the link-checking engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CheckConfig {
    /// Maximum concurrent requests made by the engine
    pub max_concurrency: u32,

    /// Per-link timeout (seconds)
    pub timeout: u64,

    /// URL patterns the engine should skip
    pub exclude: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout: DEFAULT_CHECK_TIMEOUT,
            exclude: Vec::new(),
        }
    }
}

/// External engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Executable name or path
    pub program: String,

    /// Engine's own config file, passed through untouched
    pub config: Option<PathBuf>,

    /// Treat a missing JSON output file as an error instead of a clean run
    pub require_output: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENGINE_PROGRAM.to_string(),
            config: None,
            require_output: false,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where to write the report, if anywhere
    pub path: Option<PathBuf>,

    /// Report format
    pub format: OutputFormat,
}
