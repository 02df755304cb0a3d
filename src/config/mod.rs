//! Configuration module for Linkaudit
//!
//! This module handles loading, parsing, and validating the optional TOML
//! settings file. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use linkaudit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkaudit.toml")).unwrap();
//! println!("Engine concurrency: {}", config.check.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CheckConfig, Config, EngineConfig, OutputConfig, SitemapConfig, DEFAULT_CHECK_TIMEOUT,
    DEFAULT_ENGINE_PROGRAM, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::{validate, validate_check_config, validate_engine_config};
