use crate::config::types::{CheckConfig, Config, EngineConfig, SitemapConfig};
use crate::ConfigError;

/// Upper bound accepted for engine concurrency
const MAX_CONCURRENCY_LIMIT: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sitemap_config(&config.sitemap)?;
    validate_check_config(&config.check)?;
    validate_engine_config(&config.engine)?;
    Ok(())
}

/// Validates sitemap fetching configuration
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout must be >= 1 second, got {}",
            config.request_timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the options forwarded to the engine
pub fn validate_check_config(config: &CheckConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, config.max_concurrency
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout
        )));
    }

    if let Some(position) = config.exclude.iter().position(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "exclude pattern #{} is empty",
            position + 1
        )));
    }

    Ok(())
}

/// Validates engine configuration
pub fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.program.trim().is_empty() {
        return Err(ConfigError::Validation(
            "engine program cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.config {
        if !path.is_file() {
            return Err(ConfigError::Validation(format!(
                "engine config file '{}' does not exist",
                path.display()
            )));
        }
    }

    Ok(())
}
