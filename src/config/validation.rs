use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::url::is_valid_url;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    config.crawler.validate()?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

impl CrawlerConfig {
    /// Checks the options that would make a crawl impossible
    ///
    /// A zero concurrency bound or timeout is a configuration error and is
    /// reported before any fetch is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_url(&self.seed) {
            return Err(ConfigError::InvalidUrl(format!(
                "seed must be an absolute URL with a host, got '{}'",
                self.seed
            )));
        }

        if self.max_concurrent_fetches < 1 {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_fetches must be >= 1, got {}",
                self.max_concurrent_fetches
            )));
        }

        if self.fetch_timeout < 1 {
            return Err(ConfigError::Validation(format!(
                "fetch_timeout must be >= 1 second, got {}",
                self.fetch_timeout
            )));
        }

        Ok(())
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        if !is_valid_url(contact_url) {
            return Err(ConfigError::InvalidUrl(format!(
                "Invalid contact_url: '{}'",
                contact_url
            )));
        }
    }

    Ok(())
}
