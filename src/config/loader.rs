//! Configuration loading from disk.
//!
//! Serde handles the syntactic checks; `validate` runs the semantic ones
//! and reports every problem it finds, not just the first.

use std::fs;
use std::path::Path;

use thiserror::Error;
use url::Url;

use crate::config::schema::HarnessConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: HarnessConfig = toml::from_str(&content)?;

    let problems = validate(&config);
    if !problems.is_empty() {
        return Err(ConfigError::Validation(problems));
    }

    Ok(config)
}

fn validate(config: &HarnessConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if config.concurrency_urls.is_empty() {
        problems.push("concurrency_urls must not be empty".to_string());
    }
    if config.connect_timeout_secs == 0 {
        problems.push("connect_timeout_secs must be non-zero".to_string());
    }
    if config.settle_secs == 0 {
        problems.push("settle_secs must be non-zero".to_string());
    }
    if config.grace_secs == 0 {
        problems.push("grace_secs must be non-zero".to_string());
    }

    let urls = std::iter::once(&config.reference_url)
        .chain(std::iter::once(&config.cache_url))
        .chain(config.concurrency_urls.iter());
    for url in urls {
        match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "http" => {}
            Ok(parsed) => problems.push(format!(
                "{url}: unsupported scheme {:?}, only http is spoken",
                parsed.scheme()
            )),
            Err(e) => problems.push(format!("{url}: {e}")),
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&HarnessConfig::default()).is_empty());
    }

    #[test]
    fn empty_url_list_is_rejected() {
        let config = HarnessConfig {
            concurrency_urls: Vec::new(),
            ..HarnessConfig::default()
        };
        let problems = validate(&config);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("concurrency_urls"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let config = HarnessConfig {
            reference_url: "ftp://example.org/".to_string(),
            ..HarnessConfig::default()
        };
        assert!(!validate(&config).is_empty());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = HarnessConfig::default();
        let encoded = toml::to_string(&config).unwrap();
        let decoded: HarnessConfig = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.reference_url, config.reference_url);
        assert_eq!(decoded.concurrency_urls, config.concurrency_urls);
        assert_eq!(decoded.settle_secs, config.settle_secs);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let decoded: HarnessConfig = toml::from_str("settle_secs = 1\n").unwrap();
        assert_eq!(decoded.settle_secs, 1);
        assert_eq!(decoded.grace_secs, HarnessConfig::default().grace_secs);
        assert!(!decoded.concurrency_urls.is_empty());
    }
}
