use super::{types::Config, ConfigError};

use crate::catalog::ListKind;

/// Validate configuration
/// Currently validates:
/// - Sources section exists (enforced by serde)
/// - Every source URL is non-empty
/// - Fetch timeout is not 0
/// - Page size is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    for kind in ListKind::ALL {
        if config.sources.url_for(kind).trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "sources.{} cannot be empty",
                kind.as_str()
            )));
        }
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.view.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "view.page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchConfig, SourcesConfig, StorageConfig, ViewConfig};

    fn valid_config() -> Config {
        Config {
            sources: SourcesConfig {
                demonlist: "https://example.com/demon.csv".to_string(),
                pemonlist: "https://example.com/pemon.csv".to_string(),
                impossiblelist: "https://example.com/impossible.csv".to_string(),
            },
            fetch: FetchConfig::default(),
            view: ViewConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_source_fails() {
        let mut config = valid_config();
        config.sources.pemonlist = "  ".to_string();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = valid_config();
        config.fetch.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_page_size_fails() {
        let mut config = valid_config();
        config.view.page_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
