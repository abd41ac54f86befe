use reqwest::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Database path is not empty
/// - Source base URL is an absolute http(s) URL
/// - At least one system is configured, with a non-empty path
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    let base = Url::parse(&config.source.base_url).map_err(|e| {
        ConfigError::ValidationError(format!(
            "source.base_url '{}' is not a valid URL: {}",
            config.source.base_url, e
        ))
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::ValidationError(format!(
            "source.base_url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.source.systems.is_empty() {
        return Err(ConfigError::ValidationError(
            "source.systems must contain at least one system".to_string(),
        ));
    }

    for (system, path) in &config.source.systems {
        if system.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "source.systems contains an empty system key".to_string(),
            ));
        }
        if path.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "source.systems.{} has an empty path",
                system
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_database_path_fails() {
        let mut config = Config::default();
        config.database.path = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("database.path"));
    }

    #[test]
    fn test_validate_bad_base_url_fails() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(validate_config(&config).is_err());

        config.source.base_url = "ftp://example.com".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_validate_no_systems_fails() {
        let mut config = Config::default();
        config.source.systems.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("at least one system"));
    }

    #[test]
    fn test_validate_empty_system_path_fails() {
        let mut config = Config::default();
        config
            .source
            .systems
            .insert("n64".to_string(), "  ".to_string());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("source.systems.n64"));
    }
}
