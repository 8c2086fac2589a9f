use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Backend URL is http(s)
/// - Librarian temperature is within 0.0..=2.0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let api_url = config.backend.api_url.trim();
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "backend.api_url must be an http(s) URL, got '{}'",
            config.backend.api_url
        )));
    }

    if !(0.0..=2.0).contains(&config.librarian.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "librarian.temperature must be between 0.0 and 2.0, got {}",
            config.librarian.temperature
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ServerConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_backend_url_scheme() {
        let config = Config {
            backend: BackendConfig {
                api_url: "localhost:5000/api".to_string(),
                ..BackendConfig::default()
            },
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("backend.api_url"));
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = Config::default();
        config.librarian.temperature = 3.5;
        assert!(validate_config(&config).is_err());

        config.librarian.temperature = 0.0;
        assert!(validate_config(&config).is_ok());
    }
}
