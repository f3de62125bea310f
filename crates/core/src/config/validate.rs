use super::{types::Config, ConfigError};

/// Validate a loaded configuration beyond what deserialization enforces.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.search.min_query_len == 0 {
        return Err(ConfigError::Invalid(
            "search.min_query_len must be at least 1".to_string(),
        ));
    }

    if config.search.debounce_ms == 0 {
        return Err(ConfigError::Invalid(
            "search.debounce_ms must be greater than 0".to_string(),
        ));
    }

    if !matches!(config.backend.scheme.as_str(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "backend.scheme must be http or https, got '{}'",
            config.backend.scheme
        )));
    }

    if config.backend.host.is_empty() {
        return Err(ConfigError::Invalid(
            "backend.host must not be empty".to_string(),
        ));
    }

    if let Some(endpoint) = &config.catalog.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "catalog.endpoint must be an http(s) URL, got '{}'",
                endpoint
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::load_config_from_str;
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_min_query_len_rejected() {
        let config = load_config_from_str("[search]\nmin_query_len = 0").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_debounce_rejected() {
        let config = load_config_from_str("[search]\ndebounce_ms = 0").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_scheme_rejected() {
        let config = load_config_from_str("[backend]\nscheme = \"ftp\"").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_catalog_endpoint_rejected() {
        let config = load_config_from_str("[catalog]\nendpoint = \"not-a-url\"").unwrap();
        assert!(validate_config(&config).is_err());
    }
}
