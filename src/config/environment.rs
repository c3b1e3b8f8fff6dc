//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use tracing::Level;

use super::{parse_number, var_or, ConfigError};

/// Configuración del entorno
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: Level,
    pub cors_origins: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            log_level: Level::INFO,
            cors_origins: Vec::new(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde el entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = var_or(&lookup, "LOG_LEVEL", "info");
        let log_level = log_level
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidValue {
                key: "LOG_LEVEL",
                value: log_level,
            })?;

        Ok(Self {
            environment: var_or(&lookup, "ENVIRONMENT", "development"),
            port: parse_number(&lookup, "SERVER_PORT", "8080")?,
            host: var_or(&lookup, "HOST", "0.0.0.0"),
            log_level,
            cors_origins: var_or(&lookup, "CORS_ORIGINS", "")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EnvironmentConfig::default());
        assert!(!config.is_production());
        assert_eq!(config.server_url(), "0.0.0.0:8080");
    }

    #[test]
    fn test_reads_every_variable() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("ENVIRONMENT", "production"),
            ("SERVER_PORT", "3000"),
            ("HOST", "127.0.0.1"),
            ("LOG_LEVEL", "debug"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com,"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.port, 3000);
        assert_eq!(config.server_url(), "127.0.0.1:3000");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = EnvironmentConfig::from_lookup(lookup(&[("SERVER_PORT", "abc")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "SERVER_PORT",
                value: "abc".to_string()
            }
        );

        let err = EnvironmentConfig::from_lookup(lookup(&[("LOG_LEVEL", "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "LOG_LEVEL", .. }));
    }
}
