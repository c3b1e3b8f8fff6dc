//! Configuración de notificaciones
//!
//! Canales de email (SMTP) y push, habilitados por variables de entorno.

use std::env;

use super::{parse_number, var_or, ConfigError};

/// Configuración para envío de emails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 8025,
            username: String::new(),
            password: String::new(),
            sender: String::new(),
        }
    }
}

/// Configuración para notificaciones push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub smtp: SmtpConfig,
    pub push: PushConfig,
}

impl NotificationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            email_enabled: lookup("EMAIL_ENABLED").as_deref() == Some("true"),
            push_enabled: lookup("PUSH_ENABLED").as_deref() == Some("true"),
            smtp: SmtpConfig {
                host: var_or(&lookup, "SMTP_HOST", ""),
                port: parse_number(&lookup, "SMTP_PORT", "8025")?,
                username: var_or(&lookup, "SMTP_USERNAME", ""),
                password: var_or(&lookup, "SMTP_PASSWORD", ""),
                sender: var_or(&lookup, "SMTP_SENDER", ""),
            },
            push: PushConfig {
                api_url: var_or(&lookup, "PUSH_API_URL", ""),
                api_key: var_or(&lookup, "PUSH_API_KEY", ""),
            },
        })
    }

    /// Verificar que los canales habilitados tengan lo necesario
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.email_enabled {
            if self.smtp.host.is_empty() {
                return Err(ConfigError::Missing("SMTP host is required for email notifications"));
            }
            if self.smtp.username.is_empty() {
                return Err(ConfigError::Missing("SMTP username is required for email notifications"));
            }
        }

        if self.push_enabled && self.push.api_url.is_empty() {
            return Err(ConfigError::Missing("push API URL is required for push notifications"));
        }

        Ok(())
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

    fn complete() -> NotificationConfig {
        NotificationConfig {
            email_enabled: true,
            push_enabled: true,
            smtp: SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "usuario".to_string(),
                password: "clave".to_string(),
                sender: "remitente@example.com".to_string(),
            },
            push: PushConfig {
                api_url: "https://push.example.com".to_string(),
                api_key: "token".to_string(),
            },
        }
    }

    #[test]
    fn test_loads_configuration_from_variables() {
        let config = NotificationConfig::from_lookup(lookup(&[
            ("EMAIL_ENABLED", "true"),
            ("PUSH_ENABLED", "true"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "usuario_prueba"),
            ("SMTP_PASSWORD", "clave_prueba"),
            ("SMTP_SENDER", "remitente@example.com"),
            ("PUSH_API_URL", "https://push.example.com"),
            ("PUSH_API_KEY", "token_push"),
        ]))
        .unwrap();

        assert!(config.email_enabled);
        assert!(config.push_enabled);
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.username, "usuario_prueba");
        assert_eq!(config.smtp.port, 8025);
        assert_eq!(config.push.api_url, "https://push.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channels_disabled_unless_exactly_true() {
        let config = NotificationConfig::from_lookup(lookup(&[
            ("EMAIL_ENABLED", "yes"),
            ("PUSH_ENABLED", "TRUE"),
        ]))
        .unwrap();
        assert!(!config.email_enabled);
        assert!(!config.push_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_smtp_port() {
        let err = NotificationConfig::from_lookup(lookup(&[("SMTP_PORT", "smtp")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "SMTP_PORT", .. }));
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        assert!(complete().validate().is_ok());

        let cases = [
            (
                NotificationConfig {
                    smtp: SmtpConfig { host: String::new(), ..complete().smtp },
                    ..complete()
                },
                "SMTP host is required for email notifications",
            ),
            (
                NotificationConfig {
                    smtp: SmtpConfig { username: String::new(), ..complete().smtp },
                    ..complete()
                },
                "SMTP username is required for email notifications",
            ),
            (
                NotificationConfig {
                    push: PushConfig::default(),
                    ..complete()
                },
                "push API URL is required for push notifications",
            ),
        ];

        for (config, message) in cases {
            assert_eq!(config.validate().unwrap_err().to_string(), message);
        }
    }
}
