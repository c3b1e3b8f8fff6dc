//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del servidor y de los canales de
//! notificación, leída desde variables de entorno.

pub mod environment;
pub mod notification;

pub use environment::*;
pub use notification::*;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} has an unsupported value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{0}")]
    Missing(&'static str),
}

/// Leer una variable con valor por defecto; vacía cuenta como ausente
pub(crate) fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub(crate) fn parse_number<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = var_or(lookup, key, default);
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}
