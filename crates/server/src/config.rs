//! Service configuration from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading [`ServiceConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid listen address {0}")]
    Address(String),
}

/// Runtime settings for the HTTP service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// `None` disables API-key checks.
    pub api_key: Option<String>,
    /// Requests allowed per client per window.
    pub rate_limit_max: u32,
    /// Window length in seconds.
    pub rate_limit_window: u64,
    /// `None` serves an untrained default model.
    pub model_checkpoint: Option<PathBuf>,
    pub datasets_dir: PathBuf,
    /// Rolling buffer length for `/ws` sessions.
    pub stream_window: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_key: None,
            rate_limit_max: 60,
            rate_limit_window: 60,
            model_checkpoint: None,
            datasets_dir: PathBuf::from("example_data"),
            stream_window: 200,
        }
    }
}

impl ServiceConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", non_empty("PORT"), defaults.port)?,
            api_key: non_empty("MAINTENANCE_API_KEY")
                .or_else(|| non_empty("MAINTAINANCE_API_KEY")),
            rate_limit_max: parse_or(
                "RATE_LIMIT_MAX",
                non_empty("RATE_LIMIT_MAX"),
                defaults.rate_limit_max,
            )?,
            rate_limit_window: parse_or(
                "RATE_LIMIT_WINDOW",
                non_empty("RATE_LIMIT_WINDOW"),
                defaults.rate_limit_window,
            )?,
            model_checkpoint: non_empty("MODEL_CHECKPOINT").map(PathBuf::from),
            datasets_dir: non_empty("DATASETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.datasets_dir),
            stream_window: parse_or(
                "STREAM_WINDOW",
                non_empty("STREAM_WINDOW"),
                defaults.stream_window,
            )?,
        };

        if config.rate_limit_window == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if config.stream_window == 0 {
            return Err(ConfigError::Invalid {
                name: "STREAM_WINDOW",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(config)
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Address(raw))
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.port, 8000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9001"),
            ("MAINTENANCE_API_KEY", "s3cret"),
            ("RATE_LIMIT_MAX", "5"),
            ("RATE_LIMIT_WINDOW", "10"),
            ("MODEL_CHECKPOINT", "models/a.safetensors"),
            ("DATASETS_DIR", "/data"),
            ("STREAM_WINDOW", "50"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9001);
        assert_eq!(config.api_key.as_deref(), Some("s3cret"));
        assert_eq!(config.rate_limit_max, 5);
        assert_eq!(config.rate_limit_window, 10);
        assert_eq!(
            config.model_checkpoint,
            Some(PathBuf::from("models/a.safetensors"))
        );
        assert_eq!(config.datasets_dir, PathBuf::from("/data"));
        assert_eq!(config.stream_window, 50);
        assert_eq!(config.addr().unwrap(), "127.0.0.1:9001".parse().unwrap());
    }

    #[test]
    fn test_blank_api_key_disables_auth() {
        let config =
            ServiceConfig::from_lookup(lookup(&[("MAINTENANCE_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_legacy_api_key_spelling() {
        let config =
            ServiceConfig::from_lookup(lookup(&[("MAINTAINANCE_API_KEY", "secret")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));

        let config = ServiceConfig::from_lookup(lookup(&[
            ("MAINTENANCE_API_KEY", "new"),
            ("MAINTAINANCE_API_KEY", "old"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("new"));
    }

    #[test]
    fn test_malformed_port() {
        let err = ServiceConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
        assert!(err.to_string().starts_with("invalid PORT=\"eighty\""));
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[("RATE_LIMIT_WINDOW", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_stream_window_rejected() {
        let err = ServiceConfig::from_lookup(lookup(&[("STREAM_WINDOW", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "STREAM_WINDOW",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_host() {
        let config = ServiceConfig {
            host: "not a host".to_string(),
            ..ServiceConfig::default()
        };
        assert!(matches!(config.addr(), Err(ConfigError::Address(_))));
    }
}
