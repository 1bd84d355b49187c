//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::domain::trip;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Gateway configuration.
    pub gateway: Gateway,

    /// Scratch store configuration.
    pub scratch: Scratch,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8081)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Page size of the lists fetched from the remote services.
    #[default(100)]
    pub list_page_size: u32,

    /// Checks applied to the readings of a returned vehicle.
    pub return_validation: trip::Validation,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            list_page_size,
            return_validation,
            tasks:
                Tasks {
                    expire_payment_intents,
                },
        } = value;
        Self {
            list_page_size,
            return_validation,
            expire_payment_intents:
                service::task::expire_payment_intents::Config {
                    interval: expire_payment_intents.interval,
                    timeout: expire_payment_intents.timeout,
                },
        }
    }
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `ExpirePaymentIntents` task configuration.
    pub expire_payment_intents: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(time::Duration::from_secs(60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Timeout after which a pending payment intent is considered stale.
    #[default(time::Duration::from_secs(5 * 60))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

/// Configuration of the API gateway the remote services are behind.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Gateway {
    /// Base URL of the API gateway.
    #[default("http://localhost:8080".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(15))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Gateway> for service::infra::gateway::http::Config {
    fn from(value: Gateway) -> Self {
        let Gateway { base_url, timeout } = value;
        Self { base_url, timeout }
    }
}

/// Scratch store configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scratch {
    /// Path of the file the scratch store is mirrored into.
    ///
    /// The store lives in memory only if omitted.
    pub path: Option<PathBuf>,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::Config;

    #[test]
    fn defaults_without_file() {
        let conf = Config::new("definitely-missing-config").unwrap();

        assert_eq!(conf.server.port, 8081);
        assert_eq!(conf.service.list_page_size, 100);
        assert!(conf.service.return_validation.require_all_photos);
        assert!(!conf.service.return_validation.monotonic_mileage);
        assert_eq!(
            conf.service.tasks.expire_payment_intents.timeout,
            Duration::from_secs(300),
        );
        assert_eq!(conf.gateway.base_url, "http://localhost:8080");
        assert!(conf.scratch.path.is_none());
    }

    #[test]
    fn converts_into_service_config() {
        let conf = Config::new("definitely-missing-config").unwrap();

        let svc = service::Config::from(conf.service);

        assert_eq!(svc.list_page_size, 100);
        assert_eq!(
            svc.expire_payment_intents.interval,
            Duration::from_secs(60),
        );
    }
}
