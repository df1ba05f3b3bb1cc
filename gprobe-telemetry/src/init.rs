//! Telemetry initialization and configuration

use std::str::FromStr;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor an explicit level is set.
/// The probe report is the primary output, so logging stays quiet by default.
const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("unknown log format '{0}' (expected 'text' or 'json')")]
    UnknownFormat(String),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized(#[source] tracing_subscriber::util::TryInitError),
}

/// Output format of the console layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

/// Configuration for the telemetry system
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub default_level: Option<String>,
    pub log_directives: Vec<String>,
    pub format: LogFormat,
}

impl TelemetryConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into(), ..Default::default() }
    }

    /// Set the default log level (e.g., "debug", "info").
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.default_level = Some(level.into());
        self
    }

    /// Add a custom tracing directive (e.g., "gprobe_gemini=debug").
    pub fn with_log_directive(mut self, directive: impl Into<String>) -> Self {
        self.log_directives.push(directive.into());
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Supported variables:
    /// - `LOG_LEVEL`: default log level when `RUST_LOG` is unset (default: "warn")
    /// - `LOG_FORMAT`: "text" or "json" (default: "text")
    pub fn from_env(service_name: impl Into<String>) -> Result<Self, TelemetryError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] with an injectable variable lookup.
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TelemetryError> {
        let format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::Text,
        };
        Ok(Self {
            service_name: service_name.into(),
            default_level: lookup("LOG_LEVEL"),
            log_directives: Vec::new(),
            format,
        })
    }

    fn filter(&self) -> Result<EnvFilter, TelemetryError> {
        let mut filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                let level = self.default_level.as_deref().unwrap_or(DEFAULT_LEVEL);
                EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
                    filter: level.to_string(),
                    source,
                })?
            }
        };

        for directive in &self.log_directives {
            let parsed = directive.parse().map_err(|source| TelemetryError::InvalidFilter {
                filter: directive.clone(),
                source,
            })?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }
}

/// Install the global subscriber: an env filter plus a console layer on stderr.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), TelemetryError> {
    use tracing_subscriber::fmt;

    let filter = config.filter()?;

    let (text_layer, json_layer) = match config.format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_target(true).with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)?;

    tracing::debug!(
        service.name = config.service_name,
        log.level = config.default_level.as_deref().unwrap_or("env"),
        log.format = ?config.format,
        "Telemetry system initialized"
    );
    Ok(())
}
