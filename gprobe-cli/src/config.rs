//! Probe configuration: environment (after `.env`), then command-line overrides.

use std::time::Duration;

use gprobe_gemini::Model;

pub const DEFAULT_PROJECT_ID: &str = "gen-lang-client-0750686103";
pub const DEFAULT_LOCATION: &str = "us-central1";

pub const ENV_PROJECT: &str = "GCP_PROJECT";
pub const ENV_LOCATION: &str = "GCP_LOCATION";
pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_BACKEND: &str = "GEMINI_PROBE_BACKEND";
pub const ENV_MODELS: &str = "GEMINI_PROBE_MODELS";
pub const ENV_TIMEOUT: &str = "GEMINI_PROBE_TIMEOUT_SECS";

/// Models tried, in order, until one answers.
pub fn default_candidate_models() -> Vec<Model> {
    vec![
        Model::new(Model::GEMINI_2_0_FLASH),
        Model::new(Model::GEMINI_2_0_FLASH_LITE),
        Model::new(Model::GEMINI_2_0_FLASH_EXP),
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown backend '{0}' in GEMINI_PROBE_BACKEND (expected 'vertex' or 'studio')")]
    UnknownBackend(String),

    #[error(
        "invalid GEMINI_PROBE_TIMEOUT_SECS value '{value}': expected a positive number of seconds"
    )]
    InvalidTimeout { value: String },

    #[error("GEMINI_PROBE_MODELS is set but lists no models")]
    EmptyModelList,
}

/// Which Gemini surface to probe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendChoice {
    /// Vertex AI with Application Default Credentials
    #[default]
    Vertex,
    /// Gemini Developer API with GOOGLE_API_KEY
    Studio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Raw `GCP_PROJECT` value, kept to report whether it was set.
    pub project_env: Option<String>,
    pub project_id: String,
    pub location: String,
    pub api_key: Option<String>,
    pub backend: BackendChoice,
    pub candidate_models: Vec<Model>,
    pub request_timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            project_env: None,
            project_id: DEFAULT_PROJECT_ID.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            api_key: None,
            backend: BackendChoice::default(),
            candidate_models: default_candidate_models(),
            request_timeout: None,
        }
    }
}

impl ProbeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let project_env = get(ENV_PROJECT);
        let backend = match get(ENV_BACKEND) {
            Some(value) => {
                value.parse::<BackendChoice>().map_err(|_| ConfigError::UnknownBackend(value))?
            }
            None => BackendChoice::default(),
        };
        let candidate_models = match get(ENV_MODELS) {
            Some(list) => parse_model_list(&list)?,
            None => default_candidate_models(),
        };
        let request_timeout = get(ENV_TIMEOUT).map(|value| parse_timeout(&value)).transpose()?;

        Ok(Self {
            project_id: project_env.clone().unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string()),
            project_env,
            location: get(ENV_LOCATION).unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            api_key: get(ENV_API_KEY),
            backend,
            candidate_models,
            request_timeout,
        })
    }

    pub fn api_key_set(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_model_list(list: &str) -> Result<Vec<Model>, ConfigError> {
    let models: Vec<Model> = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Model::new)
        .collect();
    if models.is_empty() {
        return Err(ConfigError::EmptyModelList);
    }
    Ok(models)
}

/// Seconds, fractional allowed.
pub fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|timeout| !timeout.is_zero())
        .ok_or_else(|| ConfigError::InvalidTimeout { value: value.to_string() })
}
