use google_cloud_auth::credentials::{self, Credentials};
use reqwest::ClientBuilder;
use reqwest::header::{HeaderMap, HeaderValue};
use snafu::ResultExt;
use std::time::Duration;
use url::Url;

use crate::backend::studio::{DEFAULT_BASE_URL, StudioBackend};
use crate::backend::vertex::{GoogleCloudConfig, VertexBackend};
use crate::client::GeminiClient;
use crate::error::*;

/// A builder for the `GeminiClient`.
pub struct GeminiBuilder {
    client_builder: ClientBuilder,
    base_url: Option<Url>,
    api_key: Option<String>,
    google_cloud: Option<GoogleCloudConfig>,
    google_cloud_auth: Option<Credentials>,
    timeout: Option<Duration>,
}

impl GeminiBuilder {
    /// Creates a new `GeminiBuilder` with the given API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self::new_without_api_key().api_key(key)
    }

    /// Creates a new `GeminiBuilder` without an API key.
    pub fn new_without_api_key() -> Self {
        Self {
            client_builder: ClientBuilder::default(),
            base_url: None,
            api_key: None,
            google_cloud: None,
            google_cloud_auth: None,
            timeout: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets a custom `reqwest::ClientBuilder`.
    pub fn with_http_client(mut self, client_builder: ClientBuilder) -> Self {
        self.client_builder = client_builder;
        self
    }

    /// Sets a custom base URL for whichever backend is built.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Total time allowed for each request, from connect to the end of the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Configures the client to use Vertex AI (Google Cloud) endpoints.
    pub fn with_google_cloud(
        mut self,
        project_id: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.google_cloud = Some(GoogleCloudConfig {
            project_id: project_id.into(),
            location: location.into(),
        });
        self
    }

    /// Use explicit Google Cloud credentials instead of Application Default Credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.google_cloud_auth = Some(credentials);
        self
    }

    pub fn build(self) -> Result<GeminiClient, Error> {
        let mut client_builder = self.client_builder;
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        // Vertex wins when configured; otherwise fall back to the Developer API.
        if let Some(config) = self.google_cloud {
            snafu::ensure!(!config.project_id.trim().is_empty(), MissingGoogleCloudProjectIdSnafu);
            snafu::ensure!(!config.location.trim().is_empty(), MissingGoogleCloudLocationSnafu);

            let credentials = match self.google_cloud_auth {
                Some(credentials) => credentials,
                None => credentials::Builder::default().build().context(GoogleCloudAuthSnafu)?,
            };
            let base_url = match self.base_url {
                Some(url) => url,
                None => config.default_base_url()?,
            };
            let http_client = client_builder.build().context(BuildHttpClientSnafu)?;

            tracing::debug!(
                project = %config.project_id,
                location = %config.location,
                base_url = %base_url,
                "using Vertex AI backend"
            );
            let backend = VertexBackend::new(http_client, base_url, config, credentials);
            return Ok(GeminiClient::new(backend));
        }

        let key = self.api_key.filter(|k| !k.is_empty()).ok_or(Error::MissingApiKey)?;
        let mut key_value = HeaderValue::from_str(&key).context(InvalidApiKeySnafu)?;
        key_value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key_value);

        let http_client =
            client_builder.default_headers(headers).build().context(BuildHttpClientSnafu)?;
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.clone());

        tracing::debug!(base_url = %base_url, "using Gemini Developer API backend");
        Ok(GeminiClient::new(StudioBackend::new_with_client(http_client, base_url)))
    }
}

impl Default for GeminiBuilder {
    fn default() -> Self {
        Self::new_without_api_key()
    }
}
