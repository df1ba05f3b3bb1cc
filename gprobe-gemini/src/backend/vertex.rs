use async_trait::async_trait;
use google_cloud_auth::credentials::{CacheableResource, Credentials};
use reqwest::Client;
use reqwest::header::HeaderMap;
use snafu::ResultExt;
use tracing::{Level, instrument};
use url::Url;

use crate::backend::{BackendKind, GeminiBackend, check_response};
use crate::common::Model;
use crate::error::{
    ConstructUrlSnafu, DecodeResponseSnafu, Error, GoogleCloudCredentialHeadersSnafu,
    GoogleCloudCredentialHeadersUnavailableSnafu, ParseBaseUrlSnafu, PerformRequestSnafu,
};
use crate::generation::{GenerateContentRequest, GenerationResponse};

/// Project and region a Vertex AI backend is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleCloudConfig {
    pub project_id: String,
    pub location: String,
}

impl GoogleCloudConfig {
    /// Regional endpoint, or the global one for `global`.
    pub fn default_base_url(&self) -> Result<Url, Error> {
        let url = if self.location == "global" {
            "https://aiplatform.googleapis.com/v1/".to_string()
        } else {
            format!("https://{}-aiplatform.googleapis.com/v1/", self.location)
        };
        Url::parse(&url).context(ParseBaseUrlSnafu { url })
    }
}

/// Vertex AI backend speaking the REST surface of `PredictionService`.
#[derive(Debug)]
pub struct VertexBackend {
    http_client: Client,
    base_url: Url,
    config: GoogleCloudConfig,
    credentials: Credentials,
}

impl VertexBackend {
    pub fn new(
        http_client: Client,
        base_url: Url,
        config: GoogleCloudConfig,
        credentials: Credentials,
    ) -> Self {
        Self { http_client, base_url, config, credentials }
    }

    fn build_url(&self, model: &Model, endpoint: &str) -> Result<Url, Error> {
        let path = model.vertex_model_path(&self.config.project_id, &self.config.location);
        let suffix = format!("{path}:{endpoint}");
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    async fn auth_headers(&self) -> Result<HeaderMap, Error> {
        match self
            .credentials
            .headers(Default::default())
            .await
            .context(GoogleCloudCredentialHeadersSnafu)?
        {
            CacheableResource::New { data, .. } => Ok(data),
            CacheableResource::NotModified => GoogleCloudCredentialHeadersUnavailableSnafu.fail(),
        }
    }
}

#[async_trait]
impl GeminiBackend for VertexBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vertex
    }

    #[instrument(
        skip_all,
        fields(project = %self.config.project_id, location = %self.config.location),
        err
    )]
    async fn check_auth(&self) -> Result<(), Error> {
        let headers = self.auth_headers().await?;
        tracing::debug!(header.count = headers.len(), "obtained Google Cloud credential headers");
        Ok(())
    }

    #[instrument(skip_all, fields(model = %model, request.url), ret(level = Level::TRACE), err)]
    async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error> {
        let url = self.build_url(model, "generateContent")?;
        tracing::Span::current().record("request.url", tracing::field::display(&url));

        let auth_headers = self.auth_headers().await?;
        let response = self
            .http_client
            .post(url.clone())
            .headers(auth_headers)
            .json(&request)
            .send()
            .await
            .context(PerformRequestSnafu { url })?;

        let response = check_response(response).await?;
        response.json::<GenerationResponse>().await.context(DecodeResponseSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use google_cloud_auth::credentials::api_key_credentials;

    fn backend(location: &str) -> VertexBackend {
        let config =
            GoogleCloudConfig { project_id: "demo".to_string(), location: location.to_string() };
        let base_url = config.default_base_url().unwrap();
        let credentials = api_key_credentials::Builder::new("test-key").build();
        VertexBackend::new(Client::new(), base_url, config, credentials)
    }

    #[tokio::test]
    async fn regional_url() {
        let url = backend("us-central1")
            .build_url(&Model::new("gemini-2.0-flash"), "generateContent")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/demo/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn global_url() {
        let url = backend("global")
            .build_url(&Model::new("gemini-2.0-flash-lite"), "generateContent")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://aiplatform.googleapis.com/v1/projects/demo/locations/global/publishers/google/models/gemini-2.0-flash-lite:generateContent"
        );
    }
}
