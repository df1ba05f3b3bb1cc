use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use snafu::ResultExt;
use std::sync::LazyLock;
use tracing::{Level, instrument};
use url::Url;

use crate::backend::{BackendKind, GeminiBackend, check_response};
use crate::common::Model;
use crate::error::{ConstructUrlSnafu, DecodeResponseSnafu, Error, PerformRequestSnafu};
use crate::generation::{GenerateContentRequest, GenerationResponse};

pub(crate) static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("unreachable error: failed to parse default base URL")
});

/// Gemini Developer API backend. The API key travels as a default
/// `x-goog-api-key` header on `http_client`.
#[derive(Debug)]
pub struct StudioBackend {
    http_client: Client,
    base_url: Url,
}

impl StudioBackend {
    pub fn new_with_client(http_client: Client, base_url: Url) -> Self {
        Self { http_client, base_url }
    }

    fn build_url(&self, model: &Model, endpoint: &str) -> Result<Url, Error> {
        let suffix = format!("{}:{}", model.studio_model_path(), endpoint);
        self.base_url.join(&suffix).context(ConstructUrlSnafu { suffix })
    }

    async fn perform_request<F: FnOnce(&Client) -> RequestBuilder>(
        &self,
        url: Url,
        builder: F,
    ) -> Result<Response, Error> {
        let response =
            builder(&self.http_client).send().await.context(PerformRequestSnafu { url })?;
        check_response(response).await
    }
}

#[async_trait]
impl GeminiBackend for StudioBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Studio
    }

    async fn check_auth(&self) -> Result<(), Error> {
        // The key is validated by the first real request.
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

        let response = self.perform_request(url.clone(), |c| c.post(url).json(&request)).await?;
        response.json::<GenerationResponse>().await.context(DecodeResponseSnafu)
    }
}
