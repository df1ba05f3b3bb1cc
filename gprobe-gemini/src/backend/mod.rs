use async_trait::async_trait;
use reqwest::Response;

use crate::common::Model;
use crate::error::{BadResponseSnafu, Error};
use crate::generation::{GenerateContentRequest, GenerationResponse};

pub mod studio;
pub mod vertex;

/// Which Gemini surface a backend talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    /// Vertex AI with Google Cloud credentials
    Vertex,
    /// Gemini Developer API with an API key
    Studio,
}

/// The contract both Studio and Vertex fulfil.
/// Calling code never needs to know which backend is active.
#[async_trait]
pub trait GeminiBackend: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> BackendKind;

    /// Prove the configured credentials can authorize a request.
    async fn check_auth(&self) -> Result<(), Error>;

    /// Generate content (unary)
    async fn generate_content(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<GenerationResponse, Error>;
}

pub(crate) async fn check_response(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if !status.is_success() {
        let description = response.text().await.ok().filter(|body| !body.is_empty());
        BadResponseSnafu { code: status.as_u16(), description }.fail()
    } else {
        Ok(response)
    }
}
