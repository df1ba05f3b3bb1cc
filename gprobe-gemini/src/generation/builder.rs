use std::sync::Arc;

use tracing::instrument;

use crate::backend::GeminiBackend;
use crate::common::{Content, Model, Role};
use crate::error::Error;
use crate::generation::{GenerateContentRequest, GenerationConfig, GenerationResponse};

/// Builder for a single `generateContent` call.
pub struct ContentBuilder {
    backend: Arc<dyn GeminiBackend>,
    model: Model,
    request: GenerateContentRequest,
}

impl ContentBuilder {
    pub(crate) fn new(backend: Arc<dyn GeminiBackend>, model: Model) -> Self {
        Self { backend, model, request: GenerateContentRequest::default() }
    }

    /// Add a user turn with text content.
    pub fn with_user_message(mut self, text: impl Into<String>) -> Self {
        self.request.contents.push(Content::text(text).with_role(Role::User));
        self
    }

    /// Replace the whole generation config.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.request.generation_config = Some(config);
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.config_mut().max_output_tokens = Some(max_output_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config_mut().temperature = Some(temperature);
        self
    }

    fn config_mut(&mut self) -> &mut GenerationConfig {
        self.request.generation_config.get_or_insert_with(GenerationConfig::default)
    }

    /// The request as it will be sent.
    pub fn build(self) -> GenerateContentRequest {
        self.request
    }

    /// Send the request.
    #[instrument(skip_all, fields(
        model = %self.model,
        backend = %self.backend.kind(),
        messages.count = self.request.contents.len(),
    ), err)]
    pub async fn execute(self) -> Result<GenerationResponse, Error> {
        self.backend.generate_content(&self.model, self.request).await
    }
}
