use std::sync::Arc;

use crate::backend::{BackendKind, GeminiBackend};
use crate::common::Model;
use crate::error::Error;
use crate::generation::ContentBuilder;

/// Client for the Gemini API. Cloning shares the underlying backend.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    backend: Arc<dyn GeminiBackend>,
}

impl GeminiClient {
    pub fn new(backend: impl GeminiBackend + 'static) -> Self {
        Self { backend: Arc::new(backend) }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Verify the credentials can authorize a request without calling a model.
    pub async fn check_auth(&self) -> Result<(), Error> {
        self.backend.check_auth().await
    }

    /// Start building a content generation request
    pub fn generate_content(&self, model: impl Into<Model>) -> ContentBuilder {
        ContentBuilder::new(self.backend.clone(), model.into())
    }
}
