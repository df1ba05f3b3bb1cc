use async_trait::async_trait;
use gprobe_gemini::{Error, GeminiBuilder, GeminiClient};
use tracing::instrument;

use crate::config::{BackendChoice, ProbeConfig};

/// Turns a probe configuration into a ready client.
///
/// The connectivity probe calls this exactly once; every later probe reuses
/// the returned client.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ProbeConfig) -> Result<GeminiClient, Error>;
}

/// Connects to the real service and verifies the credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudConnector;

#[async_trait]
impl Connector for CloudConnector {
    #[instrument(skip_all, fields(
        backend = %config.backend,
        project = %config.project_id,
        location = %config.location,
    ), err)]
    async fn connect(&self, config: &ProbeConfig) -> Result<GeminiClient, Error> {
        let mut builder = match config.backend {
            BackendChoice::Vertex => GeminiBuilder::new_without_api_key()
                .with_google_cloud(&config.project_id, &config.location),
            BackendChoice::Studio => {
                let key = config.api_key.clone().ok_or(Error::MissingApiKey)?;
                GeminiBuilder::new(key)
            }
        };
        if let Some(timeout) = config.request_timeout {
            builder = builder.with_timeout(timeout);
        }

        let client = builder.build()?;
        client.check_auth().await?;
        tracing::info!("client initialized");
        Ok(client)
    }
}
