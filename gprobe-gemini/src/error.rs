use snafu::Snafu;
use url::Url;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("failed to build the HTTP client"))]
    BuildHttpClient { source: reqwest::Error },

    #[snafu(display("invalid API key value"))]
    InvalidApiKey { source: reqwest::header::InvalidHeaderValue },

    #[snafu(display("no API key configured; set GOOGLE_API_KEY or configure Vertex AI"))]
    MissingApiKey,

    #[snafu(display("Google Cloud project id must not be empty"))]
    MissingGoogleCloudProjectId,

    #[snafu(display("Google Cloud location must not be empty"))]
    MissingGoogleCloudLocation,

    #[snafu(display("failed to load Google Cloud credentials"))]
    GoogleCloudAuth { source: google_cloud_auth::build_errors::Error },

    #[snafu(display("failed to obtain Google Cloud credential headers"))]
    GoogleCloudCredentialHeaders { source: google_cloud_auth::errors::CredentialsError },

    #[snafu(display("Google Cloud credential headers are unavailable"))]
    GoogleCloudCredentialHeadersUnavailable,

    #[snafu(display("failed to parse base URL '{url}'"))]
    ParseBaseUrl { source: url::ParseError, url: String },

    #[snafu(display("failed to construct URL (suffix: {suffix})"))]
    ConstructUrl { source: url::ParseError, suffix: String },

    #[snafu(display("failed to perform request to '{url}'"))]
    PerformRequest { source: reqwest::Error, url: Url },

    #[snafu(display(
        "bad response from server; code {code}; description: {}",
        description.as_deref().unwrap_or("none")
    ))]
    BadResponse { code: u16, description: Option<String> },

    #[snafu(display("failed to decode JSON response"))]
    DecodeResponse { source: reqwest::Error },

    #[snafu(display("prompt was blocked: {reason}"))]
    PromptBlocked { reason: String },

    #[snafu(display("response contained no text (finish reason: {finish_reason})"))]
    EmptyResponse { finish_reason: String },
}

impl Error {
    /// True when the request was cut short by the client-side timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::PerformRequest { source, .. } | Error::DecodeResponse { source } => {
                source.is_timeout()
            }
            _ => false,
        }
    }

    /// HTTP status code for errors that carry one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::BadResponse { code, .. } => Some(*code),
            Error::PerformRequest { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
