//! Content generation requests, responses and the fluent request builder.

mod builder;
pub mod model;

pub use builder::ContentBuilder;
pub use model::{
    Candidate, FinishReason, GenerateContentRequest, GenerationConfig, GenerationResponse,
    PromptFeedback, UsageMetadata,
};
