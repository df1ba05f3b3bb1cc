//! # gprobe-gemini
//!
//! A small Rust client for Google's Gemini API, reachable either through
//! Vertex AI (Google Cloud credentials) or through the Gemini Developer API
//! (API key). It covers exactly what a connectivity probe needs: unary
//! `generateContent` calls and a credential check.
//!
//! ```rust,no_run
//! use gprobe_gemini::{GeminiBuilder, Model};
//!
//! # async fn demo() -> Result<(), gprobe_gemini::Error> {
//! let client = GeminiBuilder::new_without_api_key()
//!     .with_google_cloud("my-project", "us-central1")
//!     .build()?;
//!
//! let response = client
//!     .generate_content(Model::GEMINI_2_0_FLASH)
//!     .with_user_message("Hello!")
//!     .with_max_output_tokens(50)
//!     .execute()
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod builder;
mod client;
pub mod common;
mod error;
pub mod generation;

pub use backend::{BackendKind, GeminiBackend};
pub use builder::GeminiBuilder;
pub use client::GeminiClient;
pub use common::{Content, Model, Part, Role};
pub use error::*;
pub use generation::{
    ContentBuilder, FinishReason, GenerateContentRequest, GenerationConfig, GenerationResponse,
    UsageMetadata,
};
