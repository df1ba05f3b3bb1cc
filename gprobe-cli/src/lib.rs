//! Diagnostic probes for Gemini on Vertex AI or the Gemini Developer API.
//!
//! The [`Runner`] checks connectivity, finds the first candidate model that
//! answers, then runs whichever optional probes were selected, writing a
//! human-readable report through a [`Reporter`].

pub mod config;
pub mod connector;
pub mod probes;
pub mod prompts;
pub mod report;
pub mod runner;

pub use config::{BackendChoice, ConfigError, ProbeConfig};
pub use connector::{CloudConnector, Connector};
pub use probes::{Attempt, ProbeKind, ProbeOutcome};
pub use report::Reporter;
pub use runner::{ProbeSelection, RunSummary, Runner};
