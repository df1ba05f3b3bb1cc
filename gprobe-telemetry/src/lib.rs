//! Logging setup for gemini-probe.
//!
//! Diagnostic logs go to stderr so they never interleave with the probe
//! report printed on stdout.

mod init;

pub use init::{LogFormat, TelemetryConfig, TelemetryError, init_with_config};
