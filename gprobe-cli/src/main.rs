use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gprobe_cli::config::parse_timeout;
use gprobe_cli::{BackendChoice, CloudConnector, ProbeConfig, ProbeSelection, Reporter, Runner};
use gprobe_gemini::Model;
use gprobe_telemetry::TelemetryConfig;

/// Check that Gemini is reachable and answering before blaming your app.
#[derive(Debug, Parser)]
#[command(name = "gemini-probe", version, about)]
struct Cli {
    /// Google Cloud project id, overrides GCP_PROJECT
    #[arg(long)]
    project: Option<String>,

    /// Vertex AI location, e.g. us-central1 or global; overrides GCP_LOCATION
    #[arg(long)]
    location: Option<String>,

    /// Which API surface to probe; overrides GEMINI_PROBE_BACKEND
    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// Candidate model, tried in the order given (repeatable).
    /// Replaces the GEMINI_PROBE_MODELS list.
    #[arg(long = "model", value_name = "MODEL")]
    models: Vec<String>,

    /// Per-request timeout in seconds; overrides GEMINI_PROBE_TIMEOUT_SECS
    #[arg(long, value_name = "SECS", value_parser = parse_request_timeout)]
    request_timeout: Option<Duration>,

    /// Run the complex prompt probe
    #[arg(long)]
    complex_prompt: bool,

    /// Run the max_output_tokens sweep
    #[arg(long)]
    token_limits: bool,

    /// Run the slow request probe
    #[arg(long)]
    timeout_probe: bool,

    /// Run every optional probe
    #[arg(long)]
    all_probes: bool,

    /// Log level for diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_request_timeout(value: &str) -> Result<Duration, String> {
    parse_timeout(value).map_err(|e| e.to_string())
}

impl Cli {
    fn selection(&self) -> ProbeSelection {
        if self.all_probes {
            return ProbeSelection::all();
        }
        ProbeSelection {
            complex_prompt: self.complex_prompt,
            token_limits: self.token_limits,
            timeout: self.timeout_probe,
        }
    }

    fn apply(&self, config: &mut ProbeConfig) {
        if let Some(project) = &self.project {
            config.project_id = project.clone();
        }
        if let Some(location) = &self.location {
            config.location = location.clone();
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if !self.models.is_empty() {
            config.candidate_models = self.models.iter().map(Model::new).collect();
        }
        if let Some(timeout) = self.request_timeout {
            config.request_timeout = Some(timeout);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env("gemini-probe")?;
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level);
    }
    gprobe_telemetry::init_with_config(telemetry)?;

    let mut config = ProbeConfig::from_env().context("invalid probe configuration")?;
    cli.apply(&mut config);
    tracing::debug!(?config.backend, project = %config.project_id, "configuration loaded");

    let runner = Runner::new(CloudConnector, config).with_selection(cli.selection());
    let mut reporter = Reporter::new(io::stdout().lock());
    runner.run(&mut reporter).await.context("failed to write report")?;

    // Probe failures are reported, not signalled through the exit status.
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gemini-probe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_keep_environment_and_skip_optional_probes() {
        let cli = parse(&[]);
        assert_eq!(cli.selection(), ProbeSelection::none());

        let mut config = ProbeConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn all_probes_enables_every_optional_probe() {
        assert_eq!(parse(&["--all-probes"]).selection(), ProbeSelection::all());
        assert_eq!(
            parse(&["--token-limits", "--timeout-probe"]).selection(),
            ProbeSelection { complex_prompt: false, token_limits: true, timeout: true }
        );
    }

    #[test]
    fn flags_override_environment_values() {
        let cli = parse(&[
            "--project",
            "flag-project",
            "--location",
            "global",
            "--backend",
            "studio",
            "--model",
            "gemini-2.5-flash",
            "--model",
            "gemini-2.5-pro",
            "--request-timeout",
            "2.5",
        ]);
        let mut config = ProbeConfig {
            project_env: Some("env-project".to_string()),
            project_id: "env-project".to_string(),
            ..ProbeConfig::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.project_id, "flag-project");
        assert_eq!(config.project_env.as_deref(), Some("env-project"));
        assert_eq!(config.location, "global");
        assert_eq!(config.backend, BackendChoice::Studio);
        assert_eq!(
            config.candidate_models,
            vec![Model::new("gemini-2.5-flash"), Model::new("gemini-2.5-pro")]
        );
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn rejects_unusable_timeouts() {
        for value in ["0", "-1", "1e300", "soon"] {
            let args = ["gemini-probe", "--request-timeout", value];
            assert!(Cli::try_parse_from(args).is_err(), "accepted {value}");
        }
    }
}
