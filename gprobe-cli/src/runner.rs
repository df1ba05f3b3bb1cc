use std::io::{self, Write};

use gprobe_gemini::Model;
use tracing::instrument;

use crate::config::ProbeConfig;
use crate::connector::Connector;
use crate::probes::{self, ProbeOutcome};
use crate::prompts::TOKEN_LIMITS;
use crate::report::Reporter;

/// Which of the optional probes run after a working model is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeSelection {
    pub complex_prompt: bool,
    pub token_limits: bool,
    pub timeout: bool,
}

impl ProbeSelection {
    pub fn all() -> Self {
        Self { complex_prompt: true, token_limits: true, timeout: true }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn any(&self) -> bool {
        self.complex_prompt || self.token_limits || self.timeout
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub connectivity: Option<ProbeOutcome>,
    pub model_search: Option<ProbeOutcome>,
    pub working_model: Option<Model>,
    /// Optional probes, in the order they ran.
    pub optional: Vec<ProbeOutcome>,
}

impl RunSummary {
    pub fn connected(&self) -> bool {
        self.connectivity.as_ref().is_some_and(|outcome| outcome.passed)
    }

    /// True when the run reached the completion banner.
    pub fn completed(&self) -> bool {
        self.working_model.is_some()
    }
}

/// Drives the probes in order and stops at the first gating failure.
pub struct Runner<C> {
    connector: C,
    config: ProbeConfig,
    selection: ProbeSelection,
}

impl<C: Connector> Runner<C> {
    pub fn new(connector: C, config: ProbeConfig) -> Self {
        Self { connector, config, selection: ProbeSelection::none() }
    }

    pub fn with_selection(mut self, selection: ProbeSelection) -> Self {
        self.selection = selection;
        self
    }

    #[instrument(skip_all, fields(backend = %self.config.backend, selection = ?self.selection))]
    pub async fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        reporter.header(self.config.project_env.as_deref(), self.config.api_key_set())?;
        reporter.blank()?;

        let (outcome, client) =
            probes::connectivity(&self.connector, &self.config, reporter).await?;
        summary.connectivity = Some(outcome);
        let Some(client) = client else {
            reporter.abort("Basic connectivity failed. Check your credentials.")?;
            return Ok(summary);
        };

        let (outcome, working_model) =
            probes::find_working_model(&client, &self.config.candidate_models, reporter).await?;
        summary.model_search = Some(outcome);
        let Some(model) = working_model else {
            tracing::warn!("no candidate model answered");
            reporter.abort("No models are working. Check your project permissions.")?;
            return Ok(summary);
        };

        reporter.blank()?;
        reporter.pass(format!("Found working model: {model}"))?;
        if !self.selection.any() {
            tracing::debug!("no optional probes selected");
        }

        if self.selection.complex_prompt {
            summary.optional.push(probes::complex_prompt(&client, &model, reporter).await?);
        }
        if self.selection.token_limits {
            summary
                .optional
                .push(probes::token_limits(&client, &model, &TOKEN_LIMITS, reporter).await?);
        }
        if self.selection.timeout {
            summary.optional.push(probes::timeout_scenario(&client, &model, reporter).await?);
        }

        summary.working_model = Some(model);
        reporter.completion()?;
        tracing::info!(
            model = ?summary.working_model,
            optional_passed = summary.optional.iter().filter(|o| o.passed).count(),
            optional_run = summary.optional.len(),
            "diagnostics finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_defaults_to_nothing() {
        assert!(!ProbeSelection::none().any());
        assert!(ProbeSelection::all().any());
        assert!(ProbeSelection { timeout: true, ..ProbeSelection::none() }.any());
    }

    #[test]
    fn empty_summary_is_neither_connected_nor_complete() {
        let summary = RunSummary::default();
        assert!(!summary.connected());
        assert!(!summary.completed());
    }
}
