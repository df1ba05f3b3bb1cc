//! The individual diagnostic probes.
//!
//! Each probe writes its own section to the [`Reporter`] and returns a
//! [`ProbeOutcome`]. API failures never escape a probe; only report write
//! errors do.

use std::future::Future;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use gprobe_gemini::{Error, GeminiClient, GenerationResponse, Model};
use tracing::instrument;

use crate::config::{BackendChoice, ProbeConfig};
use crate::connector::Connector;
use crate::prompts::{self, ProbeRequest};
use crate::report::{Reporter, format_elapsed, truncate_chars};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ProbeKind {
    Connectivity,
    ModelSearch,
    ComplexPrompt,
    TokenLimits,
    Timeout,
}

/// One request (or initialization) made by a probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Model id, token cap or other label the attempt is reported under.
    pub subject: String,
    pub elapsed: Duration,
    pub response_chars: Option<usize>,
    pub error: Option<String>,
    pub timed_out: bool,
}

impl Attempt {
    fn success(subject: impl Into<String>, elapsed: Duration, text: &str) -> Self {
        Self {
            subject: subject.into(),
            elapsed,
            response_chars: Some(text.chars().count()),
            error: None,
            timed_out: false,
        }
    }

    fn failure(subject: impl Into<String>, elapsed: Duration, error: &Error) -> Self {
        Self {
            subject: subject.into(),
            elapsed,
            response_chars: None,
            error: Some(error.to_string()),
            timed_out: error.is_timeout(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub kind: ProbeKind,
    pub passed: bool,
    pub attempts: Vec<Attempt>,
}

impl ProbeOutcome {
    fn new(kind: ProbeKind, attempts: Vec<Attempt>) -> Self {
        let passed = attempts.iter().any(Attempt::succeeded);
        Self { kind, passed, attempts }
    }
}

async fn timed<F: Future>(future: F) -> (Duration, F::Output) {
    let start = Instant::now();
    let output = future.await;
    (start.elapsed(), output)
}

/// Sends `prompt` and extracts the answer text; a blocked or empty answer is a failure.
async fn ask(
    client: &GeminiClient,
    model: &Model,
    prompt: &str,
    max_output_tokens: i32,
    temperature: f32,
) -> (Duration, Result<GenerationResponse, Error>) {
    timed(async {
        let response = client
            .generate_content(model)
            .with_user_message(prompt)
            .with_max_output_tokens(max_output_tokens)
            .with_temperature(temperature)
            .execute()
            .await?;
        response.try_text()?;
        Ok::<_, Error>(response)
    })
    .await
}

async fn ask_request(
    client: &GeminiClient,
    model: &Model,
    request: ProbeRequest,
) -> (Duration, Result<GenerationResponse, Error>) {
    ask(client, model, request.prompt, request.max_output_tokens, request.temperature).await
}

fn surface_label(backend: BackendChoice) -> &'static str {
    match backend {
        BackendChoice::Vertex => "Vertex AI",
        BackendChoice::Studio => "Gemini Developer API",
    }
}

/// Test 1: build a client and confirm credentials are usable.
#[instrument(skip_all, fields(backend = %config.backend))]
pub async fn connectivity<C, W>(
    connector: &C,
    config: &ProbeConfig,
    reporter: &mut Reporter<W>,
) -> io::Result<(ProbeOutcome, Option<GeminiClient>)>
where
    C: Connector + ?Sized,
    W: Write,
{
    let label = surface_label(config.backend);
    reporter.section(format!("TEST 1: Basic {label} Connectivity"))?;
    reporter.line(format!("Project ID: {}", config.project_id))?;
    reporter.line(format!("Location: {}", config.location))?;
    if config.backend == BackendChoice::Studio {
        reporter.line(format!("Backend: {}", config.backend))?;
    }

    let (elapsed, result) = timed(connector.connect(config)).await;
    match result {
        Ok(client) => {
            reporter.pass(format!("{label} initialized successfully"))?;
            let attempt = Attempt {
                subject: label.to_string(),
                elapsed,
                response_chars: None,
                error: None,
                timed_out: false,
            };
            Ok((ProbeOutcome::new(ProbeKind::Connectivity, vec![attempt]), Some(client)))
        }
        Err(err) => {
            tracing::warn!(error = %err, "initialization failed");
            reporter.fail_with(format!("{label} initialization failed"), &err)?;
            let attempt = Attempt::failure(label, elapsed, &err);
            Ok((ProbeOutcome::new(ProbeKind::Connectivity, vec![attempt]), None))
        }
    }
}

/// Test 2: try each candidate in order and stop at the first that answers.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn find_working_model<W: Write>(
    client: &GeminiClient,
    candidates: &[Model],
    reporter: &mut Reporter<W>,
) -> io::Result<(ProbeOutcome, Option<Model>)> {
    reporter.section("TEST 2: Simple Text Generation")?;

    let mut attempts = Vec::new();
    for model in candidates {
        reporter.blank()?;
        reporter.line(format!("Testing model: {model}"))?;

        let (elapsed, result) = ask_request(client, model, prompts::MODEL_CHECK).await;
        match result {
            Ok(response) => {
                let text = response.text();
                // Trailing newlines from the model would break the report layout.
                reporter.pass(format!("{model}: {}", text.trim()))?;
                reporter.detail(format!("Response time: {}", format_elapsed(elapsed)))?;
                attempts.push(Attempt::success(model.as_str(), elapsed, &text));
                tracing::info!(%model, ?elapsed, "model answered");
                let outcome = ProbeOutcome::new(ProbeKind::ModelSearch, attempts);
                return Ok((outcome, Some(model.clone())));
            }
            Err(err) => {
                tracing::debug!(%model, error = %err, "model failed");
                reporter.fail_with(model.as_str(), &err)?;
                attempts.push(Attempt::failure(model.as_str(), elapsed, &err));
            }
        }
    }

    Ok((ProbeOutcome::new(ProbeKind::ModelSearch, attempts), None))
}

/// Test 3: a longer, structured prompt with a moderate output cap.
#[instrument(skip_all, fields(%model))]
pub async fn complex_prompt<W: Write>(
    client: &GeminiClient,
    model: &Model,
    reporter: &mut Reporter<W>,
) -> io::Result<ProbeOutcome> {
    let request = prompts::COMPLEX_PROMPT;
    reporter.section("TEST 3: Complex Prompt Test")?;
    reporter.line(format!("Testing complex prompt with {model}..."))?;
    reporter.line(format!("Prompt length: {} characters", request.prompt.chars().count()))?;

    let (elapsed, result) = ask_request(client, model, request).await;
    let attempt = match result {
        Ok(response) => {
            let text = response.text();
            reporter.pass("Complex prompt successful!")?;
            reporter.detail(format!("Response time: {}", format_elapsed(elapsed)))?;
            reporter.detail(format!(
                "Response: {}...",
                truncate_chars(&text, prompts::COMPLEX_PREVIEW_CHARS)
            ))?;
            Attempt::success(model.as_str(), elapsed, &text)
        }
        Err(err) => {
            reporter.fail_with("Complex prompt failed", &err)?;
            Attempt::failure(model.as_str(), elapsed, &err)
        }
    };
    Ok(ProbeOutcome::new(ProbeKind::ComplexPrompt, vec![attempt]))
}

/// Test 4: the same prompt under increasing output caps.
///
/// Every cap is attempted; one failing does not stop the sweep.
#[instrument(skip_all, fields(%model))]
pub async fn token_limits<W: Write>(
    client: &GeminiClient,
    model: &Model,
    limits: &[i32],
    reporter: &mut Reporter<W>,
) -> io::Result<ProbeOutcome> {
    reporter.section("TEST 4: Token Limits Test")?;

    let mut attempts = Vec::with_capacity(limits.len());
    for &limit in limits {
        reporter.blank()?;
        reporter.line(format!("Testing max_output_tokens: {limit}"))?;

        let subject = format!("{limit} tokens");
        let (elapsed, result) = ask(
            client,
            model,
            prompts::TOKEN_SWEEP_PROMPT,
            limit,
            prompts::TOKEN_SWEEP_TEMPERATURE,
        )
        .await;
        match result {
            Ok(response) => {
                let text = response.text();
                reporter.pass(format!("{subject}: Success ({})", format_elapsed(elapsed)))?;
                reporter.detail(format!("Response length: {} chars", text.chars().count()))?;
                if let Some(usage) = &response.usage_metadata {
                    if let (Some(prompt), Some(output)) =
                        (usage.prompt_token_count, usage.candidates_token_count)
                    {
                        reporter.detail(format!("Tokens used: {prompt} prompt, {output} output"))?;
                    }
                }
                if let Some(reason) = response.finish_reason() {
                    tracing::debug!(limit, %reason, "sweep step finished");
                }
                attempts.push(Attempt::success(subject, elapsed, &text));
            }
            Err(err) => {
                reporter.fail_with(&subject, &err)?;
                attempts.push(Attempt::failure(subject, elapsed, &err));
            }
        }
    }

    Ok(ProbeOutcome::new(ProbeKind::TokenLimits, attempts))
}

/// Test 5: a request likely to take a long time, timed end to end.
#[instrument(skip_all, fields(%model))]
pub async fn timeout_scenario<W: Write>(
    client: &GeminiClient,
    model: &Model,
    reporter: &mut Reporter<W>,
) -> io::Result<ProbeOutcome> {
    reporter.section("TEST 5: Timeout Scenarios")?;
    reporter.line("Testing potentially slow request...")?;
    reporter.line("(This might take a while or timeout)")?;

    let (elapsed, result) = ask_request(client, model, prompts::SLOW_PROMPT).await;
    let attempt = match result {
        Ok(response) => {
            let text = response.text();
            reporter.pass(format!("Slow request completed in {}", format_elapsed(elapsed)))?;
            reporter.detail(format!("Response length: {} chars", text.chars().count()))?;
            Attempt::success(model.as_str(), elapsed, &text)
        }
        Err(err) => {
            reporter.fail_with(
                format!("Slow request failed after {}", format_elapsed(elapsed)),
                &err,
            )?;
            if err.is_timeout() {
                reporter.detail(
                    "Client-side timeout reached; raise --request-timeout or GEMINI_PROBE_TIMEOUT_SECS",
                )?;
            }
            Attempt::failure(model.as_str(), elapsed, &err)
        }
    };
    Ok(ProbeOutcome::new(ProbeKind::Timeout, vec![attempt]))
}
