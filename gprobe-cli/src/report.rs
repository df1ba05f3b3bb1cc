//! Human-readable probe output.

use std::io::{self, Write};
use std::time::Duration;

use display_error_chain::DisplayErrorChain;

const RULE_WIDTH: usize = 50;

pub const RECOMMENDATIONS: [&str; 3] = [
    "If all tests pass, the issue is likely in the consuming application's prompt complexity",
    "If complex prompts fail, try reducing max_output_tokens in the consuming application",
    "If timeouts occur, increase timeout values in the consuming application's configuration",
];

/// Writes the report to any sink; stdout in the binary, a buffer in tests.
pub struct Reporter<W: Write> {
    out: W,
    sections: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, sections: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "{}", text.as_ref())
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn rule(&mut self) -> io::Result<()> {
        self.line("=".repeat(RULE_WIDTH))
    }

    /// Banner framed by rules, separated from the previous section by a blank line.
    pub fn section(&mut self, title: impl AsRef<str>) -> io::Result<()> {
        if self.sections > 0 {
            self.blank()?;
        }
        self.sections += 1;
        self.rule()?;
        self.line(title)?;
        self.rule()
    }

    pub fn pass(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "✅ {}", text.as_ref())
    }

    pub fn fail(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "❌ {}", text.as_ref())
    }

    /// Failure line for `subject`, followed by the error and every cause.
    pub fn fail_with<E: std::error::Error>(
        &mut self,
        subject: impl AsRef<str>,
        error: &E,
    ) -> io::Result<()> {
        writeln!(self.out, "❌ {}: {}", subject.as_ref(), DisplayErrorChain::new(error))
    }

    /// Indented continuation line under a pass or fail line.
    pub fn detail(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.out, "   {}", text.as_ref())
    }

    pub fn header(&mut self, project_env: Option<&str>, api_key_set: bool) -> io::Result<()> {
        self.line("🚀 Starting Gemini API Tests")?;
        self.line(format!("GCP_PROJECT: {}", project_env.unwrap_or("Not set")))?;
        self.line(format!("GOOGLE_API_KEY: {}", if api_key_set { "Set" } else { "Not set" }))
    }

    pub fn completion(&mut self) -> io::Result<()> {
        self.blank()?;
        self.rule()?;
        self.line("🎉 All tests completed!")?;
        self.rule()?;

        self.blank()?;
        self.line("Recommendations:")?;
        for recommendation in RECOMMENDATIONS {
            self.line(format!("- {recommendation}"))?;
        }
        Ok(())
    }

    /// Blank-line-prefixed failure that ends the run early.
    pub fn abort(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        self.blank()?;
        self.fail(text)
    }
}

/// Seconds with two decimals, e.g. `1.23s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn first_section_has_no_leading_blank_line() {
        let output = render(|r| {
            r.section("TEST 1: Basic Vertex AI Connectivity")?;
            r.section("TEST 2: Simple Text Generation")
        });
        let rule = "=".repeat(50);
        assert_eq!(
            output,
            format!(
                "{rule}\nTEST 1: Basic Vertex AI Connectivity\n{rule}\n\n{rule}\nTEST 2: Simple Text Generation\n{rule}\n"
            )
        );
    }

    #[test]
    fn header_reports_unset_variables() {
        let output = render(|r| r.header(None, false));
        assert!(output.contains("GCP_PROJECT: Not set"));
        assert!(output.contains("GOOGLE_API_KEY: Not set"));

        let output = render(|r| r.header(Some("demo"), true));
        assert!(output.contains("GCP_PROJECT: demo"));
        assert!(output.contains("GOOGLE_API_KEY: Set"));
    }

    #[test]
    fn fail_with_includes_causes() {
        let outer = Wrapped(io::Error::other("connection reset"));
        let output = render(|r| r.fail_with("gemini-2.0-flash", &outer));
        assert!(output.starts_with("❌ gemini-2.0-flash: "));
        assert!(output.contains("connection reset"));
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "request failed")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn elapsed_has_two_decimals() {
        assert_eq!(format_elapsed(Duration::from_millis(1234)), "1.23s");
        assert_eq!(format_elapsed(Duration::ZERO), "0.00s");
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 200), "short");
    }
}
