//! Fixed prompts and sampling parameters for each probe.

/// Prompt text plus the generation parameters it is sent with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRequest {
    pub prompt: &'static str,
    pub max_output_tokens: i32,
    pub temperature: f32,
}

pub const MODEL_CHECK: ProbeRequest = ProbeRequest {
    prompt: "Hello! Please respond with 'API working correctly'",
    max_output_tokens: 50,
    temperature: 0.1,
};

/// A ranking prompt shaped like the ones a search front-end sends.
pub const COMPLEX_PROMPT: ProbeRequest = ProbeRequest {
    prompt: "
        You are an AI assistant helping to rank podcast episodes.
        Please analyze this episode title and provide a relevance score from 1-10
        for the query \"summarize latest episode\":

        Episode: \"Sam Altman: Entrepreneurial prodigy, Y Combinator President and OpenAI CEO\"

        Consider:
        1. How recent this episode might be
        2. How interesting the content would be
        3. The relevance to the user's query

        Respond with just a number from 1-10 and a brief explanation.
        ",
    max_output_tokens: 200,
    temperature: 0.3,
};

/// Characters of the complex-prompt answer shown in the report.
pub const COMPLEX_PREVIEW_CHARS: usize = 200;

pub const TOKEN_SWEEP_PROMPT: &str = "Write a short explanation of artificial intelligence.";
pub const TOKEN_SWEEP_TEMPERATURE: f32 = 0.5;
pub const TOKEN_LIMITS: [i32; 4] = [100, 1000, 4096, 8192];

pub const SLOW_PROMPT: ProbeRequest = ProbeRequest {
    prompt: "
        Please write a very detailed analysis of the impact of artificial intelligence
        on society, covering at least 10 different aspects in great detail.
        Make sure to provide specific examples and cite various perspectives.
        ",
    max_output_tokens: 4096,
    temperature: 0.7,
};
