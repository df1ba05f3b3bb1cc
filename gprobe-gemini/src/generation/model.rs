use serde::{Deserialize, Serialize};

use crate::common::{Content, Role};
use crate::error::Error;

/// Configuration for generation
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// The temperature for the model (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// The top-p value for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// The top-k value for the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    /// The maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    /// The number of candidates to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,
}

/// Request to generate content
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The contents to generate content from
    pub contents: Vec<Content>,
    /// The generation config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Text of the last user turn.
    pub fn prompt_text(&self) -> String {
        self.contents
            .iter()
            .rev()
            .find(|c| c.role.as_ref().is_none_or(|r| *r == Role::User))
            .map(Content::joined_text)
            .unwrap_or_default()
    }
}

/// Reason why generation finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    /// Natural stop point of the model or provided stop sequence.
    Stop,
    /// The maximum number of tokens as specified in the request was reached.
    MaxTokens,
    Safety,
    Recitation,
    Language,
    Other,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    /// A reason this client does not know about yet.
    #[serde(other)]
    Unknown,
}

/// A generated candidate
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Feedback about the prompt
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token accounting for a call
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoughts_token_count: Option<u32>,
}

/// Response from `generateContent`
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerationResponse {
    /// Text of the first candidate, empty when there is none.
    pub fn text(&self) -> String {
        self.candidates.first().map(|c| c.content.joined_text()).unwrap_or_default()
    }

    /// Text of the first candidate, or an error explaining why there is none.
    pub fn try_text(&self) -> Result<String, Error> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(Error::PromptBlocked { reason });
        };

        let text = candidate.content.joined_text();
        if text.is_empty() {
            let finish_reason = candidate
                .finish_reason
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unspecified".to_string());
            return Err(Error::EmptyResponse { finish_reason });
        }
        Ok(text)
    }

    pub fn finish_reason(&self) -> Option<&FinishReason> {
        self.candidates.first().and_then(|c| c.finish_reason.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generation_config_omits_unset_fields() {
        let config = GenerationConfig {
            max_output_tokens: Some(50),
            temperature: Some(0.5),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"maxOutputTokens": 50, "temperature": 0.5})
        );
    }

    #[test]
    fn parses_a_vertex_response() {
        let response: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "API working correctly"}]},
                "finishReason": "STOP",
                "avgLogprobs": -0.01
            }],
            "usageMetadata": {
                "promptTokenCount": 9,
                "candidatesTokenCount": 4,
                "totalTokenCount": 13
            },
            "modelVersion": "gemini-2.0-flash"
        }))
        .unwrap();

        assert_eq!(response.try_text().unwrap(), "API working correctly");
        assert_eq!(response.finish_reason(), Some(&FinishReason::Stop));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, Some(13));
    }

    #[test]
    fn empty_candidate_reports_finish_reason() {
        let response: GenerationResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"role": "model"}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();

        let err = response.try_text().unwrap_err();
        assert!(matches!(
            &err,
            Error::EmptyResponse { finish_reason } if finish_reason == "MAX_TOKENS"
        ));
        assert_eq!(response.text(), "");
    }

    #[test]
    fn blocked_prompt_reports_block_reason() {
        let response: GenerationResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(matches!(
            response.try_text(),
            Err(Error::PromptBlocked { reason }) if reason == "SAFETY"
        ));
    }

    #[test]
    fn unknown_finish_reason_is_tolerated() {
        let candidate: Candidate =
            serde_json::from_value(json!({"finishReason": "SOMETHING_NEW"})).unwrap();
        assert_eq!(candidate.finish_reason, Some(FinishReason::Unknown));
    }

    #[test]
    fn prompt_text_uses_last_user_turn() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("first").with_role(Role::User), Content::text("second")],
            generation_config: None,
        };
        assert_eq!(request.prompt_text(), "second");
    }
}
