//! # Core Gemini API Primitives
//!
//! Building blocks shared by requests and responses:
//!
//! - [`Role`] - the speaker of a turn (User or Model)
//! - [`Part`] - a content fragment; text is typed, everything else is kept as raw JSON
//! - [`Content`] - a list of parts with an optional role
//! - [`Model`] - a model identifier and its resource paths

mod model;

pub use model::Model;

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user
    User,
    /// Message from the model
    Model,
}

/// Content part that can be included in a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,
        /// Whether this is a thought summary
        #[serde(skip_serializing_if = "Option::is_none")]
        thought: Option<bool>,
    },
    /// Any part kind the probe does not interpret (inline data, function calls, ...)
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into(), thought: None }
    }

    /// Text of a non-thought text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, thought } if !thought.unwrap_or(false) => Some(text),
            _ => None,
        }
    }
}

/// Content of a message
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Parts of the content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,
    /// Role of the content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Content {
    /// Create a new text content
    pub fn text(text: impl Into<String>) -> Self {
        Self { parts: vec![Part::text(text)], role: None }
    }

    /// Add a role to this content
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Concatenated text of all non-thought text parts.
    pub fn joined_text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_text_serializes_like_the_api() {
        let content = Content::text("Hello").with_role(Role::User);
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({"parts": [{"text": "Hello"}], "role": "user"})
        );
    }

    #[test]
    fn unknown_parts_are_kept_and_skipped_in_text() {
        let content: Content = serde_json::from_value(json!({
            "role": "model",
            "parts": [
                {"text": "thinking...", "thought": true},
                {"functionCall": {"name": "lookup", "args": {}}},
                {"text": "API working "},
                {"text": "correctly"}
            ]
        }))
        .unwrap();

        assert_eq!(content.parts.len(), 4);
        assert!(matches!(content.parts[1], Part::Other(_)));
        assert_eq!(content.joined_text(), "API working correctly");
    }
}
