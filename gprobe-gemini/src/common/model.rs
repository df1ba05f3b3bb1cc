use serde::{Deserialize, Serialize};
use std::fmt::{self, Formatter};

/// A Gemini model identifier.
///
/// Accepts bare ids (`gemini-2.0-flash`), Developer API names
/// (`models/gemini-2.0-flash`) and fully qualified Vertex resource names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Model(String);

impl Default for Model {
    fn default() -> Self {
        Self::GEMINI_2_0_FLASH.into()
    }
}

impl Model {
    pub const GEMINI_2_0_FLASH: &'static str = "gemini-2.0-flash";
    pub const GEMINI_2_0_FLASH_LITE: &'static str = "gemini-2.0-flash-lite";
    pub const GEMINI_2_0_FLASH_EXP: &'static str = "gemini-2.0-flash-exp";

    pub fn new(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare model id, without any resource prefix.
    pub fn id(&self) -> &str {
        let model = self.as_str();
        match model.rsplit_once("/models/") {
            Some((_, id)) => id,
            None => model.strip_prefix("models/").unwrap_or(model),
        }
    }

    pub fn vertex_model_path(&self, project_id: &str, location: &str) -> String {
        let model = self.as_str();
        if model.starts_with("projects/") {
            return model.to_string();
        }
        if model.starts_with("publishers/") {
            return format!("projects/{project_id}/locations/{location}/{model}");
        }
        let model_id = model.strip_prefix("models/").unwrap_or(model);
        format!("projects/{project_id}/locations/{location}/publishers/google/models/{model_id}")
    }

    pub fn studio_model_path(&self) -> String {
        format!("models/{}", self.id())
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Self(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Self(model.to_string())
    }
}

impl From<&Model> for Model {
    fn from(model: &Model) -> Self {
        model.clone()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_path_from_bare_id() {
        let model = Model::new("gemini-2.0-flash");
        assert_eq!(
            model.vertex_model_path("demo", "us-central1"),
            "projects/demo/locations/us-central1/publishers/google/models/gemini-2.0-flash"
        );
    }

    #[test]
    fn vertex_path_strips_models_prefix() {
        let model = Model::new("models/gemini-2.0-flash-lite");
        assert_eq!(
            model.vertex_model_path("demo", "europe-west4"),
            "projects/demo/locations/europe-west4/publishers/google/models/gemini-2.0-flash-lite"
        );
    }

    #[test]
    fn vertex_path_keeps_qualified_names() {
        let qualified = "projects/p/locations/l/publishers/google/models/gemini-2.0-flash";
        assert_eq!(Model::new(qualified).vertex_model_path("x", "y"), qualified);

        let publisher = Model::new("publishers/google/models/gemini-2.0-flash");
        assert_eq!(
            publisher.vertex_model_path("demo", "us-central1"),
            "projects/demo/locations/us-central1/publishers/google/models/gemini-2.0-flash"
        );
    }

    #[test]
    fn studio_path_and_id() {
        assert_eq!(Model::new("gemini-2.0-flash").studio_model_path(), "models/gemini-2.0-flash");
        assert_eq!(
            Model::new("models/gemini-2.0-flash").studio_model_path(),
            "models/gemini-2.0-flash"
        );
        let qualified =
            Model::new("projects/p/locations/l/publishers/google/models/gemini-2.0-flash-exp");
        assert_eq!(qualified.id(), "gemini-2.0-flash-exp");
    }

    #[test]
    fn default_is_first_candidate() {
        assert_eq!(Model::default().as_str(), Model::GEMINI_2_0_FLASH);
    }
}
