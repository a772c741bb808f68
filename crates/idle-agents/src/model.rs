use idle_types::Model;

pub const GEMINI_2_5_PRO: &str = "gemini-2.5-pro";
pub const GEMINI_2_5_FLASH: &str = "gemini-2.5-flash";
pub const GEMINI_2_5_FLASH_LITE: &str = "gemini-2.5-flash-lite";
/// Legacy experimental model; rejects a thinking budget
pub const GEMINI_2_0_FLASH_EXP: &str = "gemini-2.0-flash-exp";
pub const GEMINI_IMAGE_GENERATION: &str = "gemini-2.0-flash-preview-image-generation";

/// Whether a thinking budget may be sent for `model`
pub fn supports_thinking_budget(model: &str) -> bool {
    model != GEMINI_2_0_FLASH_EXP
}

/// Models offered to the client
///
/// Lookups are advisory. An identifier missing here is still forwarded to the
/// provider as is.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<Model>,
    default_model: String,
}

impl ModelCatalog {
    pub fn new(models: Vec<Model>, default_model: impl Into<String>) -> Self {
        Self {
            models,
            default_model: default_model.into(),
        }
    }

    pub fn builtin() -> Self {
        let description = "Advanced reasoning, coding, and multimodal understanding.";
        let model = |name: &str, value: &str| Model {
            name: name.to_string(),
            provider: "Google".to_string(),
            description: description.to_string(),
            value: value.to_string(),
        };

        Self::new(
            vec![
                model("Gemini 2.5 Pro", GEMINI_2_5_PRO),
                model("Gemini 2.5 Flash", GEMINI_2_5_FLASH),
                model("Gemini 2.5 Flash Lite", GEMINI_2_5_FLASH_LITE),
            ],
            GEMINI_2_5_FLASH,
        )
    }

    pub fn with_default_model(mut self, value: impl Into<String>) -> Self {
        self.default_model = value.into();
        self
    }

    pub fn list(&self) -> &[Model] {
        &self.models
    }

    pub fn lookup(&self, value: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.value == value)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models() {
        let catalog = ModelCatalog::builtin();
        let values: Vec<_> = catalog.list().iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec![GEMINI_2_5_PRO, GEMINI_2_5_FLASH, GEMINI_2_5_FLASH_LITE]);
        assert_eq!(catalog.default_model(), GEMINI_2_5_FLASH);
        assert_eq!(catalog.lookup(GEMINI_2_5_PRO).unwrap().name, "Gemini 2.5 Pro");
        assert!(catalog.lookup("gpt-4o").is_none());
    }

    #[test]
    fn test_thinking_budget_exclusion() {
        assert!(supports_thinking_budget(GEMINI_2_5_FLASH));
        assert!(supports_thinking_budget("some-future-model"));
        assert!(!supports_thinking_budget(GEMINI_2_0_FLASH_EXP));
    }
}
