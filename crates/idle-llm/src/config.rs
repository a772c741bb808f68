// Configuration layer for provider-agnostic LLM client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::traits::ChatClient;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Google,
}

/// Configuration for the Google Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    /// Base URL (optional, defaults to the public v1beta endpoint)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl GoogleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Google(GoogleConfig),
}

impl ProviderConfig {
    /// Create Google provider config
    pub fn google(api_key: impl Into<String>) -> Self {
        Self::Google(GoogleConfig::new(api_key))
    }

    pub fn with_base_url(self, base_url: Option<String>) -> Self {
        match (self, base_url) {
            (Self::Google(config), Some(url)) => Self::Google(config.with_base_url(url)),
            (config, None) => config,
        }
    }

    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Google(_) => ProviderType::Google,
        }
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        match config {
            ProviderConfig::Google(google) => {
                let mut client = crate::gemini::GeminiClient::new(google.api_key)?;
                if let Some(base_url) = google.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
        }
    }
}
