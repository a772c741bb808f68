use anyhow::{Context, Result};
use idle_agents::{baseline_tools, AgentCatalog, DefaultAgentConfig, ModelCatalog};
use idle_chat::{ChatDispatcher, ClientResolver, DispatchConfig, GoogleClientResolver};
use std::sync::Arc;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Everything is read-only after startup, so handlers share it without locks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<ChatDispatcher>,
    pub models: Arc<ModelCatalog>,
    pub has_server_key: bool,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self> {
        let n8n_context = match &config.agents.n8n_context_path {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read n8n context from {}", path))?,
            ),
            None => None,
        };

        let agents = AgentCatalog::builtin(n8n_context.as_deref())?.with_default_config(DefaultAgentConfig {
            temperature: config.llm.temperature,
            ..DefaultAgentConfig::default()
        });

        let resolver = GoogleClientResolver::new(config.google_api_key.clone(), config.llm.base_url.clone())
            .context("Failed to create provider client")?;
        let has_server_key = resolver.has_server_key();
        if !has_server_key {
            tracing::warn!("GOOGLE_API_KEY not set; requests must carry their own apiKey");
        }

        let image_client = match resolver.server_client() {
            Some(client) => client,
            None => resolver.resolve(None)?,
        };
        let baseline = baseline_tools(image_client, config.llm.image_model.clone());

        let dispatch_config = DispatchConfig {
            thinking_budget: config.llm.thinking_budget,
            max_steps: config.llm.max_steps,
            max_duration: config.server.max_duration(),
            stream: config.stream,
        };

        let dispatcher = ChatDispatcher::new(Arc::new(agents), baseline, Arc::new(resolver), dispatch_config);
        let models = ModelCatalog::builtin().with_default_model(config.llm.default_model.clone());

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            models: Arc::new(models),
            has_server_key,
        })
    }
}
