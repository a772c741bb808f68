use crate::client_factory::ClientResolver;
use crate::error::DispatchError;
use crate::fact_check::{self, FACT_CHECKER_AGENT};
use crate::run::{spawn_run, RunConfig};
use idle_agents::model::supports_thinking_budget;
use idle_agents::{AgentCatalog, ToolSet};
use idle_llm::{
    ChatOptions, ChatRequest, DynamicRetrievalConfig, Message, ProviderOptions, ThinkingConfig,
};
use idle_types::{ChatRequestBody, ChatStreamEvent, StreamOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub thinking_budget: u32,
    pub max_steps: usize,
    pub max_duration: Duration,
    pub stream: StreamOptions,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            thinking_budget: 2048,
            max_steps: 1,
            max_duration: Duration::from_secs(60),
            stream: StreamOptions::default(),
        }
    }
}

/// Everything needed to call the provider for one request
#[derive(Debug, Clone)]
pub struct PreparedChat {
    pub model: String,
    /// Resolved agent, `None` when the default configuration applies
    pub agent_name: Option<String>,
    pub system_prompt: String,
    /// Conversation in provider shape, without the system prompt
    pub messages: Vec<Message>,
    pub tools: ToolSet,
    pub temperature: f32,
    pub provider: ProviderOptions,
}

impl PreparedChat {
    pub fn request(&self) -> ChatRequest {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.messages.iter().cloned());

        let mut options = ChatOptions::new()
            .temperature(self.temperature)
            .provider(self.provider.clone());
        if !self.tools.is_empty() {
            options = options.tools(self.tools.definitions());
        }

        ChatRequest::new(self.model.clone(), messages).with_options(options)
    }
}

/// Stateless request handler; the catalogs and tools are shared read-only
pub struct ChatDispatcher {
    agents: Arc<AgentCatalog>,
    baseline_tools: ToolSet,
    resolver: Arc<dyn ClientResolver>,
    config: DispatchConfig,
}

impl ChatDispatcher {
    pub fn new(
        agents: Arc<AgentCatalog>,
        baseline_tools: ToolSet,
        resolver: Arc<dyn ClientResolver>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            agents,
            baseline_tools,
            resolver,
            config,
        }
    }

    pub fn agents(&self) -> &AgentCatalog {
        &self.agents
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Resolve agent, tools and provider options without any I/O
    pub fn prepare(&self, body: &ChatRequestBody) -> PreparedChat {
        let requested = body.agent_name.as_deref().filter(|name| !name.is_empty());
        let agent = requested.and_then(|name| self.agents.lookup(name));
        if agent.is_none() {
            if let Some(name) = requested {
                tracing::debug!(agent = %name, "Unknown agent; using default configuration");
            }
        }

        let mut conversation = body.messages.clone();
        let is_fact_checker = agent.map_or(false, |a| a.agent_name == FACT_CHECKER_AGENT);
        if is_fact_checker {
            fact_check::augment(&mut conversation);
        }

        let defaults = self.agents.default_config();
        let (system_prompt, tools, temperature) = match agent {
            Some(agent) => (
                agent.system_prompt.clone(),
                ToolSet::merge(&self.baseline_tools, &agent.tools),
                agent.temperature.unwrap_or(defaults.temperature),
            ),
            None => (
                defaults.system_prompt.clone(),
                self.baseline_tools.clone(),
                defaults.temperature,
            ),
        };

        let mut provider = ProviderOptions::new().search_grounding(body.search_grounding());
        if is_fact_checker {
            provider = provider.dynamic_retrieval(DynamicRetrievalConfig::always());
        }
        if supports_thinking_budget(&body.model) {
            provider = provider.thinking(ThinkingConfig::budget(self.config.thinking_budget));
        }

        PreparedChat {
            model: body.model.clone(),
            agent_name: agent.map(|a| a.agent_name.clone()),
            system_prompt,
            messages: conversation.iter().flat_map(|m| m.to_model_messages()).collect(),
            tools,
            temperature,
            provider,
        }
    }

    /// Prepare the request, resolve the provider client and spawn the run
    pub fn stream(&self, body: ChatRequestBody) -> Result<mpsc::Receiver<ChatStreamEvent>, DispatchError> {
        let prepared = self.prepare(&body);
        let client = self
            .resolver
            .resolve(body.api_key())
            .map_err(DispatchError::ClientSetup)?;

        tracing::info!(
            model = %prepared.model,
            agent = prepared.agent_name.as_deref().unwrap_or("default"),
            messages = prepared.messages.len(),
            tools = prepared.tools.len(),
            search = prepared.provider.search_grounding,
            "Dispatching chat"
        );

        let run_config = RunConfig {
            max_steps: self.config.max_steps,
            max_duration: self.config.max_duration,
            stream: self.config.stream,
        };

        Ok(spawn_run(client, prepared.tools.clone(), prepared.request(), run_config))
    }
}
