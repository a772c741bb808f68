use crate::error::CatalogError;
use crate::prompts;
use crate::tools::{ShowPromptInCanvas, ShowWorkflowInCanvas, ToolSet};
use idle_types::{AgentSummary, Suggestion};
use std::collections::HashMap;
use std::sync::Arc;

/// Settings used when a request names no agent or an unknown one
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultAgentConfig {
    pub system_prompt: String,
    pub temperature: f32,
}

impl Default for DefaultAgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: prompts::DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub description: String,
    pub image: String,
    pub agent_name: String,
    pub system_prompt: String,
    pub tools: ToolSet,
    pub suggestions: Vec<Suggestion>,
    pub user_search: bool,
    /// Overrides the default temperature when set
    pub temperature: Option<f32>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        agent_name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image.into(),
            agent_name: agent_name.into(),
            system_prompt: system_prompt.into(),
            tools: ToolSet::new(),
            suggestions: Vec::new(),
            user_search: false,
            temperature: None,
        }
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_user_search(mut self, user_search: bool) -> Self {
        self.user_search = user_search;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            name: self.name.clone(),
            agent_name: self.agent_name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            suggestions: self.suggestions.clone(),
            user_search: self.user_search,
            tools: self.tools.names(),
        }
    }
}

/// Immutable registry of agents, keyed by `agent_name`
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: Vec<Agent>,
    index: HashMap<String, usize>,
    default_config: DefaultAgentConfig,
}

impl AgentCatalog {
    pub fn new(agents: Vec<Agent>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(agents.len());
        for (position, agent) in agents.iter().enumerate() {
            if index.insert(agent.agent_name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateAgent(agent.agent_name.clone()));
            }
        }

        Ok(Self {
            agents,
            index,
            default_config: DefaultAgentConfig::default(),
        })
    }

    pub fn with_default_config(mut self, config: DefaultAgentConfig) -> Self {
        self.default_config = config;
        self
    }

    pub fn lookup(&self, agent_name: &str) -> Option<&Agent> {
        self.index.get(agent_name).map(|&i| &self.agents[i])
    }

    pub fn list(&self) -> &[Agent] {
        &self.agents
    }

    pub fn summaries(&self) -> Vec<AgentSummary> {
        self.agents.iter().map(Agent::summary).collect()
    }

    pub fn default_config(&self) -> &DefaultAgentConfig {
        &self.default_config
    }

    /// The agents shipped with Idle
    ///
    /// `n8n_context` is reference material appended to the n8n builder's prompt.
    pub fn builtin(n8n_context: Option<&str>) -> Result<Self, CatalogError> {
        Self::new(vec![
            Agent::new(
                "AI Prompt Generator",
                "ai-prompt-generator",
                "A helpful assistant that can help you with your tasks.",
                "/images/agents/ai-prompt-generator.png",
                prompts::AI_PROMPT_GENERATOR_SYSTEM_PROMPT,
            )
            .with_tools(ToolSet::new().with(Arc::new(ShowPromptInCanvas))),
            Agent::new(
                "Yoda",
                "yoda",
                "Yoda is a helpful assistant that can help you with your tasks.",
                "https://s1.elespanol.com/2015/12/11/actualidad/actualidad_86001588_298582_1706x1280.jpg",
                prompts::YODA_SYSTEM_PROMPT,
            ),
            Agent::new(
                "Socrates",
                "socrates",
                "Socrates is a helpful assistant that can help you with your tasks.",
                "https://dialektika.org/wp-content/uploads/2023/05/Socrates.jpg.webp",
                prompts::SOCRATES_SYSTEM_PROMPT,
            ),
            Agent::new(
                "n8n builder",
                "n8n-builder",
                "It is helpful to build workflows using n8n.",
                "/images/agents/n8n-agent.png",
                prompts::n8n_prompt_with_context(n8n_context),
            )
            .with_tools(ToolSet::new().with(Arc::new(ShowWorkflowInCanvas)))
            .with_suggestions(vec![
                Suggestion::new(
                    "Automate Slack notifications",
                    "Create workflow to send a message to a Slack channel when a new email is received",
                ),
                Suggestion::new(
                    "Track Strava workouts",
                    "Using the Strava API, track my workouts and, if I skip too many, send me a message to my email.",
                ),
            ]),
            Agent::new(
                "Learn with Quizzy",
                "quizzy",
                "Agent that helps you learn and understand any topic.",
                "/images/agents/quizzy-agent.png",
                prompts::QUIZZY_SYSTEM_PROMPT,
            ),
            Agent::new(
                "Formal Writer",
                "formal",
                "Create perfect, professional and too formal messages.",
                "/images/agents/formal-agent.png",
                prompts::FORMAL_SYSTEM_PROMPT,
            )
            .with_suggestions(vec![
                Suggestion::new("Write a birthday message", "Write a birthday message"),
                Suggestion::new(
                    "A letter of introduction",
                    "Write a professional letter of introduction",
                ),
                Suggestion::new(
                    "Instagram Post",
                    "Write a large and formal instagram post about potato cultivation",
                ),
            ]),
            Agent::new(
                "AI Factly",
                "fact-checker",
                "Check if something is true, false or mixed.",
                "/images/agents/fact-checker-agent.png",
                prompts::FACT_CHECKER_SYSTEM_PROMPT,
            )
            .with_user_search(true)
            .with_suggestions(vec![
                Suggestion::new("Is the moon made of cheese?", "Is the moon made of cheese?"),
                Suggestion::new("Is Mark Zuckerberg an alien?", "Is Mark Zuckerberg an alien?"),
                Suggestion::new("Is the Earth flat?", "Is the Earth flat?"),
            ]),
        ])
    }
}
