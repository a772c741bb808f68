use config::{Config as ConfigLoader, ConfigError, Environment, File};
use idle_types::StreamOptions;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub stream: StreamOptions,
    #[serde(default)]
    pub agents: AgentsConfig,
    pub logging: LoggingConfig,

    // Secret (from ENV only)
    #[serde(default)]
    pub google_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Hard limit for one chat response
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

impl ServerConfig {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
    /// 1 keeps tool results out of the model's context
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Override the provider endpoint (proxies, tests)
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentsConfig {
    /// Reference text appended to the n8n builder prompt
    #[serde(default)]
    pub n8n_context_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_max_duration_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.5
}

fn default_thinking_budget() -> u32 {
    2048
}

fn default_max_steps() -> usize {
    1
}

fn default_image_model() -> String {
    idle_agents::model::GEMINI_IMAGE_GENERATION.to_string()
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (ENV defaults to `dev`)
    /// 3. `IDLE_` environment variables, `__` between section and key
    ///    (e.g. `IDLE_SERVER__PORT=9000`, `IDLE_LLM__DEFAULT_MODEL=gemini-2.5-pro`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("IDLE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Optional: without it only caller supplied keys work
        cfg.google_api_key = std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.trim().is_empty());

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [llm]
            default_model = "gemini-2.5-flash"
            thinking_budget = 1024

            [stream]
            send_usage = false

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_duration(), Duration::from_secs(60));
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.llm.thinking_budget, 1024);
        assert_eq!(config.llm.max_steps, 1);
        assert_eq!(config.llm.image_model, "gemini-2.0-flash-preview-image-generation");
        assert!(!config.stream.send_usage);
        assert!(config.stream.send_sources);
        assert!(config.agents.n8n_context_path.is_none());
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn test_default_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let config = Config::from_file(path).unwrap();
        assert_eq!(config.llm.default_model, "gemini-2.5-flash");
    }
}
