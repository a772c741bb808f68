pub mod agent;
pub mod error;
pub mod model;
pub mod prompts;
pub mod tools;

pub use agent::{Agent, AgentCatalog, DefaultAgentConfig};
pub use error::CatalogError;
pub use model::ModelCatalog;
pub use tools::{
    baseline_tools, GenerateImageTool, ShowPromptInCanvas, ShowWorkflowInCanvas, Tool, ToolSet,
};
