pub mod catalog;
pub mod config;
pub mod events;
pub mod message;
pub mod request;

pub use catalog::{AgentSummary, Model, Suggestion};
pub use config::StreamOptions;
pub use events::ChatStreamEvent;
pub use message::{ChatMessage, Part, Role, ToolCallPart, ToolCallState};
pub use request::ChatRequestBody;
