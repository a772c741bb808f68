pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod config;
pub mod error;
pub mod gemini;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    ProviderOptions, DynamicRetrievalConfig, ThinkingConfig,
    EventStream, GeneratedFile, TokenUsage,
};

pub use streaming::StreamEvent;
pub use buffer_utils::{CircularLineBuffer, SseLineParser, parse_sse_stream};
pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use error::{ProviderError, error_message_from_body};
pub use gemini::GeminiClient;
pub use types::{Message, Content, ContentPart, Tool, ToolCall};
