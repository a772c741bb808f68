use serde::{Deserialize, Serialize};

use crate::traits::TokenUsage;

/// Provider-agnostic streaming event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Reasoning {
        content: String,
    },
    
    Message {
        content: String,
    },
    
    /// Complete function call (Gemini does not stream arguments)
    ToolCall {
        index: u32,
        id: String,
        name: String,
        arguments: String,
    },
    
    /// Grounding citation
    Source {
        id: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    
    /// Inline file produced by the model
    File {
        mime_type: String,
        data: String,
    },
    
    /// Cumulative token usage reported so far
    Usage {
        usage: TokenUsage,
    },
    
    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}
