use idle_llm::TokenUsage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events sent to the client over the chat stream
///
/// Serialized with a kebab-case `type` tag; the tag doubles as the SSE event name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ChatStreamEvent {
    Start {
        message_id: String,
    },

    TextDelta {
        delta: String,
    },

    ReasoningDelta {
        delta: String,
    },

    ToolInputStart {
        tool_call_id: String,
        tool_name: String,
    },

    ToolInputDelta {
        tool_call_id: String,
        input_text_delta: String,
    },

    ToolInputAvailable {
        tool_call_id: String,
        tool_name: String,
        input: Value,
    },

    ToolOutputAvailable {
        tool_call_id: String,
        output: Value,
    },

    ToolOutputError {
        tool_call_id: String,
        error_text: String,
    },

    SourceUrl {
        source_id: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    File {
        mime_type: String,
        base64_data: String,
    },

    Usage {
        input_tokens: u32,
        output_tokens: u32,
        total_tokens: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reasoning_tokens: Option<u32>,
    },

    Error {
        error_text: String,
    },

    Finish {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    /// Event kinds this build does not know; receivers skip them
    #[serde(other)]
    Unknown,
}

impl ChatStreamEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::TextDelta { .. } => "text-delta",
            Self::ReasoningDelta { .. } => "reasoning-delta",
            Self::ToolInputStart { .. } => "tool-input-start",
            Self::ToolInputDelta { .. } => "tool-input-delta",
            Self::ToolInputAvailable { .. } => "tool-input-available",
            Self::ToolOutputAvailable { .. } => "tool-output-available",
            Self::ToolOutputError { .. } => "tool-output-error",
            Self::SourceUrl { .. } => "source-url",
            Self::File { .. } => "file",
            Self::Usage { .. } => "usage",
            Self::Error { .. } => "error",
            Self::Finish { .. } => "finish",
            Self::Unknown => "unknown",
        }
    }

    /// `finish` and `error` end a stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finish { .. } | Self::Error { .. })
    }

    pub fn error(error_text: impl Into<String>) -> Self {
        Self::Error { error_text: error_text.into() }
    }
}

impl From<TokenUsage> for ChatStreamEvent {
    fn from(usage: TokenUsage) -> Self {
        Self::Usage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            total_tokens: usage.total_tokens,
            reasoning_tokens: usage.reasoning_tokens,
        }
    }
}
