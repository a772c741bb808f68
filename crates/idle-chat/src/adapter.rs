//! Translation of provider stream events into the client protocol.

use idle_llm::{StreamEvent, TokenUsage, ToolCall};
use idle_types::{ChatStreamEvent, StreamOptions};
use serde_json::Value;
use std::collections::HashSet;

/// Converts provider events into client events
///
/// One provider event may expand to several client events, or to none.
pub trait StreamAdapter {
    type ProviderEvent;
    type ClientEvent;

    fn adapt(&mut self, event: Self::ProviderEvent) -> Vec<Self::ClientEvent>;
}

/// A tool call whose arguments parsed, ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedToolCall {
    pub call: ToolCall,
    pub input: Value,
}

/// What one LLM step produced besides the forwarded events
#[derive(Debug, Default)]
pub struct StepOutput {
    pub text: String,
    pub tool_calls: Vec<CollectedToolCall>,
}

/// Adapter for one assistant message, which may span several LLM steps
pub struct ChatStreamAdapter {
    options: StreamOptions,
    seen_urls: HashSet<String>,
    usage: Option<TokenUsage>,
    finish_reason: Option<String>,
    step: StepOutput,
}

impl ChatStreamAdapter {
    pub fn new(options: StreamOptions) -> Self {
        Self {
            options,
            seen_urls: HashSet::new(),
            usage: None,
            finish_reason: None,
            step: StepOutput::default(),
        }
    }

    /// Hand over the text and tool calls gathered since the last call
    pub fn take_step(&mut self) -> StepOutput {
        std::mem::take(&mut self.step)
    }

    /// Trailing events: usage when enabled, then `finish`
    pub fn finish(self) -> Vec<ChatStreamEvent> {
        let mut events = Vec::with_capacity(2);
        if self.options.send_usage {
            if let Some(usage) = self.usage {
                events.push(usage.into());
            }
        }
        events.push(ChatStreamEvent::Finish {
            finish_reason: self.finish_reason,
        });
        events
    }

    fn adapt_tool_call(&mut self, id: String, name: String, arguments: String) -> Vec<ChatStreamEvent> {
        let mut events = vec![
            ChatStreamEvent::ToolInputStart {
                tool_call_id: id.clone(),
                tool_name: name.clone(),
            },
            ChatStreamEvent::ToolInputDelta {
                tool_call_id: id.clone(),
                input_text_delta: arguments.clone(),
            },
        ];

        let call = ToolCall::new(id.clone(), name.clone(), arguments);
        match call.arguments_value() {
            Ok(input) => {
                events.push(ChatStreamEvent::ToolInputAvailable {
                    tool_call_id: id,
                    tool_name: name,
                    input: input.clone(),
                });
                self.step.tool_calls.push(CollectedToolCall { call, input });
            }
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "Model sent unparsable tool arguments");
                events.push(ChatStreamEvent::ToolOutputError {
                    tool_call_id: id,
                    error_text: format!("Invalid arguments for tool {}: {}", name, e),
                });
            }
        }

        events
    }
}

impl StreamAdapter for ChatStreamAdapter {
    type ProviderEvent = StreamEvent;
    type ClientEvent = ChatStreamEvent;

    fn adapt(&mut self, event: StreamEvent) -> Vec<ChatStreamEvent> {
        match event {
            StreamEvent::Message { content } => {
                if content.is_empty() {
                    return Vec::new();
                }
                self.step.text.push_str(&content);
                vec![ChatStreamEvent::TextDelta { delta: content }]
            }
            StreamEvent::Reasoning { content } => {
                if !self.options.send_reasoning || content.is_empty() {
                    return Vec::new();
                }
                vec![ChatStreamEvent::ReasoningDelta { delta: content }]
            }
            StreamEvent::ToolCall { id, name, arguments, .. } => self.adapt_tool_call(id, name, arguments),
            StreamEvent::Source { url, title, .. } => {
                if !self.options.send_sources || !self.seen_urls.insert(url.clone()) {
                    return Vec::new();
                }
                // Provider ids restart with every step; number per response instead
                let source_id = format!("src_{}", self.seen_urls.len());
                vec![ChatStreamEvent::SourceUrl { source_id, url, title }]
            }
            StreamEvent::File { mime_type, data } => vec![ChatStreamEvent::File {
                mime_type,
                base64_data: data,
            }],
            StreamEvent::Usage { usage } => {
                self.usage = Some(usage);
                Vec::new()
            }
            StreamEvent::Done { finish_reason } => {
                self.finish_reason = finish_reason;
                Vec::new()
            }
        }
    }
}
