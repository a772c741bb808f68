//! Gemini response parsing.
//!
//! With `alt=sse` every event carries one `GenerateContentResponse`:
//! ```text
//! data: {"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]}
//!
//! data: {"candidates":[{"content":{"parts":[{"text":"!"}]},"finishReason":"STOP"}],"usageMetadata":{...}}
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::buffer_utils::SseLineParser;
use crate::error::ProviderError;
use crate::streaming::StreamEvent;
use crate::traits::TokenUsage;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    pub text: Option<String>,
    #[serde(default)]
    pub thought: bool,
    pub function_call: Option<FunctionCallPart>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallPart {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
    pub thoughts_token_count: Option<u32>,
}

impl From<UsageMetadata> for TokenUsage {
    fn from(usage: UsageMetadata) -> Self {
        Self {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
            total_tokens: usage.total_token_count,
            reasoning_tokens: usage.thoughts_token_count,
        }
    }
}

/// Stateful parser: numbers tool calls and de-duplicates grounding sources
#[derive(Debug, Default)]
pub struct GeminiStreamParser {
    next_tool_index: u32,
    seen_sources: HashSet<String>,
}

impl GeminiStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one response chunk into provider-agnostic events
    pub fn events_from_chunk(&mut self, chunk: GenerateContentResponse) -> Result<Vec<StreamEvent>> {
        if let Some(error) = chunk.error {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ProviderError::Stream {
                provider: "Gemini",
                message,
            }
            .into());
        }

        let mut events = Vec::new();
        let mut finish_reason = None;

        // Gemini returns a single candidate unless candidateCount is set
        if let Some(candidate) = chunk.candidates.into_iter().next() {
            if let Some(content) = candidate.content {
                for part in content.parts {
                    self.push_part_events(part, &mut events)?;
                }
            }

            if let Some(grounding) = candidate.grounding_metadata {
                for web in grounding.grounding_chunks.into_iter().filter_map(|c| c.web) {
                    if self.seen_sources.insert(web.uri.clone()) {
                        events.push(StreamEvent::Source {
                            id: format!("src_{}", self.seen_sources.len()),
                            url: web.uri,
                            title: web.title,
                        });
                    }
                }
            }

            finish_reason = candidate.finish_reason;
        }

        if let Some(usage) = chunk.usage_metadata {
            events.push(StreamEvent::Usage {
                usage: usage.into(),
            });
        }

        if let Some(reason) = finish_reason {
            events.push(StreamEvent::Done {
                finish_reason: Some(reason.to_lowercase()),
            });
        }

        Ok(events)
    }

    fn push_part_events(&mut self, part: ResponsePart, events: &mut Vec<StreamEvent>) -> Result<()> {
        if let Some(text) = part.text {
            if !text.is_empty() {
                if part.thought {
                    events.push(StreamEvent::Reasoning { content: text });
                } else {
                    events.push(StreamEvent::Message { content: text });
                }
            }
        }

        if let Some(call) = part.function_call {
            let args = if call.args.is_null() {
                Value::Object(serde_json::Map::new())
            } else {
                call.args
            };
            let index = self.next_tool_index;
            self.next_tool_index += 1;
            events.push(StreamEvent::ToolCall {
                index,
                id: format!("call_{}", uuid::Uuid::new_v4().simple()),
                name: call.name,
                arguments: serde_json::to_string(&args).context("Failed to serialize function args")?,
            });
        }

        if let Some(inline) = part.inline_data {
            events.push(StreamEvent::File {
                mime_type: inline.mime_type,
                data: inline.data,
            });
        }

        Ok(())
    }
}

impl SseLineParser for GeminiStreamParser {
    type Event = StreamEvent;

    fn parse_data_line(&mut self, data: &str) -> Result<Vec<StreamEvent>> {
        let chunk: GenerateContentResponse = serde_json::from_str(data)
            .with_context(|| format!("Failed to parse Gemini chunk: {}", data))?;
        self.events_from_chunk(chunk)
    }
}
