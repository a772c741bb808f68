use chrono::{DateTime, Utc};
use idle_llm::{Content, ContentPart, Message as LLMMessage, ToolCall};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One conversation entry as seen by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ordered piece of a message, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Part {
    Text {
        content: String,
    },
    Reasoning {
        content: String,
    },
    ToolCall(ToolCallPart),
    File {
        mime_type: String,
        base64_data: String,
    },
    Source {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Any part kind this version does not know
    ///
    /// Only its position survives. The payload is dropped, it serializes back
    /// as `{"type":"unknown"}` and it is never sent to the model.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallPart {
    pub tool_call_id: String,
    pub tool_name: String,
    pub state: ToolCallState,
    #[serde(default)]
    pub args: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

/// Lifecycle of a tool invocation; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCallState {
    InputStreaming,
    InputAvailable,
    OutputAvailable,
    OutputError,
}

impl ToolCallState {
    fn rank(self) -> u8 {
        match self {
            Self::InputStreaming => 0,
            Self::InputAvailable => 1,
            Self::OutputAvailable | Self::OutputError => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Staying put is allowed, going back or switching terminal states is not
    pub fn can_transition_to(self, next: ToolCallState) -> bool {
        next == self || next.rank() > self.rank()
    }
}

impl ToolCallPart {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            state: ToolCallState::InputStreaming,
            args: Value::Null,
            result: None,
            error_text: None,
        }
    }

    /// Move to `next` if that is a forward step; returns whether it applied
    pub fn advance(&mut self, next: ToolCallState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            false
        }
    }
}

impl ChatMessage {
    pub fn new(id: impl Into<String>, role: Role, parts: Vec<Part>) -> Self {
        Self {
            id: id.into(),
            role,
            parts,
            created_at: Some(Utc::now()),
        }
    }

    /// User message with a single text part and a fresh id
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            Role::User,
            vec![Part::Text { content: text.into() }],
        )
    }

    pub fn assistant(id: impl Into<String>) -> Self {
        Self::new(id, Role::Assistant, Vec::new())
    }

    /// Text parts joined by newlines; other parts are ignored
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { content } => Some(content.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the text content in place, keeping every non-text part
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        match self.parts.iter().position(|p| matches!(p, Part::Text { .. })) {
            Some(first) => {
                self.parts[first] = Part::Text { content: text };
                let mut index = 0;
                self.parts.retain(|part| {
                    let keep = index == first || !matches!(part, Part::Text { .. });
                    index += 1;
                    keep
                });
            }
            None => self.parts.insert(0, Part::Text { content: text }),
        }
    }

    pub fn tool_call(&self, tool_call_id: &str) -> Option<&ToolCallPart> {
        self.parts.iter().find_map(|part| match part {
            Part::ToolCall(call) if call.tool_call_id == tool_call_id => Some(call),
            _ => None,
        })
    }

    pub fn tool_call_mut(&mut self, tool_call_id: &str) -> Option<&mut ToolCallPart> {
        self.parts.iter_mut().find_map(|part| match part {
            Part::ToolCall(call) if call.tool_call_id == tool_call_id => Some(call),
            _ => None,
        })
    }

    /// Convert to provider messages
    ///
    /// Reasoning, sources and unknown parts are dropped. Tool calls are only
    /// replayed once they have an output.
    pub fn to_model_messages(&self) -> Vec<LLMMessage> {
        match self.role {
            Role::User => {
                let parts: Vec<ContentPart> = self
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { content } => Some(ContentPart::Text { text: content.clone() }),
                        Part::File { mime_type, base64_data } => Some(ContentPart::InlineData {
                            mime_type: mime_type.clone(),
                            data: base64_data.clone(),
                        }),
                        _ => None,
                    })
                    .collect();

                match parts.as_slice() {
                    [] => Vec::new(),
                    [ContentPart::Text { text }] => vec![LLMMessage::human(text.clone())],
                    _ => vec![LLMMessage::human(Content::Parts(parts))],
                }
            }
            Role::Assistant => {
                let text = self.text();
                let finished: Vec<&ToolCallPart> = self
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::ToolCall(call) if call.state.is_terminal() => Some(call),
                        _ => None,
                    })
                    .collect();

                if finished.is_empty() {
                    return if text.is_empty() {
                        Vec::new()
                    } else {
                        vec![LLMMessage::ai(text)]
                    };
                }

                let calls = finished
                    .iter()
                    .map(|call| ToolCall::new(&call.tool_call_id, &call.tool_name, call.args.to_string()))
                    .collect();

                let mut messages = vec![LLMMessage::AI {
                    content: (!text.is_empty()).then(|| Content::text(text)),
                    tool_calls: Some(calls),
                }];

                for call in finished {
                    let output = match (&call.result, &call.error_text) {
                        (Some(result), _) => result.clone(),
                        (None, Some(error)) => serde_json::json!({ "error": error }),
                        (None, None) => Value::Null,
                    };
                    messages.push(LLMMessage::tool_result(&call.tool_call_id, &call.tool_name, output));
                }

                messages
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_state_order() {
        use ToolCallState::*;
        assert!(InputStreaming.can_transition_to(InputAvailable));
        assert!(InputStreaming.can_transition_to(OutputError));
        assert!(InputAvailable.can_transition_to(OutputAvailable));
        assert!(InputAvailable.can_transition_to(InputAvailable));
        assert!(!InputAvailable.can_transition_to(InputStreaming));
        assert!(!OutputAvailable.can_transition_to(OutputError));
        assert!(!OutputError.can_transition_to(InputAvailable));
    }

    #[test]
    fn test_set_text_keeps_other_parts() {
        let mut message = ChatMessage::new(
            "m1",
            Role::User,
            vec![
                Part::Text { content: "old".into() },
                Part::File { mime_type: "image/png".into(), base64_data: "AAA".into() },
                Part::Text { content: "more".into() },
            ],
        );

        message.set_text("new");

        assert_eq!(message.parts.len(), 2);
        assert_eq!(message.text(), "new");
        assert!(matches!(message.parts[1], Part::File { .. }));
    }

    #[test]
    fn test_set_text_without_text_part() {
        let mut message = ChatMessage::new("m1", Role::User, Vec::new());
        message.set_text("hello");
        assert_eq!(message.text(), "hello");
    }

    #[test]
    fn test_part_wire_format() {
        let part = Part::File { mime_type: "image/png".into(), base64_data: "AAA".into() };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"type": "file", "mimeType": "image/png", "base64Data": "AAA"}));

        let call: Part = serde_json::from_value(serde_json::json!({
            "type": "tool-call",
            "toolCallId": "c1",
            "toolName": "showPromptInCanvas",
            "state": "output-available",
            "args": {"prompt": "p"},
            "result": {"prompt": "p"}
        }))
        .unwrap();
        assert!(matches!(call, Part::ToolCall(ref c) if c.state == ToolCallState::OutputAvailable));
    }

    #[test]
    fn test_unknown_part_passes_through() {
        let part: Part = serde_json::from_value(serde_json::json!({"type": "step-start"})).unwrap();
        assert_eq!(part, Part::Unknown);
        assert_eq!(serde_json::to_value(&part).unwrap(), serde_json::json!({"type": "unknown"}));

        let message = ChatMessage::new("u1", Role::User, vec![Part::Text { content: "hi".into() }, part]);
        assert_eq!(message.to_model_messages(), vec![LLMMessage::human("hi")]);
    }

    #[test]
    fn test_user_message_with_file_becomes_multipart() {
        let message = ChatMessage::new(
            "m1",
            Role::User,
            vec![
                Part::Text { content: "what is this?".into() },
                Part::File { mime_type: "image/png".into(), base64_data: "AAA".into() },
            ],
        );

        let converted = message.to_model_messages();
        assert_eq!(converted.len(), 1);
        match &converted[0] {
            LLMMessage::Human { content: Content::Parts(parts) } => assert_eq!(parts.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assistant_tool_calls_replayed_with_results() {
        let mut finished = ToolCallPart::new("c1", "showPromptInCanvas");
        finished.state = ToolCallState::OutputAvailable;
        finished.args = serde_json::json!({"prompt": "p"});
        finished.result = Some(serde_json::json!({"prompt": "p"}));
        let pending = ToolCallPart::new("c2", "generateImageTool");

        let message = ChatMessage::new(
            "a1",
            Role::Assistant,
            vec![
                Part::Reasoning { content: "thinking".into() },
                Part::Text { content: "Here:".into() },
                Part::ToolCall(finished),
                Part::ToolCall(pending),
            ],
        );

        let converted = message.to_model_messages();
        assert_eq!(converted.len(), 2);
        match &converted[0] {
            LLMMessage::AI { content, tool_calls: Some(calls) } => {
                assert_eq!(content.as_ref().and_then(|c| c.as_text()), Some("Here:"));
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].function.name, "showPromptInCanvas");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&converted[1], LLMMessage::Tool { name, .. } if name == "showPromptInCanvas"));
    }
}
