//! Folding stream events into an assistant message.

use idle_types::{ChatMessage, ChatStreamEvent, Part, ToolCallPart, ToolCallState};

/// Apply one content event to `message`
///
/// Control events (`start`, `usage`, `error`, `finish`) leave the parts alone
/// and are handled by the session.
pub fn apply_event(message: &mut ChatMessage, event: &ChatStreamEvent) {
    match event {
        ChatStreamEvent::TextDelta { delta } => match message.parts.last_mut() {
            Some(Part::Text { content }) => content.push_str(delta),
            _ => message.parts.push(Part::Text { content: delta.clone() }),
        },
        ChatStreamEvent::ReasoningDelta { delta } => match message.parts.last_mut() {
            Some(Part::Reasoning { content }) => content.push_str(delta),
            _ => message.parts.push(Part::Reasoning { content: delta.clone() }),
        },
        ChatStreamEvent::ToolInputStart { tool_call_id, tool_name } => {
            tool_part(message, tool_call_id, tool_name);
        }
        ChatStreamEvent::ToolInputDelta { tool_call_id, .. } => {
            tool_part(message, tool_call_id, "");
        }
        ChatStreamEvent::ToolInputAvailable { tool_call_id, tool_name, input } => {
            if let Some(part) = tool_part(message, tool_call_id, tool_name) {
                if part.advance(ToolCallState::InputAvailable) {
                    part.args = input.clone();
                }
            }
        }
        ChatStreamEvent::ToolOutputAvailable { tool_call_id, output } => {
            if let Some(part) = tool_part(message, tool_call_id, "") {
                if part.advance(ToolCallState::OutputAvailable) {
                    part.result = Some(output.clone());
                }
            }
        }
        ChatStreamEvent::ToolOutputError { tool_call_id, error_text } => {
            if let Some(part) = tool_part(message, tool_call_id, "") {
                if part.advance(ToolCallState::OutputError) {
                    part.error_text = Some(error_text.clone());
                }
            }
        }
        ChatStreamEvent::SourceUrl { source_id, url, title } => message.parts.push(Part::Source {
            id: source_id.clone(),
            title: title.clone(),
            url: Some(url.clone()),
        }),
        ChatStreamEvent::File { mime_type, base64_data } => message.parts.push(Part::File {
            mime_type: mime_type.clone(),
            base64_data: base64_data.clone(),
        }),
        ChatStreamEvent::Start { .. }
        | ChatStreamEvent::Usage { .. }
        | ChatStreamEvent::Error { .. }
        | ChatStreamEvent::Finish { .. }
        | ChatStreamEvent::Unknown => {}
    }
}

/// Find the tool-call part for `id`, creating it when the stream skipped ahead
fn tool_part<'a>(message: &'a mut ChatMessage, id: &str, tool_name: &str) -> Option<&'a mut ToolCallPart> {
    if message.tool_call(id).is_none() {
        message.parts.push(Part::ToolCall(ToolCallPart::new(id, tool_name)));
    }

    let call = message.tool_call_mut(id)?;
    if call.tool_name.is_empty() && !tool_name.is_empty() {
        call.tool_name = tool_name.to_string();
    }
    Some(call)
}
