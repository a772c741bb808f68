use idle_agents::prompts::fact_check_prompt;
use idle_types::{ChatMessage, Role};

pub const FACT_CHECKER_AGENT: &str = "fact-checker";

/// Append the fact-check instruction as one more user turn
///
/// The claim is the plain text of the latest user message. Attachments on that
/// message are left out of the instruction but stay in the conversation.
/// Returns whether a message was appended.
pub fn augment(messages: &mut Vec<ChatMessage>) -> bool {
    let claim = match messages.iter().rev().find(|m| m.role == Role::User) {
        Some(message) => message.text(),
        None => return false,
    };

    if claim.trim().is_empty() {
        tracing::debug!("Latest user message has no text; skipping fact-check instruction");
        return false;
    }

    messages.push(ChatMessage::user(fact_check_prompt(&claim)));
    true
}
