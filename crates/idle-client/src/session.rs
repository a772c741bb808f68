use crate::accumulator::apply_event;
use crate::error::SessionError;
use crate::status::{ChatEvent, ChatStatus};
use idle_types::{AgentSummary, ChatMessage, ChatRequestBody, ChatStreamEvent, Part, Role, Suggestion};

const UNEXPECTED_END: &str = "stream ended unexpectedly";

/// The request currently streaming into the conversation
#[derive(Debug, Default)]
struct InFlight {
    /// Index of the assistant message, once the first chunk arrived
    assistant: Option<usize>,
}

/// Conversation state for one chat window
///
/// Nothing here does I/O: callers send the returned request bodies and feed
/// the resulting events back through `apply`, `close` and `fail`.
#[derive(Debug)]
pub struct ChatSession {
    model: String,
    api_key: Option<String>,
    agent: Option<AgentSummary>,
    search_grounding: bool,
    messages: Vec<ChatMessage>,
    status: ChatStatus,
    in_flight: Option<InFlight>,
    edit_anchor: Option<String>,
    error: Option<String>,
    usage: Option<ChatStreamEvent>,
}

impl ChatSession {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            agent: None,
            search_grounding: false,
            messages: Vec::new(),
            status: ChatStatus::Idle,
            in_flight: None,
            edit_anchor: None,
            error: None,
            usage: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_search_grounding(&mut self, enabled: bool) {
        self.search_grounding = enabled;
    }

    pub fn search_grounding(&self) -> bool {
        self.search_grounding
    }

    /// Agents that prefer search switch grounding on
    pub fn select_agent(&mut self, agent: AgentSummary) {
        if agent.user_search {
            self.search_grounding = true;
        }
        self.agent = Some(agent);
    }

    pub fn clear_agent(&mut self) {
        self.agent = None;
    }

    pub fn agent(&self) -> Option<&AgentSummary> {
        self.agent.as_ref()
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Last error shown to the user
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Latest `usage` event of the current or last turn
    pub fn usage(&self) -> Option<&ChatStreamEvent> {
        self.usage.as_ref()
    }

    /// Starter prompts, only offered while the conversation is empty
    pub fn suggestions(&self) -> &[Suggestion] {
        match &self.agent {
            Some(agent) if self.messages.is_empty() => &agent.suggestions,
            _ => &[],
        }
    }

    /// Add a user message and return the body to POST
    pub fn append(&mut self, text: impl Into<String>) -> Result<ChatRequestBody, SessionError> {
        self.append_with_files(text, Vec::new())
    }

    /// Add a user message carrying attachments (`Part::File`, e.g. images or PDFs)
    ///
    /// Either the text or the attachments may be empty, not both.
    pub fn append_with_files(
        &mut self,
        text: impl Into<String>,
        files: Vec<Part>,
    ) -> Result<ChatRequestBody, SessionError> {
        if let Some(other) = files.iter().find(|part| !matches!(part, Part::File { .. })) {
            return Err(SessionError::InvalidAttachment(format!("{:?}", other)));
        }

        let text = text.into();
        if text.trim().is_empty() && files.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.status = self.status.next(ChatEvent::MessageSent)?;

        let mut parts = Vec::with_capacity(files.len() + 1);
        if !text.trim().is_empty() {
            parts.push(Part::Text { content: text });
        }
        parts.extend(files);
        self.messages
            .push(ChatMessage::new(uuid::Uuid::new_v4().to_string(), Role::User, parts));
        Ok(self.begin_turn())
    }

    /// Feed one stream event; returns false when the event was ignored
    pub fn apply(&mut self, event: ChatStreamEvent) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            tracing::debug!(event = event.event_type(), "Ignoring event outside a request");
            return false;
        };

        match event {
            ChatStreamEvent::Unknown => {
                tracing::debug!("Skipping unrecognized stream event");
                return false;
            }
            ChatStreamEvent::Error { error_text } => {
                self.fail(error_text);
            }
            ChatStreamEvent::Finish { .. } => {
                self.in_flight = None;
                self.transition(ChatEvent::StreamClosed);
            }
            usage @ ChatStreamEvent::Usage { .. } => {
                self.usage = Some(usage);
                self.transition(ChatEvent::ChunkReceived);
            }
            event => {
                let index = match in_flight.assistant {
                    Some(index) if index < self.messages.len() => index,
                    _ => {
                        let id = match &event {
                            ChatStreamEvent::Start { message_id } => message_id.clone(),
                            _ => uuid::Uuid::new_v4().to_string(),
                        };
                        self.messages.push(ChatMessage::assistant(id));
                        let index = self.messages.len() - 1;
                        in_flight.assistant = Some(index);
                        index
                    }
                };

                apply_event(&mut self.messages[index], &event);
                self.transition(ChatEvent::ChunkReceived);
            }
        }

        true
    }

    /// Transport finished; a stream without `finish` counts as failed
    pub fn close(&mut self) {
        if self.in_flight.is_some() {
            self.fail(UNEXPECTED_END);
        }
    }

    /// Transport or server error for the in-flight request
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.in_flight.take().is_none() {
            return;
        }
        self.error = Some(message.into());
        self.transition(ChatEvent::ErrorReceived);
    }

    /// Cancel the in-flight request, keeping whatever already arrived
    pub fn stop(&mut self) -> Result<(), SessionError> {
        self.status = self.status.next(ChatEvent::StopRequested)?;
        self.in_flight = None;
        Ok(())
    }

    /// Replace a message's text in place; regeneration is up to the caller
    pub fn edit(&mut self, id: &str, text: impl Into<String>) -> Result<(), SessionError> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| SessionError::MessageNotFound(id.to_string()))?;

        message.set_text(text);
        self.edit_anchor = Some(id.to_string());
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<ChatMessage, SessionError> {
        if self.status.is_busy() {
            return Err(SessionError::Busy);
        }

        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| SessionError::MessageNotFound(id.to_string()))?;

        if self.edit_anchor.as_deref() == Some(id) {
            self.edit_anchor = None;
        }
        Ok(self.messages.remove(index))
    }

    /// Regenerate from the last edited message, else the last user message
    pub fn regenerate(&mut self) -> Result<ChatRequestBody, SessionError> {
        let anchor = self
            .edit_anchor
            .clone()
            .filter(|id| self.messages.iter().any(|m| &m.id == id))
            .or_else(|| {
                self.messages
                    .iter()
                    .rev()
                    .find(|m| m.role == Role::User)
                    .map(|m| m.id.clone())
            })
            .ok_or(SessionError::NothingToRegenerate)?;

        self.regenerate_from(&anchor)
    }

    /// Trim history at `id` and resend
    ///
    /// A user anchor is kept and everything after it dropped. An assistant
    /// anchor is dropped together with what follows.
    pub fn regenerate_from(&mut self, id: &str) -> Result<ChatRequestBody, SessionError> {
        let index = self
            .messages
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| SessionError::MessageNotFound(id.to_string()))?;

        let keep = match self.messages[index].role {
            Role::User => index + 1,
            Role::Assistant => index,
        };
        if keep == 0 {
            return Err(SessionError::NothingToRegenerate);
        }

        self.status = self.status.next(ChatEvent::MessageSent)?;
        self.messages.truncate(keep);
        Ok(self.begin_turn())
    }

    /// Body for the current conversation
    pub fn request_body(&self) -> ChatRequestBody {
        ChatRequestBody {
            messages: self.messages.clone(),
            model: self.model.clone(),
            agent_name: self.agent.as_ref().map(|a| a.agent_name.clone()),
            is_search_grounding: Some(self.search_grounding),
            api_key: self.api_key.clone(),
        }
    }

    fn begin_turn(&mut self) -> ChatRequestBody {
        self.in_flight = Some(InFlight::default());
        self.edit_anchor = None;
        self.error = None;
        self.usage = None;
        self.request_body()
    }

    fn transition(&mut self, event: ChatEvent) {
        match self.status.next(event) {
            Ok(status) => self.status = status,
            Err(e) => tracing::warn!(error = %e, "Ignoring chat status transition"),
        }
    }
}
