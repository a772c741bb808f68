use crate::session::ChatSession;
use crate::status::ChatStatus;
use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use idle_llm::{error_message_from_body, parse_sse_stream, SseLineParser};
use idle_types::{AgentSummary, ChatRequestBody, ChatStreamEvent, Model};
use std::future::Future;
use std::pin::Pin;

pub type ChatEventStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent>> + Send>>;

/// Parses `data:` payloads of the chat endpoint
#[derive(Debug, Default)]
pub struct ChatEventParser;

impl SseLineParser for ChatEventParser {
    type Event = ChatStreamEvent;

    fn parse_data_line(&mut self, data: &str) -> Result<Vec<ChatStreamEvent>> {
        let event = serde_json::from_str(data).context("Failed to parse chat stream event")?;
        Ok(vec![event])
    }
}

/// HTTP client for an Idle server
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpChatClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST the body and stream back the events
    pub async fn send(&self, body: &ChatRequestBody) -> Result<ChatEventStream> {
        let response = self
            .http_client
            .post(self.url("/api/chat"))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(body)
            .send()
            .await
            .context("Failed to reach chat server")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat request failed ({}): {}", status.as_u16(), error_message_from_body(&text));
        }

        Ok(parse_sse_stream(response, ChatEventParser))
    }

    pub async fn agents(&self) -> Result<Vec<AgentSummary>> {
        self.get_json("/api/agents").await
    }

    pub async fn agent(&self, agent_name: &str) -> Result<Option<AgentSummary>> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/agents/{}", agent_name)))
            .send()
            .await
            .context("Failed to reach chat server")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let agent = response
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse agent")?;
        Ok(Some(agent))
    }

    pub async fn models(&self) -> Result<Vec<Model>> {
        self.get_json("/api/models").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.http_client
            .get(self.url(path))
            .send()
            .await
            .context("Failed to reach chat server")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))
    }
}

/// Feed `stream` into `session` until it finishes, fails or `cancel` fires
///
/// Returns the session status afterwards.
pub async fn drive<S, C>(session: &mut ChatSession, stream: S, cancel: C) -> ChatStatus
where
    S: Stream<Item = Result<ChatStreamEvent>> + Unpin,
    C: Future<Output = ()>,
{
    let mut stream = stream;
    tokio::pin!(cancel);

    loop {
        tokio::select! {
            _ = &mut cancel => {
                if let Err(e) = session.stop() {
                    tracing::debug!(error = %e, "Stop requested after the stream settled");
                }
                break;
            }
            item = stream.next() => match item {
                Some(Ok(event)) => {
                    session.apply(event);
                    if !session.status().is_busy() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    session.fail(format!("{:#}", e));
                    break;
                }
                None => {
                    session.close();
                    break;
                }
            },
        }
    }

    session.status()
}
