use crate::adapter::{ChatStreamAdapter, CollectedToolCall, StreamAdapter};
use crate::error::error_text;
use anyhow::{Context, Result};
use futures::StreamExt;
use idle_agents::ToolSet;
use idle_llm::{ChatClient, ChatRequest, Content, Message};
use idle_types::{ChatStreamEvent, StreamOptions};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// LLM steps per message; 1 means tool results are not fed back
    pub max_steps: usize,
    pub max_duration: Duration,
    pub stream: StreamOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: 1,
            max_duration: Duration::from_secs(60),
            stream: StreamOptions::default(),
        }
    }
}

/// Spawn one assistant turn in the background, return the event receiver
///
/// The stream ends with `finish` or `error`. When `max_duration` runs out the
/// channel simply closes. Dropping the receiver cancels the run right away,
/// even while it waits on the provider or a tool.
pub fn spawn_run(
    client: Arc<dyn ChatClient>,
    tools: ToolSet,
    request: ChatRequest,
    config: RunConfig,
) -> mpsc::Receiver<ChatStreamEvent> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let started = Instant::now();
        let model = request.model.clone();
        let max_duration = config.max_duration;

        let run = tokio::time::timeout(max_duration, execute_loop(client, tools, request, config, tx.clone()));
        let outcome = tokio::select! {
            result = run => Some(result),
            _ = tx.closed() => None,
        };

        match outcome {
            None => {
                tracing::debug!(model = %model, "Client disconnected; chat run cancelled");
            }
            Some(Ok(Ok(()))) => {
                tracing::info!(
                    model = %model,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Chat run completed"
                );
            }
            Some(Ok(Err(_))) if tx.is_closed() => {
                tracing::debug!(model = %model, "Client disconnected; chat run cancelled");
            }
            Some(Ok(Err(e))) => {
                let message = error_text(&e);
                tracing::warn!(model = %model, error = %format!("{:#}", e), "Chat run failed");
                let _ = tx.send(ChatStreamEvent::error(message)).await;
            }
            Some(Err(_)) => {
                tracing::warn!(
                    model = %model,
                    max_duration_secs = max_duration.as_secs(),
                    "Chat run exceeded its time limit; closing stream"
                );
            }
        }
    });

    rx
}

async fn execute_loop(
    client: Arc<dyn ChatClient>,
    tools: ToolSet,
    mut request: ChatRequest,
    config: RunConfig,
    event_tx: mpsc::Sender<ChatStreamEvent>,
) -> Result<()> {
    let message_id = uuid::Uuid::new_v4().to_string();
    event_tx.send(ChatStreamEvent::Start { message_id }).await?;

    let mut adapter = ChatStreamAdapter::new(config.stream);
    let max_steps = config.max_steps.max(1);

    for step in 1..=max_steps {
        let mut stream = client
            .chat_stream(request.clone())
            .await
            .context("Failed to open model stream")?;

        while let Some(event) = stream.next().await {
            for out in adapter.adapt(event?) {
                event_tx.send(out).await?;
            }
        }

        let output = adapter.take_step();
        if output.tool_calls.is_empty() {
            break;
        }

        let results = execute_tools(&tools, &output.tool_calls, &event_tx).await?;
        if step == max_steps {
            break;
        }

        request.messages.push(Message::AI {
            content: (!output.text.is_empty()).then(|| Content::text(output.text)),
            tool_calls: Some(output.tool_calls.into_iter().map(|c| c.call).collect()),
        });
        request.messages.extend(results);
    }

    for out in adapter.finish() {
        event_tx.send(out).await?;
    }

    Ok(())
}

/// Run each call in order; a failing tool becomes an error event, never a failed run
async fn execute_tools(
    tools: &ToolSet,
    calls: &[CollectedToolCall],
    event_tx: &mpsc::Sender<ChatStreamEvent>,
) -> Result<Vec<Message>> {
    let mut results = Vec::with_capacity(calls.len());

    for collected in calls {
        let start = Instant::now();
        let name = &collected.call.function.name;
        let id = &collected.call.id;

        match tools.execute(name, collected.input.clone()).await {
            Ok(output) => {
                tracing::info!(
                    tool = %name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool executed"
                );
                event_tx
                    .send(ChatStreamEvent::ToolOutputAvailable {
                        tool_call_id: id.clone(),
                        output: output.clone(),
                    })
                    .await?;
                results.push(Message::tool_result(id, name, output));
            }
            Err(e) => {
                let error_text = format!("{:#}", e);
                tracing::warn!(tool = %name, error = %error_text, "Tool execution failed");
                event_tx
                    .send(ChatStreamEvent::ToolOutputError {
                        tool_call_id: id.clone(),
                        error_text: error_text.clone(),
                    })
                    .await?;
                results.push(Message::tool_result(id, name, json!({ "error": error_text })));
            }
        }
    }

    Ok(results)
}
