mod common;

use common::*;
use idle_chat::{spawn_run, RunConfig};
use idle_agents::{ShowPromptInCanvas, ToolSet};
use idle_llm::{ChatRequest, Message, ProviderError, StreamEvent, TokenUsage};
use idle_types::{ChatStreamEvent, StreamOptions};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn request() -> ChatRequest {
    ChatRequest::new("gemini-2.5-flash", vec![Message::human("hi")])
}

fn tools() -> ToolSet {
    baseline().with(Arc::new(ShowPromptInCanvas)).with(Arc::new(BrokenTool))
}

fn types(events: &[ChatStreamEvent]) -> Vec<&'static str> {
    events.iter().map(|e| e.event_type()).collect()
}

#[tokio::test]
async fn test_text_reasoning_usage_finish_order() {
    let client = ScriptedClient::new(vec![Step::Events(vec![
        Ok(StreamEvent::Reasoning { content: "thinking".into() }),
        text("Hello"),
        text(" world"),
        Ok(StreamEvent::Source { id: "s1".into(), url: "https://a.example".into(), title: None }),
        Ok(StreamEvent::Usage {
            usage: TokenUsage { input_tokens: 2, output_tokens: 3, total_tokens: 5, reasoning_tokens: Some(1) },
        }),
        done(),
    ])]);

    let events = collect(spawn_run(client, tools(), request(), RunConfig::default())).await;

    assert_eq!(
        types(&events),
        vec!["start", "reasoning-delta", "text-delta", "text-delta", "source-url", "usage", "finish"]
    );
}

#[tokio::test]
async fn test_tool_lifecycle_and_failing_tool_does_not_abort() {
    let client = ScriptedClient::new(vec![Step::Events(vec![
        text("Here is your prompt"),
        tool_call("c1", "showPromptInCanvas", r#"{"prompt":"You are a chef"}"#),
        tool_call("c2", "broken", "{}"),
        tool_call("c3", "missing", "{}"),
        done(),
    ])]);

    let events = collect(spawn_run(client.clone(), tools(), request(), RunConfig::default())).await;

    assert_eq!(
        types(&events),
        vec![
            "start",
            "text-delta",
            "tool-input-start", "tool-input-delta", "tool-input-available",
            "tool-input-start", "tool-input-delta", "tool-input-available",
            "tool-input-start", "tool-input-delta", "tool-input-available",
            "tool-output-available",
            "tool-output-error",
            "tool-output-error",
            "finish",
        ]
    );
    assert!(events.contains(&ChatStreamEvent::ToolOutputAvailable {
        tool_call_id: "c1".into(),
        output: json!({"prompt": "You are a chef"}),
    }));
    assert!(matches!(
        &events[12],
        ChatStreamEvent::ToolOutputError { tool_call_id, error_text } if tool_call_id == "c2" && error_text.contains("disk on fire")
    ));
    // single step: tool results are not sent back
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn test_multi_step_feeds_tool_results_back() {
    let client = ScriptedClient::new(vec![
        Step::Events(vec![tool_call("c1", "generateImageTool", r#"{"prompt":"cat"}"#), done()]),
        Step::Events(vec![text("Here is your cat."), done()]),
    ]);
    let config = RunConfig { max_steps: 3, ..RunConfig::default() };

    let events = collect(spawn_run(client.clone(), tools(), request(), config)).await;

    assert_eq!(events.iter().filter(|e| e.event_type() == "finish").count(), 1);
    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    let history = &requests[1].messages;
    assert!(matches!(history[1], Message::AI { tool_calls: Some(ref calls), .. } if calls[0].id == "c1"));
    assert!(matches!(history[2], Message::Tool { ref tool_call_id, .. } if tool_call_id == "c1"));
}

#[tokio::test]
async fn test_provider_error_becomes_error_event() {
    let client = ScriptedClient::new(vec![Step::Reject(ProviderError::Api {
        provider: "google",
        status: 400,
        message: "API key not valid. Please pass a valid API key.".into(),
    })]);

    let events = collect(spawn_run(client, tools(), request(), RunConfig::default())).await;

    assert_eq!(types(&events), vec!["start", "error"]);
    assert_eq!(events[1], ChatStreamEvent::error("API key not valid. Please pass a valid API key."));
}

#[tokio::test]
async fn test_mid_stream_failure_ends_with_error_only() {
    let client = ScriptedClient::new(vec![Step::Events(vec![text("partial"), Err("connection reset".into())])]);

    let events = collect(spawn_run(client, tools(), request(), RunConfig::default())).await;

    assert_eq!(types(&events), vec!["start", "text-delta", "error"]);
    assert_eq!(events[2], ChatStreamEvent::error("connection reset"));
}

#[tokio::test]
async fn test_timeout_closes_without_terminal_event() {
    let client = ScriptedClient::new(vec![Step::Hang]);
    let config = RunConfig {
        max_duration: Duration::from_millis(50),
        ..RunConfig::default()
    };

    let events = collect(spawn_run(client, tools(), request(), config)).await;

    assert_eq!(types(&events), vec!["start"]);
}

#[tokio::test]
async fn test_stream_options_are_applied() {
    let client = ScriptedClient::new(vec![Step::Events(vec![
        Ok(StreamEvent::Reasoning { content: "hidden".into() }),
        text("shown"),
        done(),
    ])]);
    let config = RunConfig {
        stream: StreamOptions { send_reasoning: false, ..StreamOptions::default() },
        ..RunConfig::default()
    };

    let events = collect(spawn_run(client, tools(), request(), config)).await;

    assert_eq!(types(&events), vec!["start", "text-delta", "finish"]);
}

#[tokio::test]
async fn test_receiver_drop_cancels_run() {
    let client = ScriptedClient::new(vec![Step::Events((0..5000).map(|i| text(&i.to_string())).collect())]);

    let mut rx = spawn_run(client, tools(), request(), RunConfig::default());
    assert_eq!(rx.recv().await.unwrap().event_type(), "start");
    drop(rx);

    // the spawned task notices the closed channel and exits instead of blocking
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_receiver_drop_cancels_pending_tool() {
    let cancelled = Arc::new(AtomicBool::new(false));
    let tools = tools().with(Arc::new(HangingTool { cancelled: Arc::clone(&cancelled) }));
    let client = ScriptedClient::new(vec![Step::Events(vec![tool_call("c1", "hang", "{}"), done()])]);

    let mut rx = spawn_run(client, tools, request(), RunConfig::default());
    while let Some(event) = rx.recv().await {
        if event.event_type() == "tool-input-available" {
            break;
        }
    }
    drop(rx);

    // well inside the 60s run limit
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cancelled.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("tool kept running after the client went away");
}
