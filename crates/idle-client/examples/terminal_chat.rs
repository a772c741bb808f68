use anyhow::Result;
use futures::StreamExt;
use idle_client::{tool_view, ChatSession, HttpChatClient, ToolView};
use idle_types::{ChatStreamEvent, Part};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server = std::env::var("IDLE_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = HttpChatClient::new(server)?;

    let models = client.models().await?;
    let model = models
        .iter()
        .find(|m| m.value == "gemini-2.5-flash")
        .or_else(|| models.first())
        .map(|m| m.value.clone())
        .unwrap_or_else(|| "gemini-2.5-flash".to_string());

    let mut session = ChatSession::new(model);
    if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
        session = session.with_api_key(key);
    }

    let agent = std::env::args().nth(1).unwrap_or_else(|| "yoda".to_string());
    match client.agent(&agent).await? {
        Some(summary) => {
            println!("Talking with {}", summary.name);
            session.select_agent(summary);
        }
        None => println!("Unknown agent '{}', using the default assistant", agent),
    }

    for suggestion in session.suggestions() {
        println!("  try: {}", suggestion.prompt);
    }
    println!("Type 'exit' to quit\n");

    loop {
        print!("\x1b[1;36mYou:\x1b[0m ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        let body = session.append(input)?;
        let mut stream = match client.send(&body).await {
            Ok(stream) => stream,
            Err(e) => {
                session.fail(e.to_string());
                println!("\x1b[1;31mError:\x1b[0m {}", e);
                continue;
            }
        };

        print!("\x1b[1;32mAssistant:\x1b[0m ");
        io::stdout().flush()?;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    session.stop()?;
                    println!("\n[stopped]");
                    break;
                }
                item = stream.next() => match item {
                    Some(Ok(event)) => {
                        match &event {
                            ChatStreamEvent::TextDelta { delta } => print!("{}", delta),
                            ChatStreamEvent::ReasoningDelta { delta } => print!("\x1b[2m{}\x1b[0m", delta),
                            ChatStreamEvent::SourceUrl { url, .. } => print!("\n  source: {}", url),
                            _ => {}
                        }
                        io::stdout().flush()?;
                        session.apply(event);
                        if !session.status().is_busy() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        session.fail(e.to_string());
                        break;
                    }
                    None => {
                        session.close();
                        break;
                    }
                },
            }
        }
        println!();

        if let Some(last) = session.messages().last() {
            for part in &last.parts {
                if let Part::ToolCall(call) = part {
                    match tool_view(call) {
                        ToolView::Canvas { content, .. } => println!("--- canvas ---\n{}\n--------------", content),
                        ToolView::Image { mime_type, base64_data } => {
                            println!("[image {}, {} bytes base64]", mime_type, base64_data.len())
                        }
                        ToolView::Failed { tool_name, error_text } => println!("[{} failed: {}]", tool_name, error_text),
                        other => println!("[{:?}]", other),
                    }
                }
            }
        }

        if let Some(error) = session.error() {
            println!("\x1b[1;31mError:\x1b[0m {}", error);
        }
    }

    Ok(())
}
