use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{Stream, StreamExt};
use idle_types::{ChatRequestBody, ChatStreamEvent};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{error::ApiResult, state::AppState};

/// Stream an assistant response as Server-Sent Events
///
/// Setup failures (e.g. an unusable API key) answer 500 before any byte is
/// streamed. Everything that goes wrong later arrives as an `error` event.
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequestBody>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let receiver = state.dispatcher.stream(body)?;

    let sse_stream = ReceiverStream::new(receiver).map(|event| Ok::<Event, Infallible>(to_sse_event(&event)));

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::default()))
}

fn to_sse_event(event: &ChatStreamEvent) -> Event {
    let sse = Event::default().event(event.event_type());
    match sse.json_data(event) {
        Ok(sse) => sse,
        Err(e) => {
            tracing::error!(error = %e, event_type = event.event_type(), "Failed to serialize stream event");
            Event::default().event("error").data(r#"{"type":"error","errorText":"serialization failed"}"#)
        }
    }
}

