use anyhow::Result;
use futures::{Stream, StreamExt};
use reqwest::Response;
use std::pin::Pin;

use super::buffering::CircularLineBuffer;

/// Strategy pattern for parsing different SSE payloads
pub trait SseLineParser: Send {
    type Event: Send + 'static;

    /// Parse a data line into events
    fn parse_data_line(&mut self, data: &str) -> Result<Vec<Self::Event>>;
    
    /// Check if this line signals end of stream
    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Generic SSE stream parser using circular buffer
/// 
/// Only `data:` lines are handed to the parser; `event:`, `id:` and comment
/// lines are skipped. Ends on the done marker or when the body ends.
pub fn parse_sse_stream<P: SseLineParser + 'static>(
    response: Response,
    parser: P,
) -> Pin<Box<dyn Stream<Item = Result<P::Event>> + Send>> {
    let stream = response.bytes_stream();
    
    Box::pin(async_stream::stream! {
        let mut parser = parser;
        let mut byte_chunks = Box::pin(stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut finished = false;
        
        while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(&bytes);
                    
                    while let Some(line_result) = buffer.next_line() {
                        match line_result {
                            Ok(line) => {
                                let Some(data) = data_payload(&line) else {
                                    continue;
                                };
                                
                                if parser.is_done_marker(data) {
                                    finished = true;
                                    break;
                                }
                                
                                match parser.parse_data_line(data) {
                                    Ok(events) => {
                                        for event in events {
                                            yield Ok(event);
                                        }
                                    }
                                    Err(e) => yield Err(e),
                                }
                            }
                            Err(e) => yield Err(e),
                        }
                    }
                    
                    if finished {
                        break;
                    }
                }
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            }
        }
        
        // A final data line may arrive without a trailing newline
        if !finished {
            if let Some(Ok(line)) = buffer.take_remainder() {
                if let Some(data) = data_payload(&line) {
                    if !parser.is_done_marker(data) {
                        match parser.parse_data_line(data) {
                            Ok(events) => {
                                for event in events {
                                    yield Ok(event);
                                }
                            }
                            Err(e) => yield Err(e),
                        }
                    }
                }
            }
        }
    })
}

fn data_payload(line: &str) -> Option<&str> {
    if line.is_empty() {
        return None;
    }
    line.strip_prefix("data:").map(str::trim_start)
}
