pub mod client;
pub mod stream;

pub use client::{GeminiClient, GEMINI_API_BASE};
pub use stream::{GeminiStreamParser, GenerateContentResponse};
