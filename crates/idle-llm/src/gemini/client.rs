// Google Gemini client implementation

use crate::buffer_utils::parse_sse_stream;
use crate::error::{error_message_from_body, ProviderError};
use crate::gemini::stream::{GeminiStreamParser, GenerateContentResponse};
use crate::streaming::StreamEvent;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, EventStream, GeneratedFile};
use crate::types::{Content, ContentPart, Message, ToolCall};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Map, Value};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client (HTTP direct, no SDK)
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );
        
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }
    
    /// Point the client at another endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
    
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    
    /// Build generateContent request payload
    pub fn build_request(&self, request: &ChatRequest) -> Result<Value> {
        let (system_instruction, contents) = self.convert_messages(&request.messages)?;
        
        let mut payload = Map::new();
        payload.insert("contents".to_string(), Value::Array(contents));
        
        if let Some(system) = system_instruction {
            payload.insert(
                "systemInstruction".to_string(),
                json!({ "parts": [{ "text": system }] }),
            );
        }
        
        let tools = self.build_tools(&request.model, &request.options);
        if !tools.is_empty() {
            payload.insert("tools".to_string(), Value::Array(tools));
        }
        
        let generation_config = self.build_generation_config(&request.options)?;
        if !generation_config.is_empty() {
            payload.insert("generationConfig".to_string(), Value::Object(generation_config));
        }
        
        Ok(Value::Object(payload))
    }
    
    fn build_tools(&self, model: &str, options: &ChatOptions) -> Vec<Value> {
        let mut tools = Vec::new();
        
        // Grounded requests carry the search tool alone; function calling is off for them
        let declarations = options
            .tools
            .as_ref()
            .filter(|t| !t.is_empty() && !options.provider.search_grounding);
        if options.provider.search_grounding && options.tools.as_ref().is_some_and(|t| !t.is_empty()) {
            tracing::debug!(model, "search grounding enabled; function tools not sent");
        }
        
        if let Some(declarations) = declarations {
            let declarations: Vec<Value> = declarations
                .iter()
                .map(|tool| {
                    let mut decl = json!({
                        "name": tool.name,
                        "parameters": tool.parameters,
                    });
                    if let (Some(description), Some(obj)) = (&tool.description, decl.as_object_mut()) {
                        obj.insert("description".to_string(), json!(description));
                    }
                    decl
                })
                .collect();
            tools.push(json!({ "functionDeclarations": declarations }));
        }
        
        if options.provider.search_grounding {
            // Gemini 1.x only understands the retrieval tool; newer models use googleSearch
            if model.starts_with("gemini-1") {
                let retrieval = match &options.provider.dynamic_retrieval {
                    Some(config) => json!({ "dynamicRetrievalConfig": config }),
                    None => json!({}),
                };
                tools.push(json!({ "googleSearchRetrieval": retrieval }));
            } else {
                if options.provider.dynamic_retrieval.is_some() {
                    tracing::debug!(model, "dynamic retrieval is implied by googleSearch for this model");
                }
                tools.push(json!({ "googleSearch": {} }));
            }
        }
        
        tools
    }
    
    fn build_generation_config(&self, options: &ChatOptions) -> Result<Map<String, Value>> {
        let mut config = Map::new();
        
        if let Some(temp) = options.temperature {
            config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if let Some(thinking) = &options.provider.thinking {
            config.insert("thinkingConfig".to_string(), serde_json::to_value(thinking)?);
        }
        if let Some(modalities) = &options.provider.response_modalities {
            config.insert("responseModalities".to_string(), json!(modalities));
        }
        
        Ok(config)
    }
    
    /// Convert our messages to Gemini `contents`, pulling system prompts out
    fn convert_messages(&self, messages: &[Message]) -> Result<(Option<String>, Vec<Value>)> {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        
        for message in messages {
            match message {
                Message::System { content } => {
                    system_parts.push(content.plain_text());
                }
                Message::Human { content } => {
                    contents.push(json!({
                        "role": "user",
                        "parts": self.convert_content(content),
                    }));
                }
                Message::AI { content, tool_calls } => {
                    let mut parts = content
                        .as_ref()
                        .map(|c| self.convert_content(c))
                        .unwrap_or_default();
                    
                    for call in tool_calls.iter().flatten() {
                        parts.push(self.convert_tool_call(call)?);
                    }
                    
                    if !parts.is_empty() {
                        contents.push(json!({ "role": "model", "parts": parts }));
                    }
                }
                Message::Tool { name, content, .. } => {
                    contents.push(json!({
                        "role": "user",
                        "parts": [{
                            "functionResponse": {
                                "name": name,
                                "response": { "name": name, "content": content },
                            }
                        }],
                    }));
                }
            }
        }
        
        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };
        
        Ok((system, contents))
    }
    
    fn convert_content(&self, content: &Content) -> Vec<Value> {
        content
            .clone()
            .into_parts()
            .into_iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } if text.is_empty() => None,
                ContentPart::Text { text } => Some(json!({ "text": text })),
                ContentPart::InlineData { mime_type, data } => Some(json!({
                    "inlineData": { "mimeType": mime_type, "data": data }
                })),
            })
            .collect()
    }
    
    fn convert_tool_call(&self, call: &ToolCall) -> Result<Value> {
        let args = call
            .arguments_value()
            .with_context(|| format!("Invalid arguments for tool call {}", call.id))?;
        Ok(json!({
            "functionCall": { "name": call.function.name, "args": args }
        }))
    }
    
    async fn post(&self, url: String, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Failed to send request")?;
        
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                provider: "Gemini",
                status: status.as_u16(),
                message: error_message_from_body(&error_text),
            }
            .into());
        }
        
        Ok(response)
    }
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[async_trait]
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_request(&request)?;
        
        let response = self
            .post(
                format!("{}/models/{}:generateContent", self.base_url, request.model),
                &payload,
            )
            .await?;
        
        let raw: Value = response.json().await.context("Failed to parse response")?;
        let parsed: GenerateContentResponse =
            serde_json::from_value(raw.clone()).context("Unexpected Gemini response shape")?;
        
        let mut parser = GeminiStreamParser::new();
        let mut result = ChatResponse {
            content: None,
            tool_calls: None,
            files: Vec::new(),
            usage: None,
            finish_reason: None,
            raw,
        };
        
        // Reuse the streaming conversion and fold the events
        for event in parser.events_from_chunk(parsed)? {
            match event {
                StreamEvent::Message { content } => {
                    result.content.get_or_insert_with(String::new).push_str(&content);
                }
                StreamEvent::ToolCall { id, name, arguments, .. } => {
                    result
                        .tool_calls
                        .get_or_insert_with(Vec::new)
                        .push(ToolCall::new(id, name, arguments));
                }
                StreamEvent::File { mime_type, data } => {
                    result.files.push(GeneratedFile { mime_type, data });
                }
                StreamEvent::Usage { usage } => result.usage = Some(usage),
                StreamEvent::Done { finish_reason } => result.finish_reason = finish_reason,
                StreamEvent::Reasoning { .. } | StreamEvent::Source { .. } => {}
            }
        }
        
        Ok(result)
    }
    
    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let payload = self.build_request(&request)?;
        
        tracing::debug!(model = %request.model, "opening Gemini stream");
        
        let response = self
            .post(
                format!("{}/models/{}:streamGenerateContent?alt=sse", self.base_url, request.model),
                &payload,
            )
            .await?;
        
        Ok(parse_sse_stream(response, GeminiStreamParser::new()))
    }
}
