use futures::StreamExt;
use idle_llm::{
    ChatClient, ChatOptions, ChatRequest, GeminiClient, Message, ProviderError, ProviderOptions,
    StreamEvent,
};
use mockito::Matcher;

const SSE_BODY: &str = "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Pondering\",\"thought\":true}]}}]}\r\n\r\n\
data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Courage, \"}]}}]}\r\n\r\n\
data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"young one.\"}]},\"finishReason\":\"STOP\"}],\"usageMetadata\":{\"promptTokenCount\":4,\"candidatesTokenCount\":5,\"totalTokenCount\":9}}\r\n\r\n";

fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
    GeminiClient::new("test-key").unwrap().with_base_url(server.url())
}

#[tokio::test]
async fn test_chat_stream_events_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-2\.5-flash:streamGenerateContent".to_string()))
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"systemInstruction":{"parts":[{"text":"Speak like Yoda"}]}}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(SSE_BODY)
        .create_async()
        .await;

    let request = ChatRequest::new(
        "gemini-2.5-flash",
        vec![Message::system("Speak like Yoda"), Message::human("What is courage?")],
    );

    let stream = client_for(&server).chat_stream(request).await.unwrap();
    let events: Vec<StreamEvent> = stream.map(|e| e.unwrap()).collect().await;

    mock.assert_async().await;
    assert_eq!(events[0], StreamEvent::Reasoning { content: "Pondering".to_string() });
    assert_eq!(events[1], StreamEvent::Message { content: "Courage, ".to_string() });
    assert_eq!(events[2], StreamEvent::Message { content: "young one.".to_string() });
    assert!(matches!(events[3], StreamEvent::Usage { ref usage } if usage.total_tokens == 9));
    assert_eq!(events[4], StreamEvent::Done { finish_reason: Some("stop".to_string()) });
    assert_eq!(events.len(), 5);
}

#[tokio::test]
async fn test_chat_stream_api_error_is_normalized() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-2\.5-pro:streamGenerateContent".to_string()))
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#)
        .create_async()
        .await;

    let request = ChatRequest::new("gemini-2.5-pro", vec![Message::human("hi")]);
    let err = match client_for(&server).chat_stream(request).await {
        Ok(_) => panic!("expected an error"),
        Err(e) => e,
    };

    let provider_error = err.downcast_ref::<ProviderError>().expect("provider error");
    assert_eq!(provider_error.message(), "API key not valid. Please pass a valid API key.");
    assert!(matches!(provider_error, ProviderError::Api { status: 400, .. }));
}

#[tokio::test]
async fn test_chat_collects_generated_image() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Regex(r"^/models/gemini-2\.0-flash-preview-image-generation:generateContent".to_string()))
        .match_body(Matcher::PartialJsonString(
            r#"{"generationConfig":{"responseModalities":["TEXT","IMAGE"]}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Here you go"},{"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo="}}]},"finishReason":"STOP"}]}"#)
        .create_async()
        .await;

    let options = ChatOptions::new()
        .provider(ProviderOptions::new().response_modalities(["TEXT", "IMAGE"]));
    let request = ChatRequest::new(
        "gemini-2.0-flash-preview-image-generation",
        vec![Message::human("a cat")],
    )
    .with_options(options);

    let response = client_for(&server).chat(request).await.unwrap();
    assert_eq!(response.content.as_deref(), Some("Here you go"));
    assert_eq!(response.files.len(), 1);
    assert_eq!(response.files[0].mime_type, "image/png");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}
