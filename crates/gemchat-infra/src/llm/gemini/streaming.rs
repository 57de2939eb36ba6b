//! SSE stream adapter for Gemini `streamGenerateContent?alt=sse`.
//!
//! Every SSE `data:` line carries a complete `GenerateContentResponse` JSON
//! object. Each one is mapped to provider-agnostic [`StreamEvent`]s:
//! text delta, then finish reason, then usage. The stream ends with
//! [`StreamEvent::Done`] once the HTTP body is exhausted.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use gemchat_core::llm::provider::EventStream;
use gemchat_types::llm::{LlmError, StreamEvent, Usage};

use super::types::{
    BLOCKING_FINISH_REASONS, GenerateContentRequest, GoogleErrorBody, StreamPayload,
};

/// Map a non-success HTTP status and body to an [`LlmError`].
///
/// Uses the Google error message when the body is a Google error envelope.
pub fn map_http_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<GoogleErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed(message),
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        s if s >= 500 => LlmError::Provider {
            message: format!("server error HTTP {status}: {message}"),
        },
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

/// Turn one SSE `data:` payload into stream events.
pub fn process_chunk(data: &str) -> Result<Vec<StreamEvent>, LlmError> {
    let payload: StreamPayload = serde_json::from_str(data)
        .map_err(|e| LlmError::Deserialization(format!("gemini chunk: {e}")))?;

    let chunk = match payload {
        StreamPayload::Error(body) => {
            return Err(LlmError::Provider {
                message: body.error.message,
            });
        }
        StreamPayload::Chunk(chunk) => chunk,
    };

    if let Some(reason) = chunk.block_reason() {
        return Err(LlmError::Blocked(reason.to_string()));
    }

    let text = chunk.text();
    let mut events = Vec::new();

    if let Some(reason) = chunk.finish_reason() {
        if text.is_empty() && BLOCKING_FINISH_REASONS.contains(&reason) {
            return Err(LlmError::Blocked(format!(
                "response stopped with finish reason {reason}"
            )));
        }
    }

    events.push(StreamEvent::TextDelta { text });

    if let Some(reason) = chunk.finish_reason() {
        events.push(StreamEvent::Finished {
            reason: reason.to_string(),
        });
    }

    if let Some(usage) = &chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }));
    }

    Ok(events)
}

/// Create a streaming SSE connection to the Gemini API.
///
/// The request is only sent once the returned stream is first polled.
/// HTTP and connection errors are yielded as the first item.
pub fn create_gemini_stream(
    client: &reqwest::Client,
    url: &str,
    body: GenerateContentRequest,
    api_key: &SecretString,
) -> EventStream {
    let client = client.clone();
    let url = url.to_string();
    let api_key = SecretString::from(api_key.expose_secret().to_string());

    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let response = if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %error_body, "Gemini stream API error response");
            Err(map_http_error(status.as_u16(), &error_body))?;
            unreachable!()
        } else {
            response
        };

        let mut events = response.bytes_stream().eventsource();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| LlmError::Stream(format!("response body read: {e}")))?;
            if event.data.trim().is_empty() {
                continue;
            }
            for stream_event in process_chunk(&event.data)? {
                yield stream_event;
            }
        }

        yield StreamEvent::Done;
    })
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use gemchat_types::llm::{HistoryEntry, ModelRole};

    /// Serve one canned HTTP response on a local port.
    ///
    /// Returns the base URL and a handle yielding the raw request text.
    async fn serve_once(
        status_line: &'static str,
        content_type: &'static str,
        body: String,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: {content_type}\r\nconnection: close\r\n\r\n{body}"
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    fn hello_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![HistoryEntry::text(ModelRole::User, "Hi")],
        }
    }

    async fn collect(stream: EventStream) -> Vec<Result<StreamEvent, LlmError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_stream_parses_sse_chunks() {
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}],\"role\":\"model\"}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}],\"role\":\"model\"},\"finishReason\":\"STOP\"}]}\r\n\r\n",
        );
        let (base, server) = serve_once("200 OK", "text/event-stream", body.to_string()).await;
        let url = format!("{base}/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse");

        let events = collect(create_gemini_stream(
            &reqwest::Client::new(),
            &url,
            hello_request(),
            &SecretString::from("test-key-not-real"),
        ))
        .await;

        let events: Vec<StreamEvent> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta { text: "Hel".to_string() },
                StreamEvent::TextDelta { text: "lo".to_string() },
                StreamEvent::Finished { reason: "STOP".to_string() },
                StreamEvent::Done,
            ]
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"));
        assert!(request.to_lowercase().contains("x-goog-api-key: test-key-not-real"));
        assert!(request.contains(r#""contents":[{"role":"user","parts":[{"text":"Hi"}]}]"#));
    }

    #[tokio::test]
    async fn test_stream_maps_http_error_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        let (base, _server) = serve_once("400 Bad Request", "application/json", body.to_string()).await;

        let mut events = collect(create_gemini_stream(
            &reqwest::Client::new(),
            &format!("{base}/v1beta/models/m:streamGenerateContent?alt=sse"),
            hello_request(),
            &SecretString::from("bad-key"),
        ))
        .await;

        assert_eq!(events.len(), 1);
        match events.remove(0) {
            Err(LlmError::InvalidRequest(msg)) => assert!(msg.starts_with("API key not valid")),
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_error_payload_ends_stream() {
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"par\"}]}}]}\n\n",
            "data: {\"error\":{\"code\":500,\"message\":\"Internal error encountered.\",\"status\":\"INTERNAL\"}}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"never\"}]}}]}\n\n",
        );
        let (base, _server) = serve_once("200 OK", "text/event-stream", body.to_string()).await;

        let events = collect(create_gemini_stream(
            &reqwest::Client::new(),
            &format!("{base}/v1beta/models/m:streamGenerateContent?alt=sse"),
            hello_request(),
            &SecretString::from("k"),
        ))
        .await;

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::TextDelta { text: "par".to_string() }
        );
        match &events[1] {
            Err(LlmError::Provider { message }) => assert_eq!(message, "Internal error encountered."),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_process_text_chunk() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hel"}],"role":"model"}}]}"#;
        let events = process_chunk(data).unwrap();
        assert_eq!(
            events,
            vec![StreamEvent::TextDelta {
                text: "Hel".to_string()
            }]
        );
    }

    #[test]
    fn test_process_final_chunk() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"lo"}],"role":"model"},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":3,"candidatesTokenCount":2,"totalTokenCount":5}}"#;
        let events = process_chunk(data).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            StreamEvent::Finished {
                reason: "STOP".to_string()
            }
        );
        assert_eq!(
            events[2],
            StreamEvent::Usage(Usage {
                input_tokens: 3,
                output_tokens: 2,
            })
        );
    }

    #[test]
    fn test_process_blocked_prompt() {
        let data = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let result = process_chunk(data);
        assert!(matches!(result, Err(LlmError::Blocked(reason)) if reason == "SAFETY"));
    }

    #[test]
    fn test_process_safety_stop_without_text() {
        let data = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(matches!(process_chunk(data), Err(LlmError::Blocked(_))));
    }

    #[test]
    fn test_process_safety_stop_with_text_is_kept() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"tail"}]},"finishReason":"SAFETY"}]}"#;
        let events = process_chunk(data).unwrap();
        assert_eq!(
            events[0],
            StreamEvent::TextDelta {
                text: "tail".to_string()
            }
        );
    }

    #[test]
    fn test_process_error_payload() {
        let data = r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#;
        match process_chunk(data) {
            Err(LlmError::Provider { message }) => assert_eq!(message, "Internal error encountered."),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_process_malformed_chunk() {
        assert!(matches!(
            process_chunk("{not json"),
            Err(LlmError::Deserialization(_))
        ));
    }

    #[test]
    fn test_map_http_error_uses_google_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        match map_http_error(400, body) {
            LlmError::InvalidRequest(msg) => assert!(msg.starts_with("API key not valid")),
            other => panic!("expected invalid request, got {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_statuses() {
        assert!(matches!(map_http_error(403, "denied"), LlmError::AuthenticationFailed(_)));
        assert!(matches!(map_http_error(429, ""), LlmError::RateLimited { .. }));
        match map_http_error(503, "unavailable") {
            LlmError::Provider { message } => assert!(message.contains("503")),
            other => panic!("expected provider error, got {other:?}"),
        }
        match map_http_error(404, "models/foo is not found") {
            LlmError::Provider { message } => assert_eq!(message, "HTTP 404: models/foo is not found"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
