//! HTTP Chat Transport
//!
//! reqwest client for the assistant service's `POST /api/chat` endpoint.
//! No timeout is applied: a reply may legitimately stream for a long time.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;

use super::error::ChatError;
use super::request::ChatRequest;
use super::sse::SseDecoder;
use super::transport::ChatTransport;

/// Streaming client for the assistant service
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait(?Send)]
impl ChatTransport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn stream_reply(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn for<'f> FnMut(&'f str),
    ) -> Result<(), ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status(status.as_u16()));
        }

        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ChatError::Body(e.to_string()))?;
            for fragment in decoder.push(&chunk) {
                on_fragment(&fragment);
            }
        }
        for fragment in decoder.finish() {
            on_fragment(&fragment);
        }

        if decoder.skipped() > 0 {
            tracing::debug!(skipped = decoder.skipped(), "Reply contained malformed lines");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    /// Serve a fixed reply on `/api/chat`, rejecting bodies without a
    /// conversation history array
    async fn spawn_endpoint(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/api/chat",
            post(move |Json(payload): Json<serde_json::Value>| async move {
                if payload["context"]["conversationHistory"].is_array()
                    && payload["message"].is_string()
                {
                    (status, body)
                } else {
                    (StatusCode::BAD_REQUEST, "bad payload")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_streams_fragments_in_order() {
        let url = spawn_endpoint(
            StatusCode::OK,
            "data: {\"text\":\"ab\"}\n\ndata: {\"text\":\"cd\"}\n",
        )
        .await;
        let transport = HttpTransport::new(format!("{url}/"));

        let mut reply = String::new();
        transport
            .stream_reply(&ChatRequest::new("hello", &[]), &mut |f: &str| {
                reply.push_str(f)
            })
            .await
            .unwrap();

        assert_eq!(reply, "abcd");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let url = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let transport = HttpTransport::new(url);

        let result = transport
            .stream_reply(&ChatRequest::new("hello", &[]), &mut |_: &str| {})
            .await;

        assert_eq!(result, Err(ChatError::Status(500)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_network_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{}", addr));
        let result = transport
            .stream_reply(&ChatRequest::new("hello", &[]), &mut |_: &str| {})
            .await;

        assert!(matches!(result, Err(ChatError::Network(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:8000/");
        assert_eq!(transport.endpoint(), "http://localhost:8000/api/chat");
    }
}
