//! HTTP API Client
//!
//! Streaming chat over `fetch`, transport selection from local storage and
//! CSV downloads.

use async_trait::async_trait;
use gloo_net::http::Request;
use js_sys::{Reflect, Uint8Array};
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, ReadableStreamDefaultReader, RequestInit, Response};

use tunimed::chat::{
    ChatError, ChatRequest, ChatSession, ChatTransport, Pause, SimulatedTransport, SseDecoder,
};
use tunimed::config::{TransportKind, DEFAULT_API_URL};
use tunimed::dataset::DatasetError;

/// Local storage key for the assistant service URL
pub const API_URL_KEY: &str = "tunimed_api_url";

/// Local storage key for the transport ("http" or "simulated")
pub const TRANSPORT_KEY: &str = "tunimed_transport";

/// Pause between simulated reply fragments
const SIMULATED_DELAY: Duration = Duration::from_millis(50);

fn stored_item(key: &str) -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()??
        .get_item(key)
        .ok()?
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    normalize_base(&stored_item(API_URL_KEY).unwrap_or_else(|| DEFAULT_API_URL.to_string()))
}

/// Transport named in local storage, HTTP when unset or unknown
pub fn get_transport_kind() -> TransportKind {
    stored_item(TRANSPORT_KEY)
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Build the chat session for the configured transport
pub fn build_session() -> ChatSession {
    let base = get_api_base();
    let transport: Box<dyn ChatTransport> = match get_transport_kind() {
        TransportKind::Http => Box::new(FetchTransport::new(base.clone())),
        TransportKind::Simulated => Box::new(SimulatedTransport::new(TimerPause, SIMULATED_DELAY)),
    };
    ChatSession::new(transport, base)
}

// ============ Transports ============

/// Streams the reply body with `fetch` and a `ReadableStream` reader
pub struct FetchTransport {
    base_url: String,
}

impl FetchTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base(&base_url.into()),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

#[async_trait(?Send)]
impl ChatTransport for FetchTransport {
    fn name(&self) -> &'static str {
        "fetch"
    }

    async fn stream_reply(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn for<'f> FnMut(&'f str),
    ) -> Result<(), ChatError> {
        let body = serde_json::to_string(request).map_err(|e| ChatError::Network(e.to_string()))?;

        let headers = Headers::new().map_err(|e| ChatError::Network(js_error(e)))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| ChatError::Network(js_error(e)))?;

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));

        let fetch_request = web_sys::Request::new_with_str_and_init(&self.endpoint(), &init)
            .map_err(|e| ChatError::Network(js_error(e)))?;
        let window = web_sys::window().ok_or_else(|| ChatError::Network("no window".into()))?;

        let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(|e| ChatError::Network(js_error(e)))?
            .dyn_into()
            .map_err(|e| ChatError::Network(js_error(e)))?;

        if !response.ok() {
            return Err(ChatError::Status(response.status()));
        }

        let stream = response
            .body()
            .ok_or_else(|| ChatError::Body("response has no body".into()))?;
        let reader: ReadableStreamDefaultReader = stream
            .get_reader()
            .dyn_into()
            .map_err(|e| ChatError::Body(js_error(e.into())))?;

        let mut decoder = SseDecoder::new();
        loop {
            let chunk = JsFuture::from(reader.read())
                .await
                .map_err(|e| ChatError::Body(js_error(e)))?;
            let done = Reflect::get(&chunk, &JsValue::from_str("done"))
                .map_err(|e| ChatError::Body(js_error(e)))?
                .as_bool()
                .unwrap_or(true);
            if done {
                break;
            }

            let value = Reflect::get(&chunk, &JsValue::from_str("value"))
                .map_err(|e| ChatError::Body(js_error(e)))?;
            let bytes = Uint8Array::new(&value).to_vec();
            for fragment in decoder.push(&bytes) {
                on_fragment(&fragment);
            }
        }

        for fragment in decoder.finish() {
            on_fragment(&fragment);
        }
        Ok(())
    }
}

/// [`Pause`] backed by `setTimeout`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerPause;

#[async_trait(?Send)]
impl Pause for TimerPause {
    async fn pause(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

// ============ Datasets ============

/// Fetch a text resource (CSV) relative to the site root
pub async fn fetch_text(path: &str) -> Result<String, DatasetError> {
    let fetch_error = |reason: String| DatasetError::Fetch {
        path: path.to_string(),
        reason,
    };

    let response = Request::get(path)
        .send()
        .await
        .map_err(|e| fetch_error(format!("Network error: {}", e)))?;

    if !response.ok() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    response
        .text()
        .await
        .map_err(|e| fetch_error(format!("Read error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://localhost:8000/"), "http://localhost:8000");
        assert_eq!(normalize_base(" https://api.tunimed.tn// "), "https://api.tunimed.tn");
    }

    #[test]
    fn test_fetch_endpoint() {
        let transport = FetchTransport::new("http://localhost:8000/");
        assert_eq!(transport.endpoint(), "http://localhost:8000/api/chat");
        assert_eq!(transport.name(), "fetch");
    }
}
