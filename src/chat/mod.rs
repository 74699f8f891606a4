//! Chat
//!
//! Streaming exchange with the medical assistant service.
//!
//! ## Architecture
//!
//! - **ChatSession**: the exchange state machine, writes to a `SessionStore`
//! - **ChatTransport**: sends one request and streams reply fragments
//!   - `HttpTransport` (native) / `FetchTransport` (dashboard): real endpoint
//!   - `SimulatedTransport`: canned reply, one word per pause
//! - **SseDecoder**: turns body chunks into `data: ` fragments

mod error;
mod request;
mod session;
mod sse;
mod transport;

#[cfg(feature = "native")]
mod http;

pub use error::{ChatError, ChatResult};
pub use request::{ChatContext, ChatRequest, HistoryEntry};
pub use session::{
    service_error_message, ChatSession, ExchangeOutcome, Phase, StaticRecommender,
    SERVICE_ERROR_TITLE,
};
pub use sse::{decode_line, SseDecoder};
pub use transport::{canned_reply, ChatTransport, Pause, SimulatedTransport};

#[cfg(feature = "native")]
pub use http::HttpTransport;
#[cfg(feature = "native")]
pub use transport::TokioPause;

#[cfg(feature = "native")]
use crate::config::{ChatConfig, TransportKind};

/// Build a session with the transport selected in `config`
#[cfg(feature = "native")]
pub fn session_from_config(config: &ChatConfig) -> ChatSession {
    let transport: Box<dyn ChatTransport> = match config.transport {
        TransportKind::Http => Box::new(HttpTransport::new(config.base_url.clone())),
        TransportKind::Simulated => Box::new(SimulatedTransport::new(
            TokioPause,
            std::time::Duration::from_millis(config.simulated_delay_ms),
        )),
    };
    tracing::info!(transport = transport.name(), url = %config.base_url, "Chat session ready");
    ChatSession::new(transport, config.base_url.clone())
}
