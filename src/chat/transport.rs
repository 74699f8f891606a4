//! Chat Transports
//!
//! A transport sends one [`ChatRequest`] and reports reply fragments as they
//! arrive. Two variants exist: a real HTTP endpoint (`HttpTransport`
//! natively, a fetch-based one in the browser) and [`SimulatedTransport`],
//! which streams a canned reply word by word.

use async_trait::async_trait;
use std::time::Duration;

use super::error::ChatError;
use super::request::ChatRequest;

/// Send a message and stream the reply.
///
/// Not `Send`: browser futures are tied to the JS event loop.
#[async_trait(?Send)]
pub trait ChatTransport {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Stream the reply to `request`, calling `on_fragment` for every decoded
    /// fragment in arrival order. Returns once the stream has ended.
    async fn stream_reply(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn for<'f> FnMut(&'f str),
    ) -> Result<(), ChatError>;
}

/// Async sleep, provided by whichever runtime hosts the transport
#[async_trait(?Send)]
pub trait Pause {
    async fn pause(&self, duration: Duration);
}

/// Tokio-backed [`Pause`]
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[cfg(feature = "native")]
#[async_trait(?Send)]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Offline transport that fakes a streamed answer
#[derive(Debug, Clone)]
pub struct SimulatedTransport<P> {
    pause: P,
    delay: Duration,
}

impl<P: Pause> SimulatedTransport<P> {
    pub fn new(pause: P, delay: Duration) -> Self {
        Self { pause, delay }
    }
}

/// The reply the simulated assistant gives to `message`
pub fn canned_reply(message: &str) -> String {
    format!(
        "I understand you're looking for: \"{message}\". \
         Based on your location in Tunis, here are some doctors who can help. \
         You can see them on the map on the right. \
         Click a marker to view their address and phone number."
    )
}

#[async_trait(?Send)]
impl<P: Pause> ChatTransport for SimulatedTransport<P> {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn stream_reply(
        &self,
        request: &ChatRequest,
        on_fragment: &mut dyn for<'f> FnMut(&'f str),
    ) -> Result<(), ChatError> {
        let reply = canned_reply(&request.message);
        for word in reply.split_inclusive(' ') {
            self.pause.pause(self.delay).await;
            on_fragment(word);
        }
        Ok(())
    }
}
