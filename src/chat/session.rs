//! Chat Exchange
//!
//! Drives one message through Idle → Sending → Streaming → Settled and
//! commits the result to a [`SessionStore`].
//!
//! - The user message is appended before any network activity (optimistic).
//! - Every fragment is published to the store as soon as it arrives.
//! - On success the reply becomes one assistant message and recommended
//!   doctors are appended.
//! - On failure a diagnostic assistant message is appended instead; errors
//!   never escape [`ChatSession::send`].
//! - The streaming flag is cleared by a drop guard, so it is reset on every
//!   path, including a panic inside the store.

use tracing::{debug, error, warn};

use super::error::ChatError;
use super::request::ChatRequest;
use super::transport::ChatTransport;
use crate::catalog::sample_doctors;
use crate::store::SessionStore;
use crate::types::{Doctor, Message};

/// First line of the message shown when the service cannot be reached
pub const SERVICE_ERROR_TITLE: &str = "⚠️ **Connection Error**";

/// Assistant message shown when an exchange fails
pub fn service_error_message(service_url: &str, error: &ChatError) -> String {
    format!(
        "{SERVICE_ERROR_TITLE}\n\n\
         Couldn't connect to the medical AI service.\n\n\
         **Please ensure:**\n\
         1. Python backend is running on {service_url}\n\
         2. Start backend: `cd backend && python api_server.py`\n\
         3. Check terminal for errors\n\n\
         **Error details:** {error}"
    )
}

/// Exchange lifecycle, used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
    Streaming,
    Settled,
}

/// What a call to [`ChatSession::send`] did
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    /// Input was empty after trimming; nothing happened
    Ignored,
    /// Another exchange was still streaming; nothing happened
    Rejected,
    Completed { reply: String, doctors_added: usize },
    Failed { error: ChatError },
}

/// Picks doctors to show after a successful reply.
///
/// Placeholder: always returns the first `count` doctors of a fixed pool and
/// ignores the reply text. The service does not yet return structured
/// recommendations.
#[derive(Debug, Clone)]
pub struct StaticRecommender {
    pool: Vec<Doctor>,
    count: usize,
}

impl StaticRecommender {
    pub fn new(pool: Vec<Doctor>, count: usize) -> Self {
        Self { pool, count }
    }

    pub fn recommend(&self, _reply: &str) -> Vec<Doctor> {
        self.pool.iter().take(self.count).cloned().collect()
    }
}

impl Default for StaticRecommender {
    fn default() -> Self {
        Self::new(sample_doctors(), 3)
    }
}

/// Raises the streaming flag for its lifetime
struct StreamingGuard<'a, S: SessionStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SessionStore + ?Sized> StreamingGuard<'a, S> {
    fn engage(store: &'a S) -> Self {
        store.set_live_reply("");
        store.set_streaming(true);
        Self { store }
    }
}

impl<S: SessionStore + ?Sized> Drop for StreamingGuard<'_, S> {
    fn drop(&mut self) {
        self.store.set_live_reply("");
        self.store.set_streaming(false);
        debug!(phase = ?Phase::Idle, "Exchange finished");
    }
}

/// One chat component over a pluggable transport
pub struct ChatSession {
    transport: Box<dyn ChatTransport>,
    recommender: StaticRecommender,
    service_url: String,
}

impl ChatSession {
    /// `service_url` is only used in the diagnostic shown on failure
    pub fn new(transport: Box<dyn ChatTransport>, service_url: impl Into<String>) -> Self {
        Self {
            transport,
            recommender: StaticRecommender::default(),
            service_url: service_url.into(),
        }
    }

    pub fn with_recommender(mut self, recommender: StaticRecommender) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Run one exchange for `input` against `store`
    pub async fn send<S: SessionStore + ?Sized>(&self, store: &S, input: &str) -> ExchangeOutcome {
        let text = input.trim();
        if text.is_empty() {
            return ExchangeOutcome::Ignored;
        }
        if store.is_streaming() {
            warn!("Rejecting message while a reply is streaming");
            return ExchangeOutcome::Rejected;
        }

        debug!(phase = ?Phase::Sending, transport = self.transport.name());
        let request = ChatRequest::new(text, &store.messages());
        store.add_message(Message::user(text));

        let _guard = StreamingGuard::engage(store);
        debug!(phase = ?Phase::Streaming);

        let mut reply = String::new();
        let result = self
            .transport
            .stream_reply(&request, &mut |fragment: &str| {
                reply.push_str(fragment);
                store.set_live_reply(&reply);
            })
            .await;

        debug!(phase = ?Phase::Settled, ok = result.is_ok());
        match result {
            Ok(()) => {
                store.add_message(Message::assistant(reply.clone()));
                store.set_live_reply("");

                let doctors = self.recommender.recommend(&reply);
                let doctors_added = doctors.len();
                store.add_recommended_doctors(doctors);

                ExchangeOutcome::Completed {
                    reply,
                    doctors_added,
                }
            }
            Err(e) => {
                error!(error = %e, transport = self.transport.name(), "Chat exchange failed");
                store.add_message(Message::assistant(service_error_message(
                    &self.service_url,
                    &e,
                )));
                store.set_live_reply("");
                ExchangeOutcome::Failed { error: e }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::sse::SseDecoder;
    use crate::store::SharedState;
    use crate::types::Role;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays raw body chunks through the stream decoder
    struct BodyTransport {
        chunks: Vec<&'static str>,
    }

    #[async_trait(?Send)]
    impl ChatTransport for BodyTransport {
        fn name(&self) -> &'static str {
            "body"
        }

        async fn stream_reply(
            &self,
            _request: &ChatRequest,
            on_fragment: &mut dyn for<'f> FnMut(&'f str),
        ) -> Result<(), ChatError> {
            let mut decoder = SseDecoder::new();
            for chunk in &self.chunks {
                for fragment in decoder.push(chunk.as_bytes()) {
                    on_fragment(&fragment);
                }
            }
            for fragment in decoder.finish() {
                on_fragment(&fragment);
            }
            Ok(())
        }
    }

    /// Emits one fragment, then fails
    struct FailingTransport {
        error: ChatError,
    }

    #[async_trait(?Send)]
    impl ChatTransport for FailingTransport {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn stream_reply(
            &self,
            _request: &ChatRequest,
            on_fragment: &mut dyn for<'f> FnMut(&'f str),
        ) -> Result<(), ChatError> {
            on_fragment("partial");
            Err(self.error.clone())
        }
    }

    /// Records the streaming flag whenever a fragment is published
    #[derive(Default)]
    struct ProbeStore {
        inner: SharedState,
        flag_during_fragments: RefCell<Vec<bool>>,
    }

    impl SessionStore for ProbeStore {
        fn messages(&self) -> Vec<Message> {
            self.inner.messages()
        }
        fn add_message(&self, message: Message) {
            self.inner.add_message(message)
        }
        fn is_streaming(&self) -> bool {
            self.inner.is_streaming()
        }
        fn set_streaming(&self, streaming: bool) {
            self.inner.set_streaming(streaming)
        }
        fn set_live_reply(&self, text: &str) {
            if !text.is_empty() {
                self.flag_during_fragments
                    .borrow_mut()
                    .push(self.inner.is_streaming());
            }
            self.inner.set_live_reply(text)
        }
        fn add_recommended_doctors(&self, doctors: Vec<Doctor>) {
            self.inner.add_recommended_doctors(doctors)
        }
    }

    fn body_session(chunks: Vec<&'static str>) -> ChatSession {
        ChatSession::new(Box::new(BodyTransport { chunks }), "http://localhost:8000")
    }

    #[tokio::test]
    async fn test_successful_exchange() {
        let session = body_session(vec!["data: {\"text\":\"ab\"}\n", "data: {\"text\":\"cd\"}\n"]);
        let store = ProbeStore::default();

        let outcome = session.send(&store, "  Find me a dentist  ").await;
        assert_eq!(
            outcome,
            ExchangeOutcome::Completed {
                reply: "abcd".to_string(),
                doctors_added: 3
            }
        );

        let state = store.inner.snapshot();
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.messages[0].content, "Find me a dentist");
        assert_eq!(state.messages[1].role, Role::Assistant);
        assert_eq!(state.messages[1].content, "abcd");
        assert!(!state.is_streaming);
        assert!(state.live_reply.is_empty());

        let ids: Vec<_> = state.recommended_doctors.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        // Flag was up for both published fragments
        assert_eq!(*store.flag_during_fragments.borrow(), vec![true, true]);
    }

    #[tokio::test]
    async fn test_failed_exchange() {
        let session = ChatSession::new(
            Box::new(FailingTransport {
                error: ChatError::Status(503),
            }),
            "http://localhost:8000",
        );
        let store = ProbeStore::default();

        let outcome = session.send(&store, "bonjour").await;
        assert_eq!(
            outcome,
            ExchangeOutcome::Failed {
                error: ChatError::Status(503)
            }
        );

        let state = store.inner.snapshot();
        assert_eq!(state.messages.len(), 2);
        let reply = &state.messages[1];
        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.starts_with(SERVICE_ERROR_TITLE));
        assert!(reply.content.contains("Python backend is running on http://localhost:8000"));
        assert!(reply.content.contains("**Error details:** HTTP error! status: 503"));
        assert!(state.recommended_doctors.is_empty());
        assert!(!state.is_streaming);
        assert!(state.live_reply.is_empty());
        assert_eq!(*store.flag_during_fragments.borrow(), vec![true]);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let session = body_session(vec![]);
        let store = SharedState::default();

        assert_eq!(session.send(&store, "   \n").await, ExchangeOutcome::Ignored);
        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn test_second_send_while_streaming_is_rejected() {
        let session = body_session(vec!["data: {\"text\":\"x\"}\n"]);
        let store = SharedState::default();
        store.set_streaming(true);

        assert_eq!(session.send(&store, "hello").await, ExchangeOutcome::Rejected);
        assert!(store.messages().is_empty());
        assert!(store.is_streaming());
    }

    #[tokio::test]
    async fn test_history_excludes_current_message() {
        struct HistoryProbe {
            seen: Rc<RefCell<Vec<usize>>>,
        }

        #[async_trait(?Send)]
        impl ChatTransport for HistoryProbe {
            fn name(&self) -> &'static str {
                "probe"
            }

            async fn stream_reply(
                &self,
                request: &ChatRequest,
                on_fragment: &mut dyn for<'f> FnMut(&'f str),
            ) -> Result<(), ChatError> {
                self.seen
                    .borrow_mut()
                    .push(request.context.conversation_history.len());
                on_fragment("ok");
                Ok(())
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let probe = HistoryProbe { seen: seen.clone() };
        let store = SharedState::default();
        let session = ChatSession::new(Box::new(probe), "http://localhost:8000");

        session.send(&store, "one").await;
        session.send(&store, "two").await;

        // Second request carries the first user message and its reply
        assert_eq!(*seen.borrow(), vec![0, 2]);

        // Doctors accumulate across turns without dedup
        assert_eq!(store.snapshot().recommended_doctors.len(), 6);
        assert_eq!(store.messages().len(), 4);
    }

    #[test]
    fn test_static_recommender_ignores_reply() {
        let recommender = StaticRecommender::default();
        assert_eq!(recommender.recommend("anything"), recommender.recommend("else"));
        assert_eq!(recommender.recommend("").len(), 3);
    }

    #[test]
    fn test_streaming_guard_clears_flag_on_panic() {
        let store = SharedState::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = StreamingGuard::engage(&store);
            assert!(store.is_streaming());
            panic!("store exploded");
        }));
        assert!(result.is_err());
        assert!(!store.is_streaming());
    }
}
