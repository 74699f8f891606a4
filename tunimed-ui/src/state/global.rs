//! Global Application State
//!
//! Reactive state management using Leptos signals. Each slice of the
//! application state is its own signal; the named actions below are the only
//! writers, and [`SessionStore`] lets the shared chat exchange drive them.

use leptos::*;
use std::rc::Rc;

use tunimed::chat::{ChatError, ChatSession, ExchangeOutcome};
use tunimed::store::SessionStore;
use tunimed::types::{Doctor, Message, UserLocation};

use crate::api;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Map center for the recommendations map
    pub user_location: RwSignal<UserLocation>,
    /// Chat history, oldest first
    pub messages: RwSignal<Vec<Message>>,
    /// True while an exchange is outstanding
    pub is_streaming: RwSignal<bool>,
    /// Text of the reply being streamed
    pub live_reply: RwSignal<String>,
    /// Doctors suggested so far (accumulates)
    pub recommended_doctors: RwSignal<Vec<Doctor>>,
    /// Doctor whose card is open on the map
    pub selected_doctor: RwSignal<Option<Doctor>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Chat exchange over the configured transport
    chat: Rc<ChatSession>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let session = api::build_session();
    web_sys::console::log_1(
        &format!(
            "Chat transport: {} ({})",
            session.transport_name(),
            api::get_api_base()
        )
        .into(),
    );
    provide_context(GlobalState::new(session));
}

impl GlobalState {
    pub fn new(chat: ChatSession) -> Self {
        Self {
            user_location: create_rw_signal(UserLocation::default()),
            messages: create_rw_signal(Vec::new()),
            is_streaming: create_rw_signal(false),
            live_reply: create_rw_signal(String::new()),
            recommended_doctors: create_rw_signal(Vec::new()),
            selected_doctor: create_rw_signal(None),
            error: create_rw_signal(None),
            chat: Rc::new(chat),
        }
    }

    // ============ Actions ============

    pub fn set_user_location(&self, location: UserLocation) {
        self.user_location.set(location);
    }

    pub fn set_recommended_doctors(&self, doctors: Vec<Doctor>) {
        self.recommended_doctors.set(doctors);
    }

    pub fn add_recommended_doctors(&self, doctors: Vec<Doctor>) {
        self.recommended_doctors.update(|current| current.extend(doctors));
    }

    pub fn set_selected_doctor(&self, doctor: Option<Doctor>) {
        self.selected_doctor.set(doctor);
    }

    pub fn add_message(&self, message: Message) {
        self.messages.update(|messages| messages.push(message));
    }

    pub fn clear_messages(&self) {
        self.messages.update(Vec::clear);
    }

    pub fn set_streaming(&self, streaming: bool) {
        self.is_streaming.set(streaming);
    }

    pub fn set_live_reply(&self, text: &str) {
        self.live_reply.set(text.to_string());
    }

    /// Run one chat exchange in the background
    pub fn send_message(&self, text: String) {
        let state = self.clone();
        spawn_local(async move {
            let outcome = state.chat.send(&state, &text).await;
            if let ExchangeOutcome::Failed { error } = &outcome {
                web_sys::console::error_1(&format!("Chat exchange failed: {}", error).into());
            }
            if let Some(notice) = outcome_notice(&outcome) {
                state.show_error(&notice);
            }
        });
    }

    pub fn dismiss_error(&self) {
        self.error.set(None);
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            let _ = error_signal.try_set(None);
        })
        .forget();
    }
}

/// Toast text for an exchange outcome. Failures already land in the chat
/// as an assistant message, so only rejected sends need one.
fn outcome_notice(outcome: &ExchangeOutcome) -> Option<String> {
    match outcome {
        ExchangeOutcome::Rejected => Some(ChatError::Busy.to_string()),
        _ => None,
    }
}

impl SessionStore for GlobalState {
    fn messages(&self) -> Vec<Message> {
        self.messages.get_untracked()
    }

    fn add_message(&self, message: Message) {
        GlobalState::add_message(self, message);
    }

    fn is_streaming(&self) -> bool {
        self.is_streaming.get_untracked()
    }

    fn set_streaming(&self, streaming: bool) {
        GlobalState::set_streaming(self, streaming);
    }

    fn set_live_reply(&self, text: &str) {
        GlobalState::set_live_reply(self, text);
    }

    fn add_recommended_doctors(&self, doctors: Vec<Doctor>) {
        GlobalState::add_recommended_doctors(self, doctors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tunimed::catalog::sample_doctors;
    use tunimed::chat::{Pause, SimulatedTransport};

    struct NoPause;

    #[async_trait(?Send)]
    impl Pause for NoPause {
        async fn pause(&self, _duration: Duration) {}
    }

    fn state() -> GlobalState {
        let transport = SimulatedTransport::new(NoPause, Duration::ZERO);
        GlobalState::new(ChatSession::new(Box::new(transport), "http://localhost:8000"))
    }

    #[test]
    fn test_defaults() {
        let runtime = create_runtime();
        let state = state();

        assert_eq!(state.user_location.get_untracked(), UserLocation::TUNIS);
        assert!(state.messages.get_untracked().is_empty());
        assert!(!SessionStore::is_streaming(&state));
        assert!(state.selected_doctor.get_untracked().is_none());

        runtime.dispose();
    }

    #[test]
    fn test_recommendations_accumulate() {
        let runtime = create_runtime();
        let state = state();

        state.add_recommended_doctors(sample_doctors()[..3].to_vec());
        state.add_recommended_doctors(sample_doctors()[..3].to_vec());
        assert_eq!(state.recommended_doctors.get_untracked().len(), 6);

        state.set_recommended_doctors(Vec::new());
        assert!(state.recommended_doctors.get_untracked().is_empty());

        runtime.dispose();
    }

    #[test]
    fn test_session_store_actions() {
        let runtime = create_runtime();
        let state = state();

        SessionStore::add_message(&state, Message::user("Bonjour"));
        SessionStore::set_streaming(&state, true);
        SessionStore::set_live_reply(&state, "Bonj");

        assert_eq!(SessionStore::messages(&state).len(), 1);
        assert!(SessionStore::is_streaming(&state));
        assert_eq!(state.live_reply.get_untracked(), "Bonj");

        state.clear_messages();
        assert!(state.messages.get_untracked().is_empty());

        runtime.dispose();
    }

    #[test]
    fn test_rejected_send_raises_busy_notice() {
        assert_eq!(
            outcome_notice(&ExchangeOutcome::Rejected).as_deref(),
            Some("A reply is already streaming")
        );
        assert!(outcome_notice(&ExchangeOutcome::Ignored).is_none());
        assert!(outcome_notice(&ExchangeOutcome::Failed { error: ChatError::Status(502) }).is_none());
    }

    #[test]
    fn test_dismiss_error() {
        let runtime = create_runtime();
        let state = state();

        state.error.set(Some(ChatError::Busy.to_string()));
        state.dismiss_error();
        assert!(state.error.get_untracked().is_none());

        runtime.dispose();
    }
}
