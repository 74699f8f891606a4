//! Session Store
//!
//! Application state for one browser tab (or one terminal session): the
//! user's location, the chat history, the streaming flag, the recommended
//! doctors and the selected doctor.
//!
//! State lives in an explicit [`AppState`] value and is only changed through
//! its action methods. The chat exchange talks to state through the
//! [`SessionStore`] trait, so the same exchange runs against [`SharedState`]
//! natively and against reactive signals in the web dashboard.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::{Doctor, Message, UserLocation};

/// Plain application state with synchronous, whole-value actions
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub user_location: UserLocation,
    pub messages: Vec<Message>,
    pub is_streaming: bool,
    /// Text of the in-flight assistant reply, empty when idle
    pub live_reply: String,
    pub recommended_doctors: Vec<Doctor>,
    pub selected_doctor: Option<Doctor>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_location(&mut self, location: UserLocation) {
        self.user_location = location;
    }

    pub fn set_recommended_doctors(&mut self, doctors: Vec<Doctor>) {
        self.recommended_doctors = doctors;
    }

    /// Append doctors to the recommendation set (no dedup, no cap)
    pub fn add_recommended_doctors(&mut self, doctors: Vec<Doctor>) {
        self.recommended_doctors.extend(doctors);
    }

    pub fn set_selected_doctor(&mut self, doctor: Option<Doctor>) {
        self.selected_doctor = doctor;
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn set_streaming(&mut self, streaming: bool) {
        self.is_streaming = streaming;
    }

    pub fn set_live_reply(&mut self, text: &str) {
        self.live_reply.clear();
        self.live_reply.push_str(text);
    }
}

/// The slice of state a chat exchange reads and writes.
///
/// Methods take `&self`: implementors use interior mutability (a mutex, or
/// reactive signals in the browser) so the store can be shared with the UI
/// while an exchange is in flight.
pub trait SessionStore {
    /// Snapshot of the message history
    fn messages(&self) -> Vec<Message>;

    fn add_message(&self, message: Message);

    fn is_streaming(&self) -> bool;

    fn set_streaming(&self, streaming: bool);

    /// Publish the reply text accumulated so far
    fn set_live_reply(&self, text: &str);

    fn add_recommended_doctors(&self, doctors: Vec<Doctor>);
}

/// Thread-safe handle around [`AppState`]
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Mutex<AppState>>,
}

impl SharedState {
    pub fn new(state: AppState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Lock the state. A poisoned lock still yields the data: every action
    /// is a single assignment, so a panic cannot leave it half-written.
    pub fn lock(&self) -> MutexGuard<'_, AppState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> AppState {
        self.lock().clone()
    }
}

impl SessionStore for SharedState {
    fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    fn add_message(&self, message: Message) {
        self.lock().add_message(message);
    }

    fn is_streaming(&self) -> bool {
        self.lock().is_streaming
    }

    fn set_streaming(&self, streaming: bool) {
        self.lock().set_streaming(streaming);
    }

    fn set_live_reply(&self, text: &str) {
        self.lock().set_live_reply(text);
    }

    fn add_recommended_doctors(&self, doctors: Vec<Doctor>) {
        self.lock().add_recommended_doctors(doctors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_doctors;

    #[test]
    fn test_defaults() {
        let state = AppState::new();
        assert_eq!(state.user_location, UserLocation::TUNIS);
        assert!(state.messages.is_empty());
        assert!(!state.is_streaming);
        assert!(state.selected_doctor.is_none());
    }

    #[test]
    fn test_recommended_doctors_accumulate_without_dedup() {
        let mut state = AppState::new();
        let doctors = sample_doctors();
        state.add_recommended_doctors(doctors[..3].to_vec());
        state.add_recommended_doctors(doctors[..3].to_vec());
        assert_eq!(state.recommended_doctors.len(), 6);

        state.set_recommended_doctors(vec![doctors[4].clone()]);
        assert_eq!(state.recommended_doctors.len(), 1);
    }

    #[test]
    fn test_selected_doctor_is_independent_of_recommendations() {
        let mut state = AppState::new();
        let doctor = sample_doctors().remove(5);
        state.set_selected_doctor(Some(doctor.clone()));
        assert!(state.recommended_doctors.is_empty());
        assert_eq!(state.selected_doctor, Some(doctor));

        state.set_selected_doctor(None);
        assert!(state.selected_doctor.is_none());
    }

    #[test]
    fn test_messages_append_and_clear() {
        let mut state = AppState::new();
        state.add_message(Message::user("a"));
        state.add_message(Message::assistant("b"));
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content, "b");

        state.clear_messages();
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_shared_state_actions() {
        let shared = SharedState::default();
        let view = shared.clone();

        shared.add_message(Message::user("salut"));
        shared.set_streaming(true);
        shared.set_live_reply("partial");

        assert_eq!(view.messages().len(), 1);
        assert!(view.is_streaming());
        assert_eq!(view.snapshot().live_reply, "partial");
    }
}
