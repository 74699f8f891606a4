//! State Management
//!
//! Global application state backed by Leptos signals.

pub mod global;

pub use global::{provide_global_state, GlobalState};
