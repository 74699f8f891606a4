//! API Client
//!
//! Browser-side access to the assistant service and the bundled datasets.

pub mod client;

pub use client::{build_session, fetch_text};
