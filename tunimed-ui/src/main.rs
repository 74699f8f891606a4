//! TuniMed Dashboard
//!
//! Medical assistant and doctor statistics for Tunisia, built with Leptos
//! (WASM).
//!
//! # Features
//!
//! - Streaming chat with the medical AI service
//! - Map of recommended doctors next to the chat
//! - Statistics dashboard with charts and three doctor maps
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The chat exchange, datasets and catalog come from the
//! `tunimed` crate; this crate supplies the reactive store, the fetch-based
//! transport and Leaflet bindings.

use leptos::*;

mod api;
mod app;
mod components;
mod leaflet;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
