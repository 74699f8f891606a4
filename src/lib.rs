//! # TuniMed
//!
//! Medical assistant for Tunisia: a streaming chat with an AI service that
//! suggests doctors, plus doctor maps and statistics built from bundled CSV
//! datasets.
//!
//! ## Modules
//!
//! - [`chat`]: exchange state machine, transports and stream decoding
//! - [`store`]: application state and its actions
//! - [`dataset`]: CSV schemas, filtering and proximity clustering
//! - [`catalog`]: static statistics and sample doctors
//! - [`config`]: TOML and environment configuration
//!
//! The crate builds for the browser with default features disabled; the
//! `native` feature adds the reqwest transport, config loading and the
//! `tunimed-cli` terminal client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tunimed::chat::{session_from_config, ExchangeOutcome};
//! use tunimed::config::Config;
//! use tunimed::store::SharedState;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load_default();
//!     let session = session_from_config(&config.chat);
//!     let state = SharedState::default();
//!
//!     match session.send(&state, "J'ai mal à la gorge depuis trois jours").await {
//!         ExchangeOutcome::Completed { reply, doctors_added } => {
//!             println!("{reply}\n({doctors_added} doctors suggested)");
//!         }
//!         other => println!("{other:?}"),
//!     }
//! }
//! ```

pub mod catalog;
pub mod chat;
pub mod config;
pub mod dataset;
pub mod store;
pub mod types;

pub use chat::{ChatError, ChatSession, ChatTransport, ExchangeOutcome, SimulatedTransport};
pub use config::{Config, ConfigError, TransportKind};
pub use dataset::{
    cluster_points, parse_csv, Dataset, DatasetError, DirectoryRecord, DoctorFilter,
    ProfileRecord,
};
pub use store::{AppState, SessionStore, SharedState};
pub use types::{Doctor, Message, Role, UserLocation};
