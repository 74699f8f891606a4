//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod home;

pub use dashboard::Dashboard;
pub use home::Home;
