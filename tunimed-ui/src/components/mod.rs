//! UI Components
//!
//! Reusable Leptos components for the assistant and the dashboard.

pub mod chart;
pub mod chat;
pub mod doctor_maps;
pub mod loading;
pub mod map_view;
pub mod nav;
pub mod toast;

pub use chart::{BarChart, Orientation};
pub use chat::ChatWindow;
pub use doctor_maps::{ClusterMap, DoctorsMap, InteractiveMap};
pub use loading::{InlineLoading, LoadingOverlay};
pub use map_view::MapView;
pub use nav::Nav;
pub use toast::Toast;
