//! Home Page
//!
//! The assistant: chat on the left, recommended doctors on the right.

use leptos::*;

use crate::components::{ChatWindow, MapView};

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <div class="flex" style="height: calc(100vh - 4rem)">
            <div class="w-2/5 border-r border-gray-200 bg-white">
                <ChatWindow />
            </div>
            <div class="w-3/5">
                <MapView />
            </div>
        </div>
    }
}
