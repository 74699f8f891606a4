//! Toast Notification Component
//!
//! Shows the current error from global state.

use leptos::*;

use crate::state::global::GlobalState;

/// Error toast, rendered while `GlobalState::error` is set
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let error = state.error;

    view! {
        <div class="fixed bottom-6 right-4 z-[2000] space-y-2">
            {move || {
                error.get().map(|message| {
                    let state = state.clone();
                    view! {
                        <div class="flex items-center space-x-3 bg-red-600 text-white px-4 py-3 rounded-lg shadow-lg">
                            <span class="text-lg">"✕"</span>
                            <span class="text-sm font-medium">{message}</span>
                            <button
                                class="ml-2 text-white/80 hover:text-white"
                                title="Dismiss"
                                on:click=move |_| state.dismiss_error()
                            >
                                "×"
                            </button>
                        </div>
                    }
                })
            }}
        </div>
    }
}
