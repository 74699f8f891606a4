//! Loading Component
//!
//! Loading spinners and overlays.

use leptos::*;

/// Centered spinner with a caption
#[component]
pub fn Loading(
    #[prop(default = "Loading...")]
    message: &'static str,
) -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-12">
            <div class="loading-spinner w-12 h-12 mb-4" />
            <p class="text-gray-500">{message}</p>
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}

/// Spinner laid over its children while `loading` is true
#[component]
pub fn LoadingOverlay(
    #[prop(into)]
    loading: Signal<bool>,
    #[prop(default = "Loading map data...")]
    message: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="relative">
            {children()}

            {move || {
                if loading.get() {
                    view! {
                        <div class="absolute inset-0 z-[1000] bg-white/80 flex items-center justify-center rounded-lg">
                            <Loading message=message />
                        </div>
                    }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </div>
    }
}
