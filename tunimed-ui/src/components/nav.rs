//! Navigation Component
//!
//! Header navigation bar with logo and links.

use leptos::*;
use leptos_router::*;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    view! {
        <nav class="border-b border-gray-200 bg-white">
            <div class="mx-auto max-w-7xl px-4 sm:px-6 lg:px-8">
                <div class="flex h-16 items-center justify-between">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-2">
                        <span class="text-2xl">"📍"</span>
                        <span class="text-xl font-bold text-gray-900">"Medical AI Assistant"</span>
                    </A>

                    // Navigation links
                    <div class="flex items-center space-x-4">
                        <NavLink href="/" label="Home" icon="📍" />
                        <NavLink href="/dashboard" label="Dashboard" icon="📊" />
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
    icon: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="inline-flex items-center px-3 py-2 text-sm font-medium text-gray-700 hover:text-blue-600"
            active_class="text-blue-600"
        >
            <span class="mr-2">{icon}</span>
            {label}
        </A>
    }
}
