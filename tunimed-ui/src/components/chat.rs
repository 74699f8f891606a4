//! Chat Components
//!
//! Message list with the live reply, and the input form.

use leptos::*;

use tunimed::types::Message;

use crate::components::InlineLoading;
use crate::state::global::GlobalState;

/// Chat panel: header, messages, streaming reply and input
#[component]
pub fn ChatWindow() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let messages = state.messages;
    let live_reply = state.live_reply;
    let is_streaming = state.is_streaming;
    let end_ref = create_node_ref::<html::Div>();

    // Keep the newest content in view
    create_effect(move |_| {
        let _ = messages.with(Vec::len);
        let _ = live_reply.with(String::len);
        if let Some(end) = end_ref.get() {
            end.scroll_into_view();
        }
    });

    view! {
        <div class="flex flex-col h-full">
            // Header
            <div class="p-4 border-b border-gray-200 bg-white">
                <h2 class="text-lg font-semibold text-gray-900">"AI Medical Assistant"</h2>
                <p class="text-sm text-gray-500">"Ask me to find doctors in Tunisia"</p>
            </div>

            // Messages
            <div class="flex-1 overflow-y-auto p-4 bg-gray-50">
                {move || {
                    if messages.with(Vec::is_empty) && live_reply.with(String::is_empty) {
                        view! { <Welcome /> }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}

                <For
                    each=move || messages.get()
                    key=|message| message.id.clone()
                    children=|message| view! { <MessageBubble message=message /> }
                />

                {move || {
                    let text = live_reply.get();
                    if is_streaming.get() && !text.is_empty() {
                        view! { <StreamingBubble text=text /> }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}

                <div node_ref=end_ref />
            </div>

            <ChatInput />
        </div>
    }
}

#[component]
fn Welcome() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center h-full text-center">
            <div class="text-6xl text-gray-300 mb-4">"🤖"</div>
            <h3 class="text-lg font-medium text-gray-900 mb-2">
                "Welcome to Medical AI Assistant"
            </h3>
            <p class="text-sm text-gray-500 max-w-sm">
                "I can help you find doctors, specialists, and medical facilities across Tunisia. "
                "Try asking: \"Find me a dentist in Tunis\""
            </p>
        </div>
    }
}

/// A single chat message
#[component]
pub fn MessageBubble(message: Message) -> impl IntoView {
    let is_user = message.is_user();
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S")
        .to_string();

    let row_class = if is_user {
        "flex gap-3 mb-4 justify-end"
    } else {
        "flex gap-3 mb-4 justify-start"
    };
    let bubble_class = if is_user {
        "max-w-[70%] rounded-lg px-4 py-2 bg-blue-600 text-white"
    } else {
        "max-w-[70%] rounded-lg px-4 py-2 bg-gray-100 text-gray-900"
    };

    view! {
        <div class=row_class>
            {(!is_user).then(|| view! { <Avatar user=false /> })}
            <div class=bubble_class>
                <p class="text-sm whitespace-pre-wrap">{message.content}</p>
                <span class="text-xs opacity-70 mt-1 block">{time}</span>
            </div>
            {is_user.then(|| view! { <Avatar user=true /> })}
        </div>
    }
}

/// The reply being streamed, with a blinking caret
#[component]
fn StreamingBubble(text: String) -> impl IntoView {
    view! {
        <div class="flex gap-3 mb-4">
            <Avatar user=false />
            <div class="max-w-[70%] rounded-lg px-4 py-2 bg-gray-100 text-gray-900">
                <p class="text-sm whitespace-pre-wrap">{text}</p>
                <span class="inline-block w-1 h-4 bg-gray-900 animate-pulse ml-1" />
            </div>
        </div>
    }
}

#[component]
fn Avatar(user: bool) -> impl IntoView {
    let (class, icon) = if user {
        ("flex-shrink-0 h-8 w-8 rounded-full bg-blue-600 flex items-center justify-center", "🧑")
    } else {
        ("flex-shrink-0 h-8 w-8 rounded-full bg-blue-100 flex items-center justify-center", "🤖")
    };
    view! { <div class=class>{icon}</div> }
}

/// Message input form
#[component]
pub fn ChatInput() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let is_streaming = state.is_streaming;
    let (input, set_input) = create_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let text = input.get_untracked().trim().to_string();
        if text.is_empty() || is_streaming.get_untracked() {
            return;
        }
        set_input.set(String::new());
        state.send_message(text);
    };

    view! {
        <form on:submit=on_submit class="p-4 border-t border-gray-200 bg-white">
            <div class="flex gap-2">
                <input
                    type="text"
                    class="flex-1 px-3 py-2 border border-gray-300 rounded-md focus:outline-none
                           focus:ring-2 focus:ring-blue-500 disabled:bg-gray-100"
                    placeholder="Ask me to find doctors near you..."
                    prop:value=input
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    disabled=move || is_streaming.get()
                />
                <button
                    type="submit"
                    disabled=move || is_streaming.get() || input.with(|text| text.trim().is_empty())
                    class="px-4 py-2 bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400
                           disabled:cursor-not-allowed text-white rounded-md transition-colors"
                >
                    {move || if is_streaming.get() {
                        view! { <InlineLoading /> }.into_view()
                    } else {
                        view! { <span>"Send"</span> }.into_view()
                    }}
                </button>
            </div>
        </form>
    }
}
