use bugbee_core::store::Action;
use bugbee_core::ForumApi;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::state::{use_store, use_toaster};

const OFFERS: &[&str] = &[
    "A forum-like platform for developers to ask and answer questions",
    "Collaborative problem-solving for tedious coding tasks",
    "Knowledge sharing and best practices from experienced developers",
    "Categorized discussions for easy navigation and search",
];

#[component]
fn NewsletterButton() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let subscribing = RwSignal::new(false);
    let subscribed = move || {
        store.with(|s| s.user().is_some_and(|u| u.is_news_letter_subscribed))
    };

    let on_subscribe = move |_| {
        if !store.signed_in_untracked() {
            toaster.info("Please sign in to subscribe to the newsletter.");
            return;
        }
        subscribing.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.subscribe_newsletter().await {
                Ok(()) => {
                    store.dispatch(Action::NewsletterSubscribed);
                    toaster.success("Subscribed to newsletter successfully");
                }
                Err(err) => {
                    tracing::warn!(%err, "newsletter subscription failed");
                    toaster.error("Failed to subscribe to newsletter. Please try again.");
                }
            }
            subscribing.set(false);
        });
    };

    view! {
        <Show
            when=move || !subscribed()
            fallback=|| view! { <button class="bugbee-btn" disabled=true>"Subscribed"</button> }
        >
            <button
                class="bugbee-btn bugbee-btn-primary"
                disabled=move || subscribing.get()
                on:click=on_subscribe.clone()
            >
                {move || if subscribing.get() { "Subscribing..." } else { "Subscribe" }}
            </button>
        </Show>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="bugbee-about">
            <h1>"About BugBee"</h1>
            <section class="bugbee-card">
                <h2>"Our Mission"</h2>
                <p>
                    "BugBee is a place for developers to help each other with tedious problems: \
                     ask a question, share what you know, and find answers to common coding challenges."
                </p>
            </section>
            <section class="bugbee-card">
                <h2>"What BugBee Offers"</h2>
                <ul class="list-disc pl-5">
                    {OFFERS.iter().map(|item| view! { <li>{*item}</li> }).collect::<Vec<_>>()}
                </ul>
            </section>
            <section class="bugbee-card">
                <h2>"Newsletter"</h2>
                <p class="bugbee-hint">
                    "Stay updated with the latest discussions, features, and developer tips"
                </p>
                <NewsletterButton />
            </section>
        </div>
    }
}
