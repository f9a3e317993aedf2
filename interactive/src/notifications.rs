use bugbee_core::config::ClientConfig;
use bugbee_core::notify::{NotificationFeed, NotificationKind};
use bugbee_core::sync::{self, Epoch};
use bugbee_core::{time, ForumApi};
use bugbee_shared::Notification;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::state::{use_store, use_toaster};

fn icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Answer => "\u{1F4AC}",
        NotificationKind::Like => "\u{1F44D}",
        NotificationKind::Comment => "\u{1F5E8}",
        NotificationKind::Other => "\u{1F514}",
    }
}

/// Header bell. Polls the feed while a user is signed in; the loop ends on
/// sign-out or when the bell unmounts.
#[component]
pub fn NotificationBell() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let config = expect_context::<ClientConfig>();
    let store = use_store();
    let toaster = use_toaster();
    let navigate = use_navigate();

    let feed = RwSignal::new(NotificationFeed::default());
    let open = RwSignal::new(false);
    let marking = RwSignal::new(false);
    let signed_in = Memo::new(move |_| store.signed_in());
    let epoch = Epoch::new();

    {
        let epoch = epoch.clone();
        let api = api.clone();
        Effect::new(move |_| {
            let ticket = epoch.advance();
            if !signed_in.get() {
                feed.set(NotificationFeed::default());
                open.set(false);
                return;
            }
            let epoch = epoch.clone();
            let tick_epoch = epoch.clone();
            let api = api.clone();
            let plan = config.notification_poll();
            spawn_local(async move {
                sync::poll(
                    &epoch,
                    ticket,
                    plan,
                    gloo_timers::future::sleep,
                    move || {
                        let api = api.clone();
                        let epoch = tick_epoch.clone();
                        async move {
                            match NotificationFeed::refresh(&api).await {
                                Ok(next) => {
                                    if let Some(next) = epoch.accept(ticket, next) {
                                        feed.set(next);
                                    }
                                }
                                Err(err) => tracing::warn!(%err, "fetching notifications failed"),
                            }
                        }
                    },
                )
                .await;
            });
        });
    }
    on_cleanup(move || {
        epoch.advance();
    });

    let mark_all = move |_| {
        if !feed.with_untracked(|f| f.can_mark_read(marking.get_untracked())) {
            return;
        }
        marking.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.mark_all_read().await {
                Ok(()) => match NotificationFeed::refresh(&api).await {
                    Ok(next) => feed.set(next),
                    Err(err) => {
                        tracing::warn!(%err, "refetch after mark-all-read failed");
                        feed.update(|f| {
                            f.items.iter_mut().for_each(|n| n.read = true);
                            f.unread = 0;
                        });
                    }
                },
                Err(err) => {
                    tracing::warn!(%err, "mark-all-read failed");
                    toaster.error("Failed to mark notifications as read");
                }
            }
            marking.set(false);
        });
    };

    let on_pick = move |notification: &Notification| {
        if let Some(id) = &notification.question_id {
            open.set(false);
            navigate(&format!("/?question={id}"), Default::default());
        }
    };

    view! {
        <Show when=move || signed_in.get()>
            <div class="bugbee-bell">
                <button
                    class="bugbee-btn bugbee-btn-ghost"
                    title="Notifications"
                    on:click=move |_| open.update(|o| *o = !*o)
                >
                    "\u{1F514}"
                    <Show when=move || feed.with(|f| f.unread > 0)>
                        <span class="bugbee-badge">{move || feed.with(|f| f.unread)}</span>
                    </Show>
                </button>
                {
                let mark_all = mark_all.clone();
                let on_pick = on_pick.clone();
                view! {
                <Show when=move || open.get()>
                    <div class="bugbee-dropdown bugbee-notifications">
                        <header class="bugbee-dropdown-header">
                            <span>"Notifications"</span>
                            <button
                                class="bugbee-btn bugbee-btn-sm"
                                disabled=move || !feed.with(|f| f.can_mark_read(marking.get()))
                                on:click=mark_all.clone()
                            >
                                "Mark all as read"
                            </button>
                        </header>
                        <ul>
                            {
                                let on_pick = on_pick.clone();
                                move || {
                                    let now = chrono::Utc::now();
                                    let items = feed.with(|f| f.items.clone());
                                    if items.is_empty() {
                                        return view! {
                                            <li class="bugbee-hint">"No notifications yet"</li>
                                        }
                                            .into_any();
                                    }
                                    items
                                        .into_iter()
                                        .map(|n| {
                                            let on_pick = on_pick.clone();
                                            let kind = NotificationKind::classify(&n.message);
                                            let when = time::relative_opt(n.created_at.as_deref(), now);
                                            let unread = !n.read;
                                            let message = n.message.clone();
                                            view! {
                                                <li
                                                    class="bugbee-notification"
                                                    class:bugbee-unread=unread
                                                    on:click=move |_| on_pick(&n)
                                                >
                                                    <span class="bugbee-notification-icon">{icon(kind)}</span>
                                                    <span>{message}</span>
                                                    <time class="bugbee-hint">{when}</time>
                                                </li>
                                            }
                                        })
                                        .collect::<Vec<_>>()
                                        .into_any()
                                }
                            }
                        </ul>
                    </div>
                </Show>
                }
                }
            </div>
        </Show>
    }
}
