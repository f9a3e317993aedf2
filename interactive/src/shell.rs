//! Application frame: router, sidebar, header and toasts.

use bugbee_core::dialog::{ComposeDialog, Submitted};
use bugbee_core::layout::{self, NAV_COLLAPSED_SIZE, NAV_MAX_SIZE};
use bugbee_core::store::Action;
use leptos::html::Div;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use wasm_bindgen_futures::spawn_local;

use crate::about::AboutPage;
use crate::api::HttpApi;
use crate::auth::{GoogleSignIn, SignOutButton};
use crate::compose::ComposeForm;
use crate::explore::ExplorePage;
use crate::my_questions::MyQuestionsPage;
use crate::notifications::NotificationBell;
use crate::panels::DragHandle;
use crate::profile::{Avatar, OwnProfilePage, PublicProfilePage};
use crate::state::{
    read_cookies, refresh_my_questions, refresh_questions, use_store, use_toaster, write_cookie,
    ToastHost,
};

#[component]
fn Sidebar(root: NodeRef<Div>) -> impl IntoView {
    let store = use_store();
    let collapsed = Memo::new(move |_| store.with(|s| s.app.sidebar_collapsed));
    let size = RwSignal::new(NAV_MAX_SIZE);

    let persist = move || write_cookie(&layout::collapsed_cookie(collapsed.get_untracked()));
    let on_drag = move |percent: f64| {
        if layout::sidebar_should_toggle(percent, collapsed.get_untracked()) {
            store.dispatch(Action::ToggleSidebar);
        }
        if !collapsed.get_untracked() {
            size.set(layout::clamp_sidebar(percent));
        }
    };
    let width = move || {
        let percent = if collapsed.get() { NAV_COLLAPSED_SIZE } else { size.get() };
        format!("flex-basis: {percent}%")
    };

    let question_count = move || store.with(|s| s.questions.list.len());
    let my_count = move || store.with(|s| s.user().map(|_| s.questions.mine.len()));

    view! {
        <nav class="bugbee-sidebar" class:bugbee-collapsed=move || collapsed.get() style=width>
            <div class="bugbee-brand">
                <span>"\u{1F41E}"</span>
                <Show when=move || !collapsed.get()>
                    <span>"BugBee"</span>
                </Show>
            </div>
            <A href="/">
                <span class="bugbee-nav-label">"Explore Questions"</span>
                <span class="bugbee-count">{question_count}</span>
            </A>
            <Show when=move || my_count().is_some()>
                <A href="/myquestions">
                    <span class="bugbee-nav-label">"My Questions"</span>
                    <span class="bugbee-count">{move || my_count().unwrap_or_default()}</span>
                </A>
            </Show>
            <A href="/profile">
                <span class="bugbee-nav-label">"Profile"</span>
            </A>
            <A href="/about">
                <span class="bugbee-nav-label">"About"</span>
            </A>
            <button
                class="bugbee-btn bugbee-btn-ghost bugbee-collapse"
                on:click=move |_| {
                    store.dispatch(Action::ToggleSidebar);
                    persist();
                }
            >
                {move || if collapsed.get() { "\u{00BB}" } else { "\u{00AB}" }}
            </button>
        </nav>
        <DragHandle container=root on_drag=Callback::new(on_drag) on_release=Callback::new(move |_: ()| persist()) />
    }
}

#[component]
fn Header() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let dialog = RwSignal::new(ComposeDialog::question());
    let user = Memo::new(move |_| store.user());

    let on_create = move |_| {
        if !store.signed_in_untracked() {
            toaster.info("You need to be logged in to create a question.");
            return;
        }
        dialog.update(|d| d.open());
    };
    let on_created = move |_: Submitted| {
        let api = api.clone();
        spawn_local(async move {
            refresh_questions(&api, store).await;
            refresh_my_questions(&api, store).await;
        });
    };

    view! {
        <header class="bugbee-header">
            <button class="bugbee-btn bugbee-btn-primary" on:click=on_create>
                "Ask a question"
            </button>
            <div class="bugbee-header-end">
                <NotificationBell />
                {move || match user.get() {
                    Some(user) => view! {
                        <A href="/profile">
                            <Avatar picture=user.picture.clone() name=user.name.clone() />
                        </A>
                        <SignOutButton />
                    }
                        .into_any(),
                    None => view! { <GoogleSignIn /> }.into_any(),
                }}
            </div>
            <ComposeForm dialog=dialog on_done=Callback::new(on_created) modal=true />
        </header>
    }
}

#[component]
pub fn App() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let root = NodeRef::<Div>::new();

    store.dispatch(Action::SetSidebarCollapsed(layout::read_collapsed(&read_cookies())));
    {
        let api = api.clone();
        spawn_local(async move { refresh_questions(&api, store).await });
    }

    let signed_in = Memo::new(move |_| store.signed_in());
    Effect::new(move |_| {
        if signed_in.get() {
            let api = api.clone();
            spawn_local(async move { refresh_my_questions(&api, store).await });
        }
    });

    view! {
        <Router>
            <div class="bugbee-app" node_ref=root>
                <Sidebar root=root />
                <div class="bugbee-main">
                    <Header />
                    <main class="bugbee-content-area">
                        <Routes fallback=|| view! { <p>"Page not found."</p> }>
                            <Route path=path!("/") view=ExplorePage />
                            <Route path=path!("/myquestions") view=MyQuestionsPage />
                            <Route path=path!("/profile") view=OwnProfilePage />
                            <Route path=path!("/profile/:id") view=PublicProfilePage />
                            <Route path=path!("/about") view=AboutPage />
                        </Routes>
                    </main>
                </div>
            </div>
            <ToastHost />
        </Router>
    }
}
