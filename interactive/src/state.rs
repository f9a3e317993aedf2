use bugbee_core::store::{Action, Store};
use bugbee_core::toast::{ToastKind, Toasts, TOAST_DURATION};
use bugbee_core::vote::{VoteTarget, VotedItems};
use bugbee_core::ForumApi;
use bugbee_shared::{EntityId, User, VoteKind};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlDocument;

use crate::api::HttpApi;

/// The application store behind a signal. All writes go through `dispatch`.
#[derive(Clone, Copy)]
pub struct AppStore(RwSignal<Store>);

impl AppStore {
    pub fn dispatch(&self, action: Action) {
        tracing::debug!(?action, "dispatch");
        self.0.update(|store| store.dispatch(action));
    }

    pub fn with<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        self.0.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        self.0.with_untracked(f)
    }

    pub fn user(&self) -> Option<User> {
        self.0.with(|s| s.auth.user.clone())
    }

    pub fn signed_in(&self) -> bool {
        self.0.with(|s| s.auth.user.is_some())
    }

    pub fn signed_in_untracked(&self) -> bool {
        self.0.with_untracked(|s| s.auth.user.is_some())
    }

    pub fn is_own(&self, author: Option<&EntityId>) -> bool {
        self.0.with(|s| s.is_own(author))
    }
}

#[derive(Clone, Copy)]
pub struct Toaster(RwSignal<Toasts>);

impl Toaster {
    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.0.try_update(|t| t.push(kind, message));
        let toasts = self.0;
        if let Some(id) = id {
            spawn_local(async move {
                gloo_timers::future::sleep(TOAST_DURATION).await;
                toasts.try_update(|t| t.dismiss(id));
            });
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.0.update(|t| t.dismiss(id));
    }

    pub fn items(&self) -> Vec<bugbee_core::toast::Toast> {
        self.0.with(|t| t.items().to_vec())
    }
}

/// Items voted on in this page session.
#[derive(Clone, Copy)]
pub struct Voted(RwSignal<VotedItems>);

impl Voted {
    pub fn has_voted(&self, target: VoteTarget, id: &EntityId) -> bool {
        self.0.with(|v| v.has_voted(target, id))
    }

    pub fn mark(&self, target: VoteTarget, id: EntityId, kind: VoteKind) {
        self.0.update(|v| v.mark(target, id, kind));
    }
}

/// Reload the full question list.
pub async fn refresh_questions(api: &HttpApi, store: AppStore) {
    store.dispatch(Action::QuestionsLoading(true));
    match api.questions().await {
        Ok(list) => store.dispatch(Action::QuestionsLoaded(list)),
        Err(err) => {
            tracing::warn!(%err, "loading questions failed");
            store.dispatch(Action::QuestionsFailed("Failed to fetch questions".into()));
        }
    }
}

/// Reload the signed-in user's own questions. No-op when signed out.
pub async fn refresh_my_questions(api: &HttpApi, store: AppStore) {
    if !store.signed_in_untracked() {
        return;
    }
    match api.my_questions().await {
        Ok(list) => store.dispatch(Action::MyQuestionsLoaded(list)),
        Err(err) => tracing::warn!(%err, "loading own questions failed"),
    }
}

pub fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

pub fn read_cookies() -> String {
    html_document()
        .and_then(|doc| doc.cookie().ok())
        .unwrap_or_default()
}

pub fn write_cookie(cookie: &str) {
    if let Some(Err(err)) = html_document().map(|doc| doc.set_cookie(cookie)) {
        tracing::warn!(?err, "could not persist cookie");
    }
}

pub fn provide_state() {
    provide_context(AppStore(RwSignal::new(Store::default())));
    provide_context(Toaster(RwSignal::new(Toasts::default())));
    provide_context(Voted(RwSignal::new(VotedItems::default())));
}

pub fn use_store() -> AppStore {
    expect_context::<AppStore>()
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}

pub fn use_voted() -> Voted {
    expect_context::<Voted>()
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();
    view! {
        <div class="bugbee-toasts" role="status">
            <For each=move || toaster.items() key=|t| t.id let:toast>
                <div
                    class="bugbee-toast"
                    class:bugbee-toast-success={toast.kind == ToastKind::Success}
                    class:bugbee-toast-error={toast.kind == ToastKind::Error}
                    on:click=move |_| toaster.dismiss(toast.id)
                >
                    {toast.message.clone()}
                </div>
            </For>
        </div>
    }
}
