use std::sync::atomic::{AtomicBool, Ordering};

use bugbee_core::config::ClientConfig;
use bugbee_core::store::Action;
use bugbee_core::ForumApi;
use leptos::html::Div;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::{global, Object, Reflect};

use crate::api::HttpApi;
use crate::state::{use_store, use_toaster};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize)]
    fn gsi_initialize(config: &JsValue);

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton)]
    fn gsi_render_button(parent: &web_sys::HtmlElement, options: &JsValue);
}

/// Whether the Google Identity Services script has loaded.
fn gsi_available() -> bool {
    Reflect::get(&global(), &"google".into())
        .map(|g| !g.is_undefined())
        .unwrap_or(false)
}

/// Set once the page has a Google client, whichever button mounted first.
struct SetupLatch(AtomicBool);

impl SetupLatch {
    const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// True for the first caller only.
    fn claim(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

static GSI_SETUP: SetupLatch = SetupLatch::new();

fn js_object(entries: &[(&str, JsValue)]) -> JsValue {
    let obj = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&obj, &(*key).into(), value);
    }
    obj.into()
}

/// Resolves the session once on mount and provides the API client.
#[component]
pub fn SessionProvider(config: ClientConfig, children: Children) -> impl IntoView {
    let api = HttpApi::new(config.clone());
    provide_context(config);
    provide_context(api.clone());

    let store = use_store();
    spawn_local(async move {
        match api.session().await {
            Ok(user) => store.dispatch(Action::SetUser(Some(user))),
            Err(err) => {
                tracing::debug!(%err, "no active session");
                store.dispatch(Action::SetUser(None));
            }
        }
    });

    children()
}

/// The Google sign-in button. The credential it yields is exchanged for a
/// session cookie at `/signin`. The client is initialized by the first
/// button to mount; later mounts only render.
#[component]
pub fn GoogleSignIn() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let config = expect_context::<ClientConfig>();
    let store = use_store();
    let toaster = use_toaster();
    let container = NodeRef::<Div>::new();

    let on_credential = move |response: JsValue| {
        let credential = Reflect::get(&response, &"credential".into())
            .ok()
            .and_then(|c| c.as_string());
        let Some(credential) = credential else {
            toaster.error("Failed to sign in. Please try again.");
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            match api.sign_in(&credential).await {
                Ok(user) => {
                    store.dispatch(Action::SignedIn(user));
                    toaster.success("Successfully signed in!");
                }
                Err(err) => {
                    tracing::warn!(%err, "sign-in failed");
                    toaster.error("Failed to sign in. Please try again.");
                }
            }
        });
    };

    Effect::new(move |_| {
        let Some(el) = container.get() else {
            return;
        };
        if !gsi_available() || config.google_client_id.is_empty() {
            tracing::warn!("Google Identity Services unavailable, sign-in button not rendered");
            return;
        }
        if GSI_SETUP.claim() {
            let callback = Closure::<dyn FnMut(JsValue)>::new(on_credential.clone());
            gsi_initialize(&js_object(&[
                ("client_id", config.google_client_id.clone().into()),
                ("callback", callback.as_ref().clone()),
            ]));
            callback.forget();
        }
        gsi_render_button(
            &el,
            &js_object(&[
                ("theme", "filled_black".into()),
                ("shape", "pill".into()),
                ("size", "large".into()),
            ]),
        );
    });

    view! { <div class="bugbee-google-signin" node_ref=container></div> }
}

/// Card shown in place of features that need a session.
#[component]
pub fn SignInCard(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="bugbee-card bugbee-signin-card">
            <h3>"Welcome to BugBee"</h3>
            <p class="bugbee-hint">{message}</p>
            <GoogleSignIn />
        </div>
    }
}

#[component]
pub fn SignOutButton() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let navigate = use_navigate();
    let busy = RwSignal::new(false);

    let on_click = move |_| {
        busy.set(true);
        let api = api.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api.sign_out().await {
                Ok(()) => {
                    store.dispatch(Action::SignedOut);
                    navigate("/", Default::default());
                    toaster.success("Signed out!");
                }
                Err(err) => {
                    tracing::warn!(%err, "sign-out failed");
                    toaster.error("Failed to sign out. Please try again.");
                }
            }
            busy.set(false);
        });
    };

    view! {
        <button class="bugbee-btn bugbee-btn-ghost" on:click=on_click disabled=move || busy.get()>
            "Sign out"
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_latch_is_claimed_once() {
        let latch = SetupLatch::new();
        assert!(latch.claim());
        assert!(!latch.claim());
        assert!(!latch.claim());
    }
}
