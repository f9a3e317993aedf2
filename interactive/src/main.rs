mod about;
mod api;
mod auth;
mod compose;
mod editor;
mod explore;
mod my_questions;
mod notifications;
mod panels;
mod profile;
mod question_view;
mod render;
mod shell;
mod state;
mod votes;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let config = api::load_config();
    tracing::info!(api = %config.api_base, "starting BugBee");

    let app = move || {
        state::provide_state();
        view! {
            <auth::SessionProvider config=config.clone()>
                <shell::App />
            </auth::SessionProvider>
        }
    };

    // Mount into the dedicated element when the page has one.
    let mount_point = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("bugbee-app"));
    match mount_point {
        Some(el) => {
            let html_el: web_sys::HtmlElement = el.unchecked_into();
            leptos::mount::mount_to(html_el, app).forget();
        }
        None => leptos::mount::mount_to_body(app),
    }
}
