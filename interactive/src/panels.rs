//! Resizable panes. Sizes are percentages of the surrounding container.

use bugbee_core::layout;
use leptos::html::Div;
use leptos::prelude::*;

use crate::state::{read_cookies, write_cookie};

/// Keyboard step for the pane divider, in percent.
const KEY_STEP: f64 = 2.0;

fn percent_across(container: &web_sys::Element, client_x: i32) -> Option<f64> {
    let rect = container.get_bounding_client_rect();
    (rect.width() > 0.0).then(|| (f64::from(client_x) - rect.left()) / rect.width() * 100.0)
}

/// Vertical divider. Reports the pointer position across `container` while
/// dragged, and `on_release` once the pointer lets go.
#[component]
pub fn DragHandle(
    container: NodeRef<Div>,
    #[prop(into)] on_drag: Callback<f64>,
    #[prop(into)] on_release: Callback<()>,
    #[prop(into, optional)] on_step: Option<Callback<f64>>,
) -> impl IntoView {
    let handle = NodeRef::<Div>::new();
    let dragging = RwSignal::new(false);

    view! {
        <div
            class="bugbee-resize-handle"
            class:bugbee-dragging=move || dragging.get()
            node_ref=handle
            role="separator"
            tabindex="0"
            on:pointerdown=move |ev| {
                if let Some(el) = handle.get_untracked() {
                    let _ = el.set_pointer_capture(ev.pointer_id());
                }
                dragging.set(true);
            }
            on:pointermove=move |ev| {
                if !dragging.get_untracked() {
                    return;
                }
                let percent = container
                    .get_untracked()
                    .and_then(|c| percent_across(&c, ev.client_x()));
                if let Some(percent) = percent {
                    on_drag.run(percent);
                }
            }
            on:pointerup=move |_| {
                if dragging.get_untracked() {
                    dragging.set(false);
                    on_release.run(());
                }
            }
            on:keydown=move |ev| {
                let Some(on_step) = on_step else {
                    return;
                };
                let delta = match ev.key().as_str() {
                    "ArrowLeft" => -KEY_STEP,
                    "ArrowRight" => KEY_STEP,
                    _ => return,
                };
                ev.prevent_default();
                on_step.run(delta);
                on_release.run(());
            }
        ></div>
    }
}

/// List and detail side by side. The split persists in the layout cookie.
#[component]
pub fn SplitPanes(#[prop(into)] list: ViewFn, #[prop(into)] detail: ViewFn) -> impl IntoView {
    let container = NodeRef::<Div>::new();
    let sizes = RwSignal::new(layout::read_layout(&read_cookies()));

    let persist = move |_: ()| write_cookie(&layout::layout_cookie(sizes.get_untracked()));

    view! {
        <div class="bugbee-panes" node_ref=container>
            <section
                class="bugbee-pane bugbee-pane-list"
                style=move || format!("flex-basis: {}%", sizes.get()[0])
            >
                {list.run()}
            </section>
            <DragHandle
                container=container
                on_drag=Callback::new(move |percent: f64| sizes.set(layout::resize_to(percent)))
                on_release=Callback::new(persist)
                on_step=Callback::new(move |delta: f64| sizes.update(|s| *s = layout::resize(*s, delta)))
            />
            <section
                class="bugbee-pane bugbee-pane-detail"
                style=move || format!("flex-basis: {}%", sizes.get()[1])
            >
                {detail.run()}
            </section>
        </div>
    }
}
