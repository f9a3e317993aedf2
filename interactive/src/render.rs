//! Renders stored rich text from typed nodes. Only syntax-highlighted code,
//! produced locally from escaped text, goes through `inner_html`.

use bugbee_core::content::{
    self, CodeSample, InlineTag, Node, LINK_REL, LINK_TARGET, ORDERED_LIST_CLASS, QUOTE_CLASS,
    UNORDERED_LIST_CLASS,
};
use leptos::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::js_sys::{Function, Promise, Reflect};

use crate::state::use_toaster;

async fn copy_to_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = Reflect::get(&window.navigator(), &"clipboard".into())?;
    let write: Function = Reflect::get(&clipboard, &"writeText".into())?.dyn_into()?;
    let promise: Promise = write.call1(&clipboard, &text.into())?.dyn_into()?;
    JsFuture::from(promise).await.map(drop)
}

#[component]
pub fn RichContent(#[prop(into)] html: Option<String>) -> impl IntoView {
    let nodes = content::parse(html.as_deref());
    view! { <div class="bugbee-content">{render_nodes(nodes)}</div> }
}

fn render_nodes(nodes: Vec<Node>) -> Vec<AnyView> {
    nodes.into_iter().map(render_node).collect()
}

fn render_node(node: Node) -> AnyView {
    match node {
        Node::Text(text) => text.into_any(),
        Node::Break => view! { <br /> }.into_any(),
        Node::Rule => view! { <hr /> }.into_any(),
        Node::Inline(tag, children) => {
            let children = render_nodes(children);
            match tag {
                InlineTag::Bold => view! { <strong>{children}</strong> }.into_any(),
                InlineTag::Italic => view! { <em>{children}</em> }.into_any(),
                InlineTag::Strike => view! { <s>{children}</s> }.into_any(),
                InlineTag::Underline => view! { <u>{children}</u> }.into_any(),
                InlineTag::Code => view! { <code class="bugbee-inline-code">{children}</code> }.into_any(),
            }
        }
        Node::Heading(level, children) => {
            let children = render_nodes(children);
            match level {
                1 => view! { <h1>{children}</h1> }.into_any(),
                2 => view! { <h2>{children}</h2> }.into_any(),
                3 => view! { <h3>{children}</h3> }.into_any(),
                4 => view! { <h4>{children}</h4> }.into_any(),
                5 => view! { <h5>{children}</h5> }.into_any(),
                _ => view! { <h6>{children}</h6> }.into_any(),
            }
        }
        Node::Paragraph(children) => view! { <p>{render_nodes(children)}</p> }.into_any(),
        Node::List { ordered, items } => {
            let items = items
                .into_iter()
                .map(|item| view! { <li>{render_nodes(item)}</li> })
                .collect::<Vec<_>>();
            if ordered {
                view! { <ol class=ORDERED_LIST_CLASS>{items}</ol> }.into_any()
            } else {
                view! { <ul class=UNORDERED_LIST_CLASS>{items}</ul> }.into_any()
            }
        }
        Node::Quote(children) => {
            view! { <blockquote class=QUOTE_CLASS>{render_nodes(children)}</blockquote> }.into_any()
        }
        Node::Link { href, children } => view! {
            <a href=href target=LINK_TARGET rel=LINK_REL class="bugbee-link">
                {render_nodes(children)}
            </a>
        }
        .into_any(),
        Node::Image { src, alt } => view! { <ImagePreview src=src alt=alt /> }.into_any(),
        Node::Code(sample) => view! { <CodeBlock sample=sample /> }.into_any(),
    }
}

/// Inline image that opens an enlarged overlay when clicked.
#[component]
fn ImagePreview(src: String, alt: String) -> impl IntoView {
    let open = RwSignal::new(false);
    let (overlay_src, overlay_alt) = (src.clone(), alt.clone());

    view! {
        <button class="bugbee-image-trigger" on:click=move |_| open.set(true)>
            <img src=src alt=alt class="bugbee-image" />
        </button>
        <Show when=move || open.get()>
            <div class="bugbee-overlay" on:click=move |_| open.set(false)>
                <img src=overlay_src.clone() alt=overlay_alt.clone() class="bugbee-image-large" />
            </div>
        </Show>
    }
}

/// A code region, shown as a labelled button that opens a dialog with
/// highlighted, numbered lines and a copy action.
#[component]
fn CodeBlock(sample: CodeSample) -> impl IntoView {
    let toaster = use_toaster();
    let open = RwSignal::new(false);
    let label = sample.label();
    let source = StoredValue::new(sample.source.clone());
    let highlighted = Memo::new(move |_| {
        open.get().then(|| content::highlight(&sample))
    });

    let on_copy = move |_| {
        let text = source.get_value();
        spawn_local(async move {
            match copy_to_clipboard(&text).await {
                Ok(()) => toaster.success("Code copied to clipboard"),
                Err(err) => {
                    tracing::warn!(?err, "clipboard write failed");
                    toaster.error("Failed to copy code");
                }
            }
        });
    };

    view! {
        <button class="bugbee-code-trigger" on:click=move |_| open.set(true)>
            <span class="bugbee-code-label">{label.clone()}</span>
            " View code"
        </button>
        <Show when=move || open.get()>
            <div class="bugbee-overlay">
                <div class="bugbee-dialog bugbee-code-dialog">
                    <header class="bugbee-dialog-header">
                        <span class="bugbee-code-label">
                            {move || highlighted.get().map(|h| h.label).unwrap_or_default()}
                        </span>
                        <button class="bugbee-btn bugbee-btn-sm" on:click=on_copy>"Copy"</button>
                        <button class="bugbee-btn bugbee-btn-sm" on:click=move |_| open.set(false)>
                            "Close"
                        </button>
                    </header>
                    <pre class="bugbee-code">
                        {move || {
                            highlighted
                                .get()
                                .map(|h| h.lines)
                                .unwrap_or_default()
                                .into_iter()
                                .enumerate()
                                .map(|(n, line)| view! {
                                    <div class="bugbee-code-line">
                                        <span class="bugbee-line-number">{n + 1}</span>
                                        <span inner_html=line></span>
                                    </div>
                                })
                                .collect::<Vec<_>>()
                        }}
                    </pre>
                </div>
            </div>
        </Show>
    }
}
