//! Rich-text editor over a `contenteditable` surface.
//!
//! Formatting goes through `document.execCommand`; every change is read back
//! from the surface, sanitized and handed to `on_change`.

use bugbee_core::content;
use leptos::html::{Div, Input};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::FileReader;

use crate::state::html_document;

fn exec(command: &str, value: Option<&str>) {
    let Some(doc) = html_document() else {
        return;
    };
    let result = match value {
        Some(value) => doc.exec_command_with_show_ui_and_value(command, false, value),
        None => doc.exec_command(command),
    };
    if let Err(err) = result {
        tracing::warn!(?err, command, "editor command failed");
    }
}

fn prompt(message: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message(message)
        .ok()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn selected_text() -> String {
    web_sys::window()
        .and_then(|w| w.get_selection().ok().flatten())
        .map(|s| String::from(s.to_string()))
        .unwrap_or_default()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tool {
    Bold,
    Italic,
    Strike,
    InlineCode,
    Heading(u8),
    Bullets,
    Numbers,
    Quote,
    CodeBlock,
    Link,
    ImageUrl,
    Undo,
    Redo,
}

const TOOLBAR: &[Tool] = &[
    Tool::Bold,
    Tool::Italic,
    Tool::Strike,
    Tool::InlineCode,
    Tool::Heading(1),
    Tool::Heading(2),
    Tool::Heading(3),
    Tool::Bullets,
    Tool::Numbers,
    Tool::Quote,
    Tool::CodeBlock,
    Tool::Link,
    Tool::ImageUrl,
    Tool::Undo,
    Tool::Redo,
];

impl Tool {
    fn label(self) -> &'static str {
        match self {
            Tool::Bold => "B",
            Tool::Italic => "I",
            Tool::Strike => "S",
            Tool::InlineCode => "</>",
            Tool::Heading(1) => "H1",
            Tool::Heading(2) => "H2",
            Tool::Heading(_) => "H3",
            Tool::Bullets => "\u{2022} List",
            Tool::Numbers => "1. List",
            Tool::Quote => "\u{201C}",
            Tool::CodeBlock => "Code",
            Tool::Link => "Link",
            Tool::ImageUrl => "Image",
            Tool::Undo => "\u{21B6}",
            Tool::Redo => "\u{21B7}",
        }
    }

    fn apply(self) {
        match self {
            Tool::Bold => exec("bold", None),
            Tool::Italic => exec("italic", None),
            Tool::Strike => exec("strikeThrough", None),
            Tool::InlineCode => {
                let text = selected_text();
                if !text.is_empty() {
                    exec("insertHTML", Some(&format!("<code>{}</code>", content::escape(&text))));
                }
            }
            Tool::Heading(level) => exec("formatBlock", Some(&format!("<h{level}>"))),
            Tool::Bullets => exec("insertUnorderedList", None),
            Tool::Numbers => exec("insertOrderedList", None),
            Tool::Quote => exec("formatBlock", Some("<blockquote>")),
            Tool::CodeBlock => exec("formatBlock", Some("<pre>")),
            Tool::Link => {
                if let Some(url) = prompt("Link URL") {
                    exec("createLink", Some(&url));
                }
            }
            Tool::ImageUrl => {
                if let Some(url) = prompt("Image URL") {
                    exec("insertImage", Some(&url));
                }
            }
            Tool::Undo => exec("undo", None),
            Tool::Redo => exec("redo", None),
        }
    }
}

#[component]
pub fn RichEditor(
    #[prop(into)] initial: String,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into, default = false.into())] disabled: Signal<bool>,
    #[prop(into, optional)] placeholder: String,
) -> impl IntoView {
    let surface = NodeRef::<Div>::new();
    let file_input = NodeRef::<Input>::new();

    let initial = content::sanitize(&initial);
    Effect::new(move |_| {
        if let Some(el) = surface.get() {
            el.set_inner_html(&initial);
        }
    });

    let emit = move || {
        if let Some(el) = surface.get_untracked() {
            on_change.run(content::sanitize(&el.inner_html()));
        }
    };

    let run_tool = move |tool: Tool| {
        if disabled.get_untracked() {
            return;
        }
        if let Some(el) = surface.get_untracked() {
            let _ = el.focus();
        }
        tool.apply();
        emit();
    };

    let on_file = move |_| {
        let Some(input) = file_input.get_untracked() else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Ok(reader) = FileReader::new() else {
            return;
        };
        let result_reader = reader.clone();
        let onload = Closure::once_into_js(move || {
            if let Some(url) = result_reader.result().ok().and_then(|v| v.as_string()) {
                if let Some(el) = surface.get_untracked() {
                    let _ = el.focus();
                }
                exec("insertImage", Some(&url));
                emit();
            }
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        if let Err(err) = reader.read_as_data_url(&file) {
            tracing::warn!(?err, "could not read image file");
        }
        input.set_value("");
    };

    view! {
        <div class="bugbee-editor" class:bugbee-editor-disabled=move || disabled.get()>
            <div class="bugbee-toolbar" role="toolbar">
                {TOOLBAR
                    .iter()
                    .map(|&tool| {
                        view! {
                            <button
                                type="button"
                                class="bugbee-tool"
                                disabled=move || disabled.get()
                                on:mousedown=|ev| ev.prevent_default()
                                on:click=move |_| run_tool(tool)
                            >
                                {tool.label()}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
                <label class="bugbee-tool">
                    "Upload"
                    <input
                        type="file"
                        accept="image/*"
                        class="bugbee-hidden"
                        node_ref=file_input
                        disabled=move || disabled.get()
                        on:change=on_file
                    />
                </label>
            </div>
            <div
                class="bugbee-editor-surface"
                node_ref=surface
                contenteditable=move || if disabled.get() { "false" } else { "true" }
                data-placeholder=placeholder
                on:input=move |_| emit()
            ></div>
        </div>
    }
}
