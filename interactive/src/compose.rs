//! Create and edit forms for questions and answers.

use bugbee_core::dialog::{self, ComposeDialog, DialogKind, Intent, Submitted, Subject};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::editor::RichEditor;
use crate::render::RichContent;
use crate::state::use_toaster;

/// One form driven by a [`ComposeDialog`]. Shown while the dialog is open;
/// `modal` wraps it in an overlay. Edits render a live preview beside the
/// editor. `on_done` runs after a successful
/// submit, once the dialog has closed.
#[component]
pub fn ComposeForm(
    dialog: RwSignal<ComposeDialog>,
    #[prop(into)] on_done: Callback<Submitted>,
    #[prop(optional)] modal: bool,
) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let toaster = use_toaster();

    let kind = move || dialog.with(|d| d.kind().clone());
    let heading = move || match kind() {
        DialogKind::NewQuestion => "Ask a question",
        DialogKind::EditQuestion(_) => "Edit question",
        DialogKind::NewAnswer { .. } => "Your answer",
        DialogKind::EditAnswer(_) => "Edit answer",
    };
    let has_title = move || kind().subject() == Subject::Question;
    let has_tags = move || kind() == DialogKind::NewQuestion;
    let submitting = move || dialog.with(|d| d.is_submitting());
    let has_preview = move || kind().intent() == Intent::Edit;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(Ok(submission)) = dialog.try_update(|d| d.begin_submit()) else {
            return;
        };
        let api = api.clone();
        spawn_local(async move {
            let result = dialog::send(&api, submission).await;
            match dialog.try_update(|d| d.finish(result)) {
                Some(Ok(done)) => {
                    toaster.success(done.success_message());
                    on_done.run(done);
                }
                Some(Err(failure)) => toaster.error(failure.message),
                None => {}
            }
        });
    };

    // Built without tracked reads so the editor survives content changes.
    let form = move || {
        let initial = dialog.with_untracked(|d| d.content().to_string());
        let asks_question = dialog.with_untracked(|d| d.kind().subject() == Subject::Question);
        let placeholder = if asks_question {
            "Describe your problem in detail..."
        } else {
            "Write your answer here..."
        };
        view! {
            <form class="bugbee-compose" on:submit=on_submit.clone()>
                <header class="bugbee-dialog-header">
                    <h3>{heading}</h3>
                    <Show when=move || modal>
                        <button
                            type="button"
                            class="bugbee-btn bugbee-btn-sm"
                            on:click=move |_| dialog.update(|d| d.close())
                        >
                            "Close"
                        </button>
                    </Show>
                </header>
                <Show when=has_title>
                    <input
                        class="bugbee-input"
                        placeholder="Title"
                        prop:value=move || dialog.with(|d| d.title.clone())
                        on:input=move |ev| dialog.update(|d| d.title = event_target_value(&ev))
                        disabled=submitting
                    />
                </Show>
                <div class="bugbee-compose-body" class:bugbee-with-preview=has_preview>
                    <RichEditor
                        initial=initial
                        on_change=Callback::new(move |html: String| dialog.update(|d| d.set_content(&html)))
                        disabled=Signal::derive(move || !dialog.with(|d| d.editor_enabled()))
                        placeholder=placeholder
                    />
                    <Show when=has_preview>
                        <aside class="bugbee-preview">
                            <h4 class="bugbee-hint">"Preview"</h4>
                            {move || {
                                let html = dialog.with(|d| d.preview().map(str::to_string));
                                view! { <RichContent html=html /> }
                            }}
                        </aside>
                    </Show>
                </div>
                <Show when=has_tags>
                    <input
                        class="bugbee-input"
                        placeholder="Tags, comma separated"
                        prop:value=move || dialog.with(|d| d.tags.clone())
                        on:input=move |ev| dialog.update(|d| d.tags = event_target_value(&ev))
                        disabled=submitting
                    />
                </Show>
                {move || {
                    dialog
                        .with(|d| d.error().map(str::to_string))
                        .map(|message| view! { <p class="bugbee-error">{message}</p> })
                }}
                <div class="bugbee-form-actions">
                    <button
                        type="submit"
                        class="bugbee-btn bugbee-btn-primary"
                        disabled=submitting
                        class:bugbee-btn-muted=move || !dialog.with(|d| d.can_submit())
                    >
                        {move || if submitting() { "Posting..." } else { "Submit" }}
                    </button>
                </div>
            </form>
        }
    };

    view! {
        <Show when=move || dialog.with(|d| d.is_open())>
            <div class=if modal { "bugbee-overlay" } else { "bugbee-inline-form" }>
                <div class=if modal { "bugbee-dialog" } else { "bugbee-panel" }>{form.clone()}</div>
            </div>
        </Show>
    }
}

/// "Are you sure?" prompt for destructive actions. Open while `open` holds.
#[component]
pub fn ConfirmDialog(
    open: RwSignal<bool>,
    #[prop(into)] description: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="bugbee-overlay">
                <div class="bugbee-dialog bugbee-confirm" role="alertdialog">
                    <h3>"Are you sure?"</h3>
                    <p class="bugbee-hint">{description.clone()}</p>
                    <div class="bugbee-form-actions">
                        <button class="bugbee-btn" on:click=move |_| open.set(false)>
                            "Cancel"
                        </button>
                        <button
                            class="bugbee-btn bugbee-btn-danger"
                            on:click=move |_| {
                                open.set(false);
                                on_confirm.run(());
                            }
                        >
                            "Delete"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
