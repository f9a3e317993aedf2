//! Question detail: body, votes, author card and answers.

use bugbee_core::config::ClientConfig;
use bugbee_core::dialog::{ComposeDialog, Submitted};
use bugbee_core::profile::{ProfileView, PRIVATE_PROFILE};
use bugbee_core::store::Action;
use bugbee_core::sync::{self, Epoch};
use bugbee_core::{time, ForumApi};
use bugbee_shared::{Answer, Author, EntityId, Question};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::auth::SignInCard;
use crate::compose::{ComposeForm, ConfirmDialog};
use crate::profile::Avatar;
use crate::render::RichContent;
use crate::state::{refresh_my_questions, refresh_questions, use_store, use_toaster};
use crate::votes::{AnswerVotes, QuestionVotes};

#[component]
pub fn QuestionView(id: EntityId, #[prop(into)] on_deleted: Callback<()>) -> impl IntoView {
    let store = use_store();
    view! {
        <Show
            when=move || store.signed_in()
            fallback=|| view! { <SignInCard message="Please log in or sign up to view question" /> }
        >
            <QuestionDetail id=id.clone() on_deleted=on_deleted />
        </Show>
    }
}

/// Hover card with the author's public profile, fetched on first hover.
#[component]
fn AuthorCard(author: Option<Author>, user_id: Option<EntityId>) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let toaster = use_toaster();
    let profile = RwSignal::new(ProfileView::Loading);
    let requested = RwSignal::new(false);
    let hovering = RwSignal::new(false);

    let name = author
        .as_ref()
        .map(|a| a.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unknown user".to_string());
    let picture = author.as_ref().and_then(|a| a.picture.clone());
    let id = user_id.or_else(|| author.and_then(|a| a.id));
    let href = id
        .as_ref()
        .map_or_else(|| "#".to_string(), |id| format!("/profile/{id}"));

    let on_enter = move |_| {
        hovering.set(true);
        let Some(id) = id.clone() else {
            return;
        };
        if requested.get_untracked() {
            return;
        }
        requested.set(true);
        let api = api.clone();
        spawn_local(async move {
            profile.set(ProfileView::from_result(api.public_profile(&id).await));
        });
    };
    let on_link = move |ev: leptos::ev::MouseEvent| {
        if profile.with_untracked(|p| *p == ProfileView::Private) {
            ev.prevent_default();
            toaster.error(PRIVATE_PROFILE);
        }
    };

    let card_name = name.clone();
    let card_picture = picture.clone();
    let card = move || {
        let fallback_name = card_name.clone();
        let fallback_picture = card_picture.clone();
        profile.with(|state| match state {
            ProfileView::Loaded(user) => view! {
                <div class="bugbee-hovercard-body">
                    <Avatar
                        picture=user.picture.clone().or(fallback_picture)
                        name=user.name.clone()
                    />
                    <div>
                        <h4>{user.name.clone()}</h4>
                        <p>{user.about.clone().unwrap_or_else(|| "No bio available".into())}</p>
                        <p>{format!("Question Asked : {}", user.questions_asked)}</p>
                        <p>{format!("Question Answered : {}", user.answers_provided)}</p>
                        <span class="bugbee-hint">
                            {format!(
                                "Joined {}",
                                time::relative_opt(user.created_at.as_deref(), chrono::Utc::now()),
                            )}
                        </span>
                    </div>
                </div>
            }
            .into_any(),
            other => view! {
                <div class="bugbee-hovercard-body">
                    <Avatar picture=fallback_picture name=fallback_name.clone() />
                    <div>
                        <h4>{fallback_name}</h4>
                        <p class="bugbee-hint">{other.message().unwrap_or("Loading...")}</p>
                    </div>
                </div>
            }
            .into_any(),
        })
    };

    view! {
        <div
            class="bugbee-author"
            on:mouseenter=on_enter
            on:mouseleave=move |_| hovering.set(false)
        >
            <a href=href on:click=on_link class="bugbee-author-link">
                <Avatar picture=picture name=name.clone() />
                <span>{name}</span>
            </a>
            <Show when=move || hovering.get()>
                <div class="bugbee-hovercard">{card.clone()}</div>
            </Show>
        </div>
    }
}

#[component]
fn AnswerItem(
    answer: Answer,
    #[prop(into)] on_edit: Callback<Answer>,
    #[prop(into)] on_delete: Callback<EntityId>,
) -> impl IntoView {
    let store = use_store();
    let author = answer.author_id().cloned();
    let own = {
        let author = author.clone();
        move || store.is_own(author.as_ref())
    };
    let when = time::relative_opt(answer.created_at.as_deref(), chrono::Utc::now());
    let name = answer
        .user
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "Unknown user".to_string());
    let picture = answer.user.as_ref().and_then(|u| u.picture.clone());
    let stored = StoredValue::new(answer.clone());

    view! {
        <article class="bugbee-answer">
            <header class="bugbee-answer-header">
                <Avatar picture=picture name=name.clone() />
                <span>{name}</span>
                <time class="bugbee-hint">{when}</time>
                <Show when=own.clone()>
                    <button
                        class="bugbee-btn bugbee-btn-sm"
                        on:click=move |_| on_edit.run(stored.get_value())
                    >
                        "Edit"
                    </button>
                    <button
                        class="bugbee-btn bugbee-btn-sm bugbee-btn-danger"
                        on:click=move |_| on_delete.run(stored.with_value(|a| a.id.clone()))
                    >
                        "Delete"
                    </button>
                </Show>
            </header>
            <RichContent html=answer.content.clone() />
            <AnswerVotes id=answer.id.clone() author=author />
        </article>
    }
}

#[component]
fn QuestionDetail(id: EntityId, on_deleted: Callback<()>) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let config = expect_context::<ClientConfig>();
    let store = use_store();
    let toaster = use_toaster();

    let cached = store.with_untracked(|s| s.question(&id).cloned());
    let tally = RwSignal::new(cached.as_ref().map(|q| q.votes).unwrap_or_default());
    let question: RwSignal<Option<Question>> = RwSignal::new(cached);
    let failed = RwSignal::new(false);

    let epoch = Epoch::new();
    let ticket = epoch.advance();

    // Detail and answers, discarded if the selection moves on first.
    {
        let api = api.clone();
        let epoch = epoch.clone();
        let id = id.clone();
        spawn_local(async move {
            store.dispatch(Action::AnswersLoading(true));
            match api.question(&id).await {
                Ok(fresh) => {
                    if let Some(fresh) = epoch.accept(ticket, fresh) {
                        tally.set(fresh.votes);
                        question.set(Some(fresh));
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, question = %id, "loading question failed");
                    if epoch.is_current(ticket) && question.with_untracked(Option::is_none) {
                        failed.set(true);
                    }
                }
            }
            let answers = api.answers(&id).await;
            match epoch.accept(ticket, answers) {
                Some(Ok(list)) => store.dispatch(Action::AnswersLoaded(list)),
                Some(Err(err)) => {
                    tracing::warn!(%err, question = %id, "loading answers failed");
                    store.dispatch(Action::AnswersFailed("Failed to fetch answers".into()));
                    toaster.error("Failed to fetch answers");
                }
                None => {}
            }
        });
    }

    // Keep the tally close to the server's while this question is shown.
    {
        let api = api.clone();
        let epoch = epoch.clone();
        let tick_epoch = epoch.clone();
        let plan = config.question_sync();
        let id = id.clone();
        spawn_local(async move {
            sync::poll(&epoch, ticket, plan, gloo_timers::future::sleep, move || {
                let api = api.clone();
                let epoch = tick_epoch.clone();
                let id = id.clone();
                async move {
                    match api.question(&id).await {
                        Ok(server) => {
                            let Some(server) = epoch.accept(ticket, server) else {
                                return;
                            };
                            if let Some(votes) = sync::reconcile(tally.get_untracked(), server.votes) {
                                tally.set(votes);
                                store.dispatch(Action::QuestionVotes { id, votes });
                            }
                        }
                        Err(err) => tracing::debug!(%err, "vote sync skipped"),
                    }
                }
            })
            .await;
        });
    }
    on_cleanup(move || {
        epoch.advance();
    });

    let author = Memo::new(move |_| question.with(|q| q.as_ref().and_then(|q| q.author_id().cloned())));
    let own = move || store.is_own(author.get().as_ref());

    let edit_dialog = RwSignal::new(ComposeDialog::question());
    let answer_dialog = RwSignal::new(ComposeDialog::answer(id.clone()));
    let delete_question = RwSignal::new(false);
    let pending_answer_delete: RwSignal<Option<EntityId>> = RwSignal::new(None);
    let confirm_answer_delete = RwSignal::new(false);

    let open_edit = move |_| {
        if let Some(q) = question.get_untracked() {
            let mut dialog = ComposeDialog::edit_question(&q);
            dialog.open();
            edit_dialog.set(dialog);
        }
    };
    let on_question_saved = {
        let api = api.clone();
        move |done: Submitted| {
            if let Submitted::QuestionUpdated { patch, .. } = done {
                question.update(|q| {
                    if let Some(q) = q {
                        q.title = patch.title;
                        q.content = Some(patch.content);
                    }
                });
            }
            let api = api.clone();
            spawn_local(async move {
                refresh_questions(&api, store).await;
                refresh_my_questions(&api, store).await;
            });
        }
    };
    let on_answer_done = move |done: Submitted| match done {
        Submitted::AnswerPosted(answer) => store.dispatch(Action::AnswerAdded(answer)),
        Submitted::AnswerUpdated(answer) => store.dispatch(Action::AnswerUpdated(answer)),
        _ => {}
    };
    let on_edit_answer = move |answer: Answer| {
        let mut dialog = ComposeDialog::edit_answer(&answer);
        dialog.open();
        answer_dialog.set(dialog);
    };
    let on_delete_answer = move |answer_id: EntityId| {
        pending_answer_delete.set(Some(answer_id));
        confirm_answer_delete.set(true);
    };
    let start_answer = {
        let id = id.clone();
        move |_| {
            let mut dialog = ComposeDialog::answer(id.clone());
            dialog.open();
            answer_dialog.set(dialog);
        }
    };

    let confirm_delete_answer = {
        let api = api.clone();
        move |_: ()| {
            let Some(answer_id) = pending_answer_delete.get_untracked() else {
                return;
            };
            pending_answer_delete.set(None);
            let api = api.clone();
            spawn_local(async move {
                match api.delete_answer(&answer_id).await {
                    Ok(()) => {
                        store.dispatch(Action::AnswerRemoved(answer_id));
                        toaster.success("Answer deleted successfully");
                    }
                    Err(err) => {
                        tracing::warn!(%err, "deleting answer failed");
                        toaster.error("Failed to delete answer");
                    }
                }
            });
        }
    };
    let confirm_delete_question = {
        let id = id.clone();
        move |_: ()| {
            let api = api.clone();
            let id = id.clone();
            spawn_local(async move {
                match api.delete_question(&id).await {
                    Ok(()) => {
                        toaster.success("Question deleted successfully!");
                        refresh_questions(&api, store).await;
                        refresh_my_questions(&api, store).await;
                        on_deleted.run(());
                    }
                    Err(err) => {
                        tracing::warn!(%err, "deleting question failed");
                        toaster.error("Failed to delete question. Please try again.");
                    }
                }
            });
        }
    };

    let header = move || {
        question.get().map(|q| {
            let now = chrono::Utc::now();
            view! {
                <header class="bugbee-question-header">
                    <h2>{q.title.clone()}</h2>
                    <div class="bugbee-question-meta">
                        <AuthorCard author=q.user.clone() user_id=q.user_id.clone() />
                        <time class="bugbee-hint">
                            {q
                                .created_at
                                .as_deref()
                                .map_or_else(|| "recently".to_string(), |ts| time::relative(ts, now))}
                        </time>
                    </div>
                    <div class="bugbee-tags">
                        {q.tags.iter().map(|t| view! { <span class="bugbee-tag">{t.clone()}</span> }).collect::<Vec<_>>()}
                    </div>
                </header>
                <RichContent html=q.content.clone() />
            }
        })
    };

    let question_id = id.clone();
    view! {
        <div class="bugbee-question-detail">
            <Show when=move || failed.get()>
                <p class="bugbee-error">"Failed to fetch question"</p>
            </Show>
            {header}
            <div class="bugbee-question-actions">
                {move || {
                    let id = question_id.clone();
                    view! { <QuestionVotes id=id tally=tally author=author.get() /> }
                }}
                <Show when=own>
                    <button class="bugbee-btn bugbee-btn-sm" on:click=open_edit>
                        "Edit"
                    </button>
                    <button
                        class="bugbee-btn bugbee-btn-sm bugbee-btn-danger"
                        on:click=move |_| delete_question.set(true)
                    >
                        "Delete"
                    </button>
                </Show>
                <Show when=move || !own() && question.with(Option::is_some)>
                    <button class="bugbee-btn bugbee-btn-primary" on:click=start_answer.clone()>
                        "Answer this question"
                    </button>
                </Show>
            </div>

            <section class="bugbee-answers">
                <h3>
                    {move || store.with(|s| format!("{} Answers", s.answers.list.len()))}
                </h3>
                <Show
                    when=move || !store.with(|s| s.answers.loading)
                    fallback=|| view! { <p class="bugbee-loading">"Loading answers..."</p> }
                >
                    <For
                        each=move || store.with(|s| s.answers.list.clone())
                        key=|a| (a.id.clone(), a.content.clone())
                        let:answer
                    >
                        <AnswerItem answer=answer on_edit=Callback::new(on_edit_answer) on_delete=Callback::new(on_delete_answer) />
                    </For>
                </Show>
            </section>

            <ComposeForm dialog=edit_dialog on_done=Callback::new(on_question_saved) modal=true />
            <ComposeForm dialog=answer_dialog on_done=Callback::new(on_answer_done) modal=true />
            <ConfirmDialog
                open=delete_question
                description="This action cannot be undone. This will permanently delete your question."
                on_confirm=Callback::new(confirm_delete_question)
            />
            <ConfirmDialog
                open=confirm_answer_delete
                description="This will permanently delete this answer. This action cannot be undone."
                on_confirm=Callback::new(confirm_delete_answer)
            />
        </div>
    }
}

