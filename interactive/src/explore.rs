use bugbee_core::{catalog, content, time};
use bugbee_shared::{EntityId, Question};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::panels::SplitPanes;
use crate::question_view::QuestionView;
use crate::state::use_store;

/// Selected question id from the `question` query parameter.
pub fn use_selected_question() -> Memo<Option<EntityId>> {
    let query = use_query_map();
    Memo::new(move |_| {
        query
            .get()
            .get("question")
            .and_then(|id| id.parse::<EntityId>().ok())
    })
}

#[component]
fn TagBadges(tags: Vec<String>) -> impl IntoView {
    let expanded = RwSignal::new(false);
    let tags = StoredValue::new(tags);
    let hidden = tags.with_value(|t| catalog::hidden_tag_count(t));

    view! {
        <div class="bugbee-tags">
            {move || {
                tags.with_value(|t| {
                    catalog::visible_tags(t, expanded.get())
                        .iter()
                        .map(|tag| {
                            view! {
                                <span class="bugbee-tag">
                                    <img src=catalog::badge_logo(tag) alt="" class="bugbee-tag-logo" />
                                    {tag.clone()}
                                </span>
                            }
                        })
                        .collect::<Vec<_>>()
                })
            }}
            <Show when=move || { hidden > 0 }>
                <button
                    class="bugbee-link-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        expanded.update(|e| *e = !*e);
                    }
                >
                    {move || if expanded.get() { "Show Less".to_string() } else { format!("{hidden} more") }}
                </button>
            </Show>
        </div>
    }
}

#[component]
fn QuestionRow(
    question: Question,
    selected: Signal<bool>,
    #[prop(into)] on_select: Callback<EntityId>,
) -> impl IntoView {
    let now = chrono::Utc::now();
    let id = question.id.clone();
    let preview = content::preview(question.content.as_deref(), content::PREVIEW_CHARS);
    let when = time::relative_opt(question.created_at.as_deref(), now);
    let author = question.author_name().to_string();

    view! {
        <li
            class="bugbee-question-row"
            class:bugbee-selected=move || selected.get()
            on:click=move |_| on_select.run(id.clone())
        >
            <h4 class="bugbee-question-title">{question.title.clone()}</h4>
            <p class="bugbee-hint">{preview}</p>
            <TagBadges tags=question.tags.clone() />
            <div class="bugbee-question-meta">
                <span>{author}</span>
                <time>{when}</time>
                <span>{format!("\u{25B2} {}", question.votes.upvotes)}</span>
            </div>
        </li>
    }
}

/// Searchable list of questions with the selected row highlighted.
#[component]
pub fn QuestionList(
    #[prop(into)] questions: Signal<Vec<Question>>,
    #[prop(into)] selected: Signal<Option<EntityId>>,
    #[prop(into)] on_select: Callback<EntityId>,
    /// Match author names as well as titles.
    #[prop(optional)]
    full_search: bool,
    #[prop(into)] empty: String,
) -> impl IntoView {
    let search = RwSignal::new(String::new());

    let shown = Memo::new(move |_| {
        let query = search.get();
        questions.with(|list| {
            let hits = if full_search {
                catalog::filter_questions(list, &query)
            } else {
                catalog::filter_by_title(list, &query)
            };
            hits.into_iter().cloned().collect::<Vec<_>>()
        })
    });

    view! {
        <div class="bugbee-question-list">
            <input
                class="bugbee-input bugbee-search"
                type="search"
                placeholder="Search questions..."
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <Show when=move || shown.with(Vec::is_empty)>
                <p class="bugbee-hint">{empty.clone()}</p>
            </Show>
            <ul>
                <For
                    each=move || shown.get()
                    key=|q| (q.id.clone(), q.title.clone(), q.votes.upvotes, q.votes.downvotes)
                    let:question
                >
                    {
                        let id = question.id.clone();
                        let is_selected = Signal::derive(move || {
                            selected.with(|s| s.as_ref() == Some(&id))
                        });
                        view! {
                            <QuestionRow question=question selected=is_selected on_select=on_select />
                        }
                    }
                </For>
            </ul>
        </div>
    }
}

#[component]
pub fn ExplorePage() -> impl IntoView {
    let store = use_store();
    let navigate = use_navigate();
    let selected = use_selected_question();

    let questions = Signal::derive(move || store.with(|s| s.questions.list.clone()));
    let loading = move || store.with(|s| s.questions.loading && s.questions.list.is_empty());
    let error = move || store.with(|s| s.questions.error.clone());

    let on_select = {
        let navigate = navigate.clone();
        Callback::new(move |id: EntityId| navigate(&format!("/?question={id}"), Default::default()))
    };
    let on_deleted = Callback::new(move |_: ()| navigate("/", Default::default()));

    let list = move || {
        view! {
            <h2 class="bugbee-page-title">"Explore Questions"</h2>
            <Show when=loading>
                <p class="bugbee-loading">"Loading..."</p>
            </Show>
            {move || error().map(|message| view! { <p class="bugbee-error">{message}</p> })}
            <QuestionList
                questions=questions
                selected=selected
                on_select=on_select
                full_search=true
                empty="No questions found"
            />
        }
    };
    let detail = move || {
        selected.get().map(|id| view! { <QuestionView id=id on_deleted=on_deleted /> })
    };

    view! {
        <SplitPanes
            list=list
            detail=move || {
                view! {
                    {detail}
                    <Show when=move || selected.with(Option::is_none)>
                        <p class="bugbee-hint bugbee-empty-detail">"Select a question to see its details"</p>
                    </Show>
                }
            }
        />
    }
}
