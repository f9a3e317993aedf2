use bugbee_core::store::Action;
use bugbee_core::vote::{self, vote_controls, VoteControls, VoteTarget};
use bugbee_shared::{EntityId, VoteKind, VoteTally};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::state::{use_store, use_toaster, use_voted};

#[component]
fn VoteButtons<F>(
    tally: Signal<VoteTally>,
    controls: Signal<VoteControls>,
    cast: F,
) -> impl IntoView
where
    F: Fn(VoteKind) + Clone + Send + Sync + 'static,
{
    let cast_up = {
        let cast = cast.clone();
        move |_| cast(VoteKind::Upvote)
    };
    let cast_down = move |_| cast(VoteKind::Downvote);
    let hidden = move || controls.get() == VoteControls::Hidden;
    let disabled = move || controls.get() != VoteControls::Enabled;

    view! {
        <div class="bugbee-votes">
            <button
                class="bugbee-vote-btn"
                class:bugbee-hidden=hidden
                on:click=cast_up
                disabled=disabled
                title="Upvote"
            >
                "\u{25B2}"
            </button>
            <span class="bugbee-vote-count">{move || tally.get().upvotes}</span>
            <button
                class="bugbee-vote-btn"
                class:bugbee-hidden=hidden
                on:click=cast_down
                disabled=disabled
                title="Downvote"
            >
                "\u{25BC}"
            </button>
            <span class="bugbee-vote-count">{move || tally.get().downvotes}</span>
        </div>
    }
}

/// Question votes apply optimistically and roll back when the server
/// refuses. `tally` is owned by the detail view so the periodic sync can
/// write to it as well.
#[component]
pub fn QuestionVotes(
    id: EntityId,
    author: Option<EntityId>,
    tally: RwSignal<VoteTally>,
) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let voted = use_voted();
    let in_flight = RwSignal::new(false);
    let id = StoredValue::new(id);

    let controls = Signal::derive(move || {
        vote_controls(
            store.is_own(author.as_ref()),
            id.with_value(|id| voted.has_voted(VoteTarget::Question, id)),
            in_flight.get(),
        )
    });

    let cast = move |kind: VoteKind| {
        if !store.signed_in_untracked() {
            toaster.info("Please sign in to vote.");
            return;
        }
        if controls.get_untracked() != VoteControls::Enabled {
            return;
        }
        in_flight.set(true);
        let api = api.clone();
        let question = id.get_value();
        spawn_local(async move {
            let result = vote::vote_question(
                &api,
                &question,
                kind,
                tally.get_untracked(),
                |votes| {
                    tally.set(votes);
                    store.dispatch(Action::QuestionVotes {
                        id: question.clone(),
                        votes,
                    });
                },
            )
            .await;
            match result {
                Ok(_) => {
                    voted.mark(VoteTarget::Question, question.clone(), kind);
                    toaster.success(vote::success_message(kind));
                }
                Err(failure) => toaster.error(failure.message),
            }
            in_flight.set(false);
        });
    };

    view! { <VoteButtons tally=tally.into() controls=controls cast=cast /> }
}

/// Answer votes wait for the server before the count changes.
#[component]
pub fn AnswerVotes(id: EntityId, author: Option<EntityId>) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let voted = use_voted();
    let in_flight = RwSignal::new(false);
    let id = StoredValue::new(id);

    let tally = Signal::derive(move || {
        id.with_value(|id| {
            store.with(|s| {
                s.answers
                    .list
                    .iter()
                    .find(|a| &a.id == id)
                    .map(|a| a.votes)
                    .unwrap_or_default()
            })
        })
    });
    let controls = Signal::derive(move || {
        vote_controls(
            store.is_own(author.as_ref()),
            id.with_value(|id| voted.has_voted(VoteTarget::Answer, id)),
            in_flight.get(),
        )
    });

    let cast = move |kind: VoteKind| {
        if !store.signed_in_untracked() {
            toaster.info("Please sign in to vote.");
            return;
        }
        if controls.get_untracked() != VoteControls::Enabled {
            return;
        }
        in_flight.set(true);
        let api = api.clone();
        let answer = id.get_value();
        spawn_local(async move {
            match vote::vote_answer(&api, &answer, kind).await {
                Ok(votes) => {
                    store.dispatch(Action::AnswerVotes {
                        id: answer.clone(),
                        votes,
                    });
                    voted.mark(VoteTarget::Answer, answer, kind);
                    toaster.success(vote::success_message(kind));
                }
                Err(failure) => toaster.error(failure.message),
            }
            in_flight.set(false);
        });
    };

    view! { <VoteButtons tally=tally controls=controls cast=cast /> }
}
