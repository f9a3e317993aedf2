use bugbee_shared::EntityId;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::auth::SignInCard;
use crate::explore::{use_selected_question, QuestionList};
use crate::panels::SplitPanes;
use crate::question_view::QuestionView;
use crate::state::use_store;

/// The signed-in user's questions. Editing and deleting happen in the
/// detail pane, which offers both on questions the user owns.
#[component]
pub fn MyQuestionsPage() -> impl IntoView {
    let store = use_store();
    let navigate = use_navigate();
    let selected = use_selected_question();

    let questions = Signal::derive(move || store.with(|s| s.questions.mine.clone()));
    let on_select = {
        let navigate = navigate.clone();
        Callback::new(move |id: EntityId| {
            navigate(&format!("/myquestions?question={id}"), Default::default())
        })
    };
    let on_deleted = Callback::new(move |_: ()| navigate("/myquestions", Default::default()));

    let list = move || {
        view! {
            <h2 class="bugbee-page-title">"My Questions"</h2>
            <QuestionList
                questions=questions
                selected=selected
                on_select=on_select
                empty="You haven't asked any questions yet"
            />
        }
    };
    let detail = move || {
        selected.get().map(|id| view! { <QuestionView id=id on_deleted=on_deleted /> })
    };

    view! {
        <Show
            when=move || store.signed_in()
            fallback=|| view! { <SignInCard message="Please log in or sign up to see your questions" /> }
        >
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
        </Show>
    }
}
