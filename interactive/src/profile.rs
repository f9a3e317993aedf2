use bugbee_core::profile::{
    self, ProfileUpdate, ProfileView, PROFILE_SAVED, PROFILE_SAVE_FAILED, VISIBILITY_FAILED,
};
use bugbee_core::store::Action;
use bugbee_core::ForumApi;
use bugbee_shared::{EntityId, User};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use wasm_bindgen_futures::spawn_local;

use crate::api::HttpApi;
use crate::auth::SignInCard;
use crate::render::RichContent;
use crate::state::{use_store, use_toaster};

/// Picture when there is one, initials otherwise.
#[component]
pub fn Avatar(picture: Option<String>, #[prop(into)] name: String) -> impl IntoView {
    match picture.filter(|p| !p.is_empty()) {
        Some(src) => view! { <img class="bugbee-avatar" src=src alt=name /> }.into_any(),
        None => view! { <span class="bugbee-avatar bugbee-avatar-fallback">{profile::initials(&name)}</span> }
            .into_any(),
    }
}

/// Read-only profile body shared by the own and public pages.
#[component]
fn ProfileCard(user: User) -> impl IntoView {
    let links = profile::social_links(&user);
    let member_for = user
        .account_age
        .clone()
        .map(|age| format!("Member for {age} days"));

    view! {
        <div class="bugbee-card bugbee-profile">
            <div class="bugbee-profile-header">
                <Avatar picture=user.picture.clone() name=user.name.clone() />
                <div>
                    <h2>{user.name.clone()}</h2>
                    <p class="bugbee-hint">{user.email.clone()}</p>
                    {user.location.clone().map(|l| view! { <p class="bugbee-hint">{l}</p> })}
                    {member_for.map(|m| view! { <p class="bugbee-hint">{m}</p> })}
                </div>
            </div>
            <RichContent html=user.about.clone() />
            <dl class="bugbee-stats">
                <dt>"Questions asked"</dt>
                <dd>{user.questions_asked}</dd>
                <dt>"Answers provided"</dt>
                <dd>{user.answers_provided}</dd>
            </dl>
            <ul class="bugbee-social">
                {links
                    .into_iter()
                    .map(|link| {
                        view! {
                            <li>
                                <a href=link.url target="_blank" rel="noopener noreferrer">
                                    {link.kind.label()}
                                </a>
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ul>
        </div>
    }
}

#[component]
fn TextField(
    label: &'static str,
    form: RwSignal<ProfileUpdate>,
    field: fn(&mut ProfileUpdate) -> &mut Option<String>,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let value = move || form.with(|f| field(&mut f.clone()).clone().unwrap_or_default());
    let set = move |text: String| form.update(|f| *field(f) = Some(text));

    view! {
        <label class="bugbee-field">
            <span>{label}</span>
            {if multiline {
                view! {
                    <textarea
                        class="bugbee-input"
                        rows="4"
                        prop:value=value
                        on:input=move |ev| set(event_target_value(&ev))
                    ></textarea>
                }
                    .into_any()
            } else {
                view! {
                    <input
                        class="bugbee-input"
                        prop:value=value
                        on:input=move |ev| set(event_target_value(&ev))
                    />
                }
                    .into_any()
            }}
        </label>
    }
}

#[component]
fn EditProfileForm(user: User, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let form = RwSignal::new(ProfileUpdate::from_user(&user));
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        saving.set(true);
        error.set(None);
        let api = api.clone();
        let update = form.get_untracked();
        spawn_local(async move {
            match api.update_profile(&update).await {
                Ok(user) => {
                    store.dispatch(Action::SetUser(Some(user)));
                    toaster.success(PROFILE_SAVED);
                    on_close.run(());
                }
                Err(err) => {
                    tracing::warn!(%err, "saving profile failed");
                    error.set(Some(profile::save_failure_message(&err)));
                    toaster.error(PROFILE_SAVE_FAILED);
                }
            }
            saving.set(false);
        });
    };

    view! {
        <form class="bugbee-card bugbee-profile-form" on:submit=on_submit>
            <TextField label="Name" form=form field=|f| &mut f.name />
            <TextField label="Location" form=form field=|f| &mut f.location />
            <TextField label="About" form=form field=|f| &mut f.about multiline=true />
            <TextField label="Portfolio" form=form field=|f| &mut f.portfolio_url />
            <TextField label="GitHub" form=form field=|f| &mut f.github_url />
            <TextField label="LinkedIn" form=form field=|f| &mut f.linkedin_url />
            <TextField label="Twitter" form=form field=|f| &mut f.twitter_url />
            {move || error.get().map(|message| view! { <p class="bugbee-error">{message}</p> })}
            <div class="bugbee-form-actions">
                <button type="button" class="bugbee-btn" on:click=move |_| on_close.run(())>
                    "Cancel"
                </button>
                <button type="submit" class="bugbee-btn bugbee-btn-primary" disabled=move || saving.get()>
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </button>
            </div>
        </form>
    }
}

#[component]
fn VisibilitySwitch(is_public: bool) -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let store = use_store();
    let toaster = use_toaster();
    let busy = RwSignal::new(false);

    let on_toggle = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.update_profile(&ProfileUpdate::visibility(!is_public)).await {
                Ok(user) => store.dispatch(Action::SetUser(Some(user))),
                Err(err) => {
                    tracing::warn!(%err, "changing visibility failed");
                    toaster.error(VISIBILITY_FAILED);
                }
            }
            busy.set(false);
        });
    };

    view! {
        <label class="bugbee-switch">
            <input
                type="checkbox"
                prop:checked=is_public
                disabled=move || busy.get()
                on:change=on_toggle
            />
            <span>{if is_public { "Public profile" } else { "Private profile" }}</span>
        </label>
    }
}

#[component]
pub fn OwnProfilePage() -> impl IntoView {
    let store = use_store();
    let editing = RwSignal::new(false);
    let user = Memo::new(move |_| store.user());

    view! {
        <Show
            when=move || user.with(Option::is_some)
            fallback=|| view! { <SignInCard message="Please log in or sign up to view and manage your profile." /> }
        >
            {move || {
                user.get()
                    .map(|user| {
                        if editing.get() {
                            view! {
                                <EditProfileForm user=user on_close=Callback::new(move |_: ()| editing.set(false)) />
                            }
                                .into_any()
                        } else {
                            view! {
                                <div class="bugbee-profile-page">
                                    <div class="bugbee-profile-actions">
                                        <VisibilitySwitch is_public=user.is_public />
                                        <button class="bugbee-btn" on:click=move |_| editing.set(true)>
                                            "Edit profile"
                                        </button>
                                    </div>
                                    <ProfileCard user=user />
                                </div>
                            }
                                .into_any()
                        }
                    })
            }}
        </Show>
    }
}

#[component]
pub fn PublicProfilePage() -> impl IntoView {
    let api = expect_context::<HttpApi>();
    let params = use_params_map();
    let profile = RwSignal::new(ProfileView::Loading);

    let id = Memo::new(move |_| {
        params
            .get()
            .get("id")
            .and_then(|id| id.parse::<EntityId>().ok())
    });

    Effect::new(move |_| {
        let Some(id) = id.get() else {
            profile.set(ProfileView::Failed);
            return;
        };
        profile.set(ProfileView::Loading);
        let api = api.clone();
        spawn_local(async move {
            profile.set(ProfileView::from_result(api.public_profile(&id).await));
        });
    });

    view! {
        {move || {
            profile.with(|state| match state {
                ProfileView::Loading => view! { <p class="bugbee-loading">"Loading..."</p> }.into_any(),
                ProfileView::Loaded(user) => view! { <ProfileCard user=(**user).clone() /> }.into_any(),
                other => view! {
                    <div class="bugbee-card">
                        <p class="bugbee-hint">{other.message()}</p>
                    </div>
                }
                    .into_any(),
            })
        }}
    }
}
