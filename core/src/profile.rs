//! Own and public profiles.

use bugbee_shared::User;
use serde::Serialize;

use crate::content::plain_text;
use crate::error::{ApiError, ErrorKind};

pub const PRIVATE_PROFILE: &str = "This profile is private.";
pub const PROFILE_FETCH_FAILED: &str = "Failed to fetch profile data";
pub const PROFILE_SAVED: &str = "Profile updated successfully";
pub const PROFILE_SAVE_FAILED: &str = "Failed to save profile. Please try again.";
pub const VISIBILITY_FAILED: &str = "Failed to update profile visibility. Please try again.";

/// Body of `PATCH /profile`. Only the editable fields exist here, so
/// nothing else can leak into the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl ProfileUpdate {
    /// Edit form prefilled from the current user. The bio is edited as text.
    pub fn from_user(user: &User) -> Self {
        let text = |v: &Option<String>| Some(v.clone().unwrap_or_default());
        Self {
            name: Some(user.name.clone()),
            location: text(&user.location),
            portfolio_url: text(&user.portfolio_url),
            twitter_url: text(&user.twitter_url),
            github_url: text(&user.github_url),
            linkedin_url: text(&user.linkedin_url),
            about: Some(user.about.as_deref().map(plain_text).unwrap_or_default()),
            is_public: Some(user.is_public),
        }
    }

    /// A visibility-only change.
    pub fn visibility(is_public: bool) -> Self {
        Self {
            is_public: Some(is_public),
            ..Self::default()
        }
    }
}

/// The server's message when it sent one, otherwise the generic text.
pub fn save_failure_message(error: &ApiError) -> String {
    error
        .server_message()
        .map_or_else(|| PROFILE_SAVE_FAILED.to_string(), str::to_string)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileView {
    Loading,
    Loaded(Box<User>),
    Private,
    Failed,
}

impl ProfileView {
    pub fn from_result(result: Result<User, ApiError>) -> Self {
        match result {
            Ok(user) => ProfileView::Loaded(Box::new(user)),
            Err(error) if error.kind() == ErrorKind::Forbidden => ProfileView::Private,
            Err(error) => {
                tracing::warn!(%error, "profile fetch failed");
                ProfileView::Failed
            }
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            ProfileView::Private => Some(PRIVATE_PROFILE),
            ProfileView::Failed => Some(PROFILE_FETCH_FAILED),
            _ => None,
        }
    }
}

/// Avatar fallback: first letter of each word, at most two, "U" when empty.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialKind {
    LinkedIn,
    GitHub,
    Twitter,
    Portfolio,
}

impl SocialKind {
    pub fn label(self) -> &'static str {
        match self {
            SocialKind::LinkedIn => "LinkedIn",
            SocialKind::GitHub => "GitHub",
            SocialKind::Twitter => "Twitter",
            SocialKind::Portfolio => "Portfolio",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SocialLink {
    pub kind: SocialKind,
    pub url: String,
}

pub fn social_links(user: &User) -> Vec<SocialLink> {
    [
        (SocialKind::LinkedIn, &user.linkedin_url),
        (SocialKind::GitHub, &user.github_url),
        (SocialKind::Twitter, &user.twitter_url),
        (SocialKind::Portfolio, &user.portfolio_url),
    ]
    .into_iter()
    .filter_map(|(kind, url)| {
        let url = url.as_deref()?.trim();
        (!url.is_empty()).then(|| SocialLink {
            kind,
            url: url.to_string(),
        })
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::user;

    #[test]
    fn update_serializes_only_editable_fields() {
        let mut u = user(1);
        u.email = "me@example.com".into();
        u.about = Some("<p>Hello <b>there</b></p>".into());
        u.github_url = Some("https://github.com/me".into());

        let body = serde_json::to_value(ProfileUpdate::from_user(&u)).unwrap();
        let keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 8, "unexpected keys {keys:?}");
        assert!(body.get("email").is_none());
        assert_eq!(body["about"], json!("Hello there"));
        assert_eq!(body["githubUrl"], json!("https://github.com/me"));
        assert_eq!(body["isPublic"], json!(false));
    }

    #[test]
    fn visibility_update_is_one_field() {
        let body = serde_json::to_value(ProfileUpdate::visibility(true)).unwrap();
        assert_eq!(body, json!({ "isPublic": true }));
    }

    #[test]
    fn forbidden_profiles_are_private() {
        let view = ProfileView::from_result(Err(ApiError::status(403)));
        assert_eq!(view, ProfileView::Private);
        assert_eq!(view.message(), Some("This profile is private."));

        let view = ProfileView::from_result(Err(ApiError::Network("down".into())));
        assert_eq!(view.message(), Some("Failed to fetch profile data"));

        assert!(matches!(
            ProfileView::from_result(Ok(user(2))),
            ProfileView::Loaded(_)
        ));
    }

    #[test]
    fn save_failure_prefers_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Name too long".into()),
        };
        assert_eq!(save_failure_message(&err), "Name too long");
        assert_eq!(save_failure_message(&ApiError::status(500)), PROFILE_SAVE_FAILED);
    }

    #[test]
    fn initials_and_links() {
        assert_eq!(initials("ada lovelace byron"), "AL");
        assert_eq!(initials("  "), "U");

        let mut u = user(1);
        u.portfolio_url = Some("https://me.dev".into());
        u.linkedin_url = Some("https://linkedin.com/in/me".into());
        u.twitter_url = Some(" ".into());
        let kinds: Vec<_> = social_links(&u).into_iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![SocialKind::LinkedIn, SocialKind::Portfolio]);
    }
}
