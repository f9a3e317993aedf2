use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Ids ──

/// Identifier exactly as the server sent it. Re-serializes in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

/// Ids arriving through a route or query string: digits become `Number`.
impl FromStr for EntityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Only canonical numbers; "007" must display back as itself.
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => EntityId::Number(n),
            _ => EntityId::Text(s.to_string()),
        })
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::Text(s)
    }
}

// ── Lenient fields ──

/// Stored HTML is only trusted when it is a JSON string.
fn lenient_html<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

// ── Auth / profile ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default, deserialize_with = "lenient_html")]
    pub about: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_news_letter_subscribed: bool,
    #[serde(default, deserialize_with = "lenient_count")]
    pub questions_asked: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub answers_provided: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub account_age: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Author summary embedded in questions and answers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub token: String,
}

// ── Votes ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Upvote,
    Downvote,
}

impl VoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteKind::Upvote => "upvote",
            VoteKind::Downvote => "downvote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteTally {
    #[serde(default)]
    pub upvotes: i64,
    #[serde(default)]
    pub downvotes: i64,
}

impl VoteTally {
    pub fn new(upvotes: i64, downvotes: i64) -> Self {
        Self { upvotes, downvotes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(rename = "type")]
    pub kind: VoteKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_id: Option<EntityId>,
}

impl VoteRequest {
    pub fn question(id: EntityId, kind: VoteKind) -> Self {
        Self {
            kind,
            question_id: Some(id),
            answer_id: None,
        }
    }

    pub fn answer(id: EntityId, kind: VoteKind) -> Self {
        Self {
            kind,
            question_id: None,
            answer_id: Some(id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResult {
    pub votes: VoteTally,
}

// ── Questions ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: EntityId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_html")]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub votes: VoteTally,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Question {
    pub fn author_id(&self) -> Option<&EntityId> {
        self.user_id
            .as_ref()
            .or_else(|| self.user.as_ref().and_then(|u| u.id.as_ref()))
    }

    pub fn author_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPatch {
    pub title: String,
    pub content: String,
}

// ── Answers ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: EntityId,
    #[serde(default)]
    pub question_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_html")]
    pub content: Option<String>,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub user_id: Option<EntityId>,
    #[serde(default)]
    pub votes: VoteTally,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Answer {
    pub fn author_id(&self) -> Option<&EntityId> {
        self.user_id
            .as_ref()
            .or_else(|| self.user.as_ref().and_then(|u| u.id.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBody {
    pub content: String,
}

// ── Notifications ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: EntityId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub question_id: Option<EntityId>,
}

// ── Envelopes ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_params_parse_to_matching_ids() {
        assert_eq!("42".parse::<EntityId>(), Ok(EntityId::Number(42)));
        assert_eq!(
            "65f1c0ab".parse::<EntityId>(),
            Ok(EntityId::Text("65f1c0ab".into()))
        );
        assert_eq!("-3".parse::<EntityId>(), Ok(EntityId::Number(-3)));
        for raw in ["007", "+5"] {
            let id = raw.parse::<EntityId>().unwrap();
            assert_eq!(id, EntityId::Text(raw.into()));
            assert_eq!(id.to_string(), raw);
        }
    }

    #[test]
    fn question_with_numeric_id_and_null_content() {
        let q: Question = serde_json::from_value(json!({
            "id": 42,
            "title": "Borrow checker",
            "content": null,
            "tags": ["rust"],
            "user": { "id": 7, "name": "Ada" },
            "votes": { "upvotes": 3, "downvotes": 1 },
            "createdAt": "2024-10-15T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(q.id, EntityId::Number(42));
        assert_eq!(q.content, None);
        assert_eq!(q.votes, VoteTally::new(3, 1));
        assert_eq!(q.author_id(), Some(&EntityId::Number(7)));
        assert_eq!(q.author_name(), "Ada");
    }

    #[test]
    fn non_string_content_is_dropped() {
        let a: Answer = serde_json::from_value(json!({
            "id": "a1",
            "content": { "type": "doc" }
        }))
        .unwrap();
        assert_eq!(a.content, None);
        assert_eq!(a.votes, VoteTally::default());
    }

    #[test]
    fn vote_request_names_only_its_target() {
        let body = serde_json::to_value(VoteRequest::question(42.into(), VoteKind::Upvote)).unwrap();
        assert_eq!(body, json!({ "type": "upvote", "questionId": 42 }));

        let body = serde_json::to_value(VoteRequest::answer("x9".into(), VoteKind::Downvote)).unwrap();
        assert_eq!(body, json!({ "type": "downvote", "answerId": "x9" }));
    }

    #[test]
    fn user_counters_tolerate_nulls_and_strings() {
        let u: User = serde_json::from_value(json!({
            "id": "u1",
            "name": "Grace",
            "questionsAsked": null,
            "answersProvided": "12",
            "accountAge": 30,
            "about": 5
        }))
        .unwrap();
        assert_eq!(u.questions_asked, 0);
        assert_eq!(u.answers_provided, 12);
        assert_eq!(u.account_age.as_deref(), Some("30"));
        assert_eq!(u.about, None);
    }
}
