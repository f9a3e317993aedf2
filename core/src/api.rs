use async_trait::async_trait;
use bugbee_shared::{
    Answer, AnswerBody, EntityId, NewQuestion, Notification, Question, QuestionPatch, User,
    VoteRequest, VoteResult,
};

use crate::error::ApiError;
use crate::profile::ProfileUpdate;

/// Every remote operation the client performs.
///
/// Implementations send the session cookie with each request and unwrap the
/// `{ data }` envelope. Futures are not `Send`: the client runs on a single
/// cooperative event loop.
#[async_trait(?Send)]
pub trait ForumApi {
    async fn session(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;
    async fn public_profile(&self, id: &EntityId) -> Result<User, ApiError>;

    async fn questions(&self) -> Result<Vec<Question>, ApiError>;
    async fn my_questions(&self) -> Result<Vec<Question>, ApiError>;
    async fn question(&self, id: &EntityId) -> Result<Question, ApiError>;
    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError>;
    async fn update_question(&self, id: &EntityId, patch: &QuestionPatch) -> Result<(), ApiError>;
    async fn delete_question(&self, id: &EntityId) -> Result<(), ApiError>;

    async fn post_answer(&self, question_id: &EntityId, body: &AnswerBody)
        -> Result<Answer, ApiError>;
    async fn answers(&self, question_id: &EntityId) -> Result<Vec<Answer>, ApiError>;
    async fn update_answer(&self, id: &EntityId, body: &AnswerBody) -> Result<Answer, ApiError>;
    async fn delete_answer(&self, id: &EntityId) -> Result<(), ApiError>;

    async fn vote(&self, request: &VoteRequest) -> Result<VoteResult, ApiError>;

    async fn notifications(&self) -> Result<Vec<Notification>, ApiError>;
    async fn mark_all_read(&self) -> Result<(), ApiError>;

    async fn sign_in(&self, credential: &str) -> Result<User, ApiError>;
    async fn sign_out(&self) -> Result<(), ApiError>;
    async fn subscribe_newsletter(&self) -> Result<(), ApiError>;
}

/// Endpoint paths relative to the API base.
pub mod paths {
    use bugbee_shared::EntityId;

    pub const PROFILE: &str = "/profile";
    pub const QUESTIONS: &str = "/questions";
    pub const MY_QUESTIONS: &str = "/questions/mine";
    pub const VOTE: &str = "/vote";
    pub const NOTIFICATIONS: &str = "/notifications";
    pub const MARK_ALL_READ: &str = "/notifications/mark-all-as-read";
    pub const SIGN_IN: &str = "/signin";
    pub const SIGN_OUT: &str = "/signout";
    pub const NEWSLETTER: &str = "/newsletter";

    fn segment(id: &EntityId) -> String {
        urlencoding::encode(&id.to_string()).into_owned()
    }

    pub fn profile(id: &EntityId) -> String {
        format!("/profile/{}", segment(id))
    }

    pub fn question(id: &EntityId) -> String {
        format!("/questions/{}", segment(id))
    }

    pub fn question_answers(id: &EntityId) -> String {
        format!("/questions/{}/answers", segment(id))
    }

    pub fn answer(id: &EntityId) -> String {
        format!("/answers/{}", segment(id))
    }

    /// Join a base origin and a path without doubling the slash.
    pub fn join(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::paths;
    use bugbee_shared::EntityId;

    #[test]
    fn id_segments_are_encoded() {
        assert_eq!(paths::question(&EntityId::Number(42)), "/questions/42");
        assert_eq!(
            paths::question_answers(&EntityId::from("a b/c")),
            "/questions/a%20b%2Fc/answers"
        );
        assert_eq!(paths::answer(&"x1".into()), "/answers/x1");
        assert_eq!(paths::profile(&7.into()), "/profile/7");
    }

    #[test]
    fn join_trims_trailing_slash() {
        assert_eq!(
            paths::join("https://api.bugbee.dev/", paths::MY_QUESTIONS),
            "https://api.bugbee.dev/questions/mine"
        );
    }
}
