//! Fixtures and an in-memory [`ForumApi`] double for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use bugbee_shared::{
    Answer, AnswerBody, Author, EntityId, NewQuestion, Notification, Question, QuestionPatch,
    User, VoteRequest, VoteResult, VoteTally,
};

use crate::api::ForumApi;
use crate::error::ApiError;
use crate::profile::ProfileUpdate;

pub fn user(id: i64) -> User {
    serde_json::from_value(serde_json::json!({ "id": id, "name": format!("User {id}") }))
        .expect("valid user fixture")
}

pub fn question(id: i64, up: i64, down: i64) -> Question {
    Question {
        id: id.into(),
        title: format!("Question {id}"),
        content: Some("<p>body</p>".into()),
        tags: Vec::new(),
        user: Some(Author {
            id: Some(100.into()),
            name: "Author".into(),
            picture: None,
        }),
        user_id: Some(100.into()),
        votes: VoteTally::new(up, down),
        created_at: None,
        updated_at: None,
    }
}

pub fn answer(id: i64) -> Answer {
    Answer {
        id: id.into(),
        question_id: None,
        content: Some("<p>answer</p>".into()),
        user: None,
        user_id: Some(100.into()),
        votes: VoteTally::default(),
        created_at: None,
        updated_at: None,
    }
}

pub fn notification(id: i64, message: &str, read: bool) -> Notification {
    Notification {
        id: id.into(),
        message: message.into(),
        read,
        created_at: None,
        question_id: None,
    }
}

/// Records every call in a shared log and replays queued responses.
#[derive(Default)]
pub struct MockApi {
    pub log: Rc<RefCell<Vec<String>>>,
    pub votes: RefCell<VecDeque<Result<VoteResult, ApiError>>>,
    pub notifications: RefCell<VecDeque<Result<Vec<Notification>, ApiError>>>,
    pub questions: RefCell<VecDeque<Result<Question, ApiError>>>,
    pub creates: RefCell<VecDeque<Result<(), ApiError>>>,
}

impl MockApi {
    pub fn with_log(log: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.log.borrow_mut().push(call.into());
    }

    fn unexpected<T>(&self, call: &str) -> Result<T, ApiError> {
        self.record(call);
        Err(ApiError::Network(format!("unexpected call: {call}")))
    }
}

fn next<T>(queue: &RefCell<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no response queued".into())))
}

#[async_trait(?Send)]
impl ForumApi for MockApi {
    async fn session(&self) -> Result<User, ApiError> {
        self.unexpected("session")
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> Result<User, ApiError> {
        self.unexpected("update_profile")
    }

    async fn public_profile(&self, _id: &EntityId) -> Result<User, ApiError> {
        self.unexpected("public_profile")
    }

    async fn questions(&self) -> Result<Vec<Question>, ApiError> {
        self.unexpected("questions")
    }

    async fn my_questions(&self) -> Result<Vec<Question>, ApiError> {
        self.unexpected("my_questions")
    }

    async fn question(&self, id: &EntityId) -> Result<Question, ApiError> {
        self.record(format!("question:{id}"));
        next(&self.questions)
    }

    async fn create_question(&self, question: &NewQuestion) -> Result<(), ApiError> {
        self.record(format!("create_question:{}", question.title));
        next(&self.creates)
    }

    async fn update_question(&self, _id: &EntityId, _patch: &QuestionPatch) -> Result<(), ApiError> {
        self.unexpected("update_question")
    }

    async fn delete_question(&self, _id: &EntityId) -> Result<(), ApiError> {
        self.unexpected("delete_question")
    }

    async fn post_answer(
        &self,
        _question_id: &EntityId,
        _body: &AnswerBody,
    ) -> Result<Answer, ApiError> {
        self.unexpected("post_answer")
    }

    async fn answers(&self, _question_id: &EntityId) -> Result<Vec<Answer>, ApiError> {
        self.unexpected("answers")
    }

    async fn update_answer(&self, _id: &EntityId, _body: &AnswerBody) -> Result<Answer, ApiError> {
        self.unexpected("update_answer")
    }

    async fn delete_answer(&self, _id: &EntityId) -> Result<(), ApiError> {
        self.unexpected("delete_answer")
    }

    async fn vote(&self, request: &VoteRequest) -> Result<VoteResult, ApiError> {
        let target = request
            .question_id
            .as_ref()
            .map(|id| format!("q{id}"))
            .or_else(|| request.answer_id.as_ref().map(|id| format!("a{id}")))
            .unwrap_or_default();
        self.record(format!("vote:{}:{target}", request.kind.as_str()));
        next(&self.votes)
    }

    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.record("notifications");
        next(&self.notifications)
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.unexpected("mark_all_read")
    }

    async fn sign_in(&self, _credential: &str) -> Result<User, ApiError> {
        self.unexpected("sign_in")
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.unexpected("sign_out")
    }

    async fn subscribe_newsletter(&self) -> Result<(), ApiError> {
        self.unexpected("subscribe_newsletter")
    }
}
