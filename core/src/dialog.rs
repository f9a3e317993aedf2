//! Compose and edit dialogs for questions and answers.
//!
//! A dialog moves `Closed -> Editing -> Submitting` and then either closes
//! or returns to `Editing` with an inline message. Local gates run before
//! any request is built.

use bugbee_shared::{Answer, AnswerBody, EntityId, NewQuestion, Question, QuestionPatch};
use thiserror::Error;

use crate::api::ForumApi;
use crate::catalog::tags_from_input;
use crate::content::{parse, sanitize, Node};
use crate::error::{ApiError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Question,
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Please enter a title before writing your question.")]
    MissingTitle,
    #[error("Please provide a title and content for the question.")]
    MissingQuestionContent,
    #[error("Please provide content for the answer.")]
    MissingAnswerContent,
    #[error("Title and content cannot be empty.")]
    EmptyEdit,
    #[error("A submission is already in progress.")]
    Busy,
}

/// The request a dialog is about to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    CreateQuestion(NewQuestion),
    UpdateQuestion { id: EntityId, patch: QuestionPatch },
    PostAnswer { question_id: EntityId, body: AnswerBody },
    UpdateAnswer { id: EntityId, body: AnswerBody },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    QuestionCreated,
    QuestionUpdated { id: EntityId, patch: QuestionPatch },
    AnswerPosted(Answer),
    AnswerUpdated(Answer),
}

impl Submitted {
    pub fn success_message(&self) -> &'static str {
        match self {
            Submitted::QuestionCreated => "Question created successfully!",
            Submitted::QuestionUpdated { .. } => "Question updated successfully!",
            Submitted::AnswerPosted(_) => "Answer created successfully",
            Submitted::AnswerUpdated(_) => "Answer updated successfully",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFailure {
    pub error: ApiError,
    pub message: String,
}

impl SubmitFailure {
    pub fn classify(error: ApiError, subject: Subject, intent: Intent) -> Self {
        let message = match (error.kind(), intent, subject) {
            (ErrorKind::TooLarge, _, _) => {
                "The content is too large. Please reduce the size and try again."
            }
            (ErrorKind::Unauthorized, Intent::Create, Subject::Question) => {
                "You need to be logged in to create a question."
            }
            (ErrorKind::Unauthorized, Intent::Create, Subject::Answer) => {
                "You need to be logged in to post an answer."
            }
            (ErrorKind::BadRequest, Intent::Create, Subject::Question) => {
                "Please provide a title and content for the question."
            }
            (ErrorKind::BadRequest, Intent::Create, Subject::Answer) => {
                "Please provide content for the answer."
            }
            (_, Intent::Create, Subject::Question) => {
                "An error occurred while creating the question. Please try again."
            }
            (_, Intent::Create, Subject::Answer) => {
                "An error occurred while posting the answer. Please try again."
            }
            (_, Intent::Edit, Subject::Question) => "Failed to edit question. Please try again.",
            (_, Intent::Edit, Subject::Answer) => "Failed to update answer",
        };
        Self {
            error,
            message: message.to_string(),
        }
    }
}

/// Content with no text and no images counts as empty.
pub fn is_blank(html: &str) -> bool {
    fn has_substance(nodes: &[Node]) -> bool {
        nodes.iter().any(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Image { .. } | Node::Code(_) | Node::Rule => true,
            Node::Break => false,
            Node::Inline(_, children)
            | Node::Heading(_, children)
            | Node::Paragraph(children)
            | Node::Quote(children)
            | Node::Link { children, .. } => has_substance(children),
            Node::List { items, .. } => items.iter().any(|item| has_substance(item)),
        })
    }
    !has_substance(&parse(Some(html)))
}

/// What a dialog writes, with the id it writes against.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogKind {
    NewQuestion,
    EditQuestion(EntityId),
    NewAnswer { question_id: EntityId },
    EditAnswer(EntityId),
}

impl DialogKind {
    pub fn subject(&self) -> Subject {
        match self {
            DialogKind::NewQuestion | DialogKind::EditQuestion(_) => Subject::Question,
            DialogKind::NewAnswer { .. } | DialogKind::EditAnswer(_) => Subject::Answer,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            DialogKind::NewQuestion | DialogKind::NewAnswer { .. } => Intent::Create,
            DialogKind::EditQuestion(_) | DialogKind::EditAnswer(_) => Intent::Edit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDialog {
    kind: DialogKind,
    pub title: String,
    pub tags: String,
    content: String,
    state: DialogState,
    error: Option<String>,
}

impl ComposeDialog {
    fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            title: String::new(),
            tags: String::new(),
            content: String::new(),
            state: DialogState::Closed,
            error: None,
        }
    }

    pub fn question() -> Self {
        Self::new(DialogKind::NewQuestion)
    }

    pub fn answer(question_id: EntityId) -> Self {
        Self::new(DialogKind::NewAnswer { question_id })
    }

    pub fn edit_question(question: &Question) -> Self {
        let mut dialog = Self::new(DialogKind::EditQuestion(question.id.clone()));
        dialog.title = question.title.clone();
        dialog.content = question.content.clone().unwrap_or_default();
        dialog
    }

    pub fn edit_answer(answer: &Answer) -> Self {
        let mut dialog = Self::new(DialogKind::EditAnswer(answer.id.clone()));
        dialog.content = answer.content.clone().unwrap_or_default();
        dialog
    }

    pub fn kind(&self) -> &DialogKind {
        &self.kind
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.state == DialogState::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Draft shown beside the editor. Only edits carry a preview.
    pub fn preview(&self) -> Option<&str> {
        (self.kind.intent() == Intent::Edit).then_some(self.content.as_str())
    }

    pub fn open(&mut self) {
        self.state = DialogState::Editing;
        self.error = None;
    }

    pub fn close(&mut self) {
        if self.state != DialogState::Submitting {
            self.state = DialogState::Closed;
            self.error = None;
        }
    }

    /// Store editor output, sanitized.
    pub fn set_content(&mut self, html: &str) {
        self.content = sanitize(html);
    }

    fn needs_title(&self) -> bool {
        self.kind == DialogKind::NewQuestion
    }

    /// The content editor stays disabled on a new question until it has a title.
    pub fn editor_enabled(&self) -> bool {
        !self.is_submitting() && (!self.needs_title() || !self.title.trim().is_empty())
    }

    pub fn can_submit(&self) -> bool {
        self.editor_enabled() && self.check().is_ok()
    }

    fn check(&self) -> Result<(), GateError> {
        let blank_title = self.title.trim().is_empty();
        let blank_content = is_blank(&self.content);
        match self.kind {
            DialogKind::NewQuestion if blank_title => Err(GateError::MissingTitle),
            DialogKind::NewQuestion if blank_content => Err(GateError::MissingQuestionContent),
            DialogKind::EditQuestion(_) if blank_title || blank_content => {
                Err(GateError::EmptyEdit)
            }
            DialogKind::NewAnswer { .. } | DialogKind::EditAnswer(_) if blank_content => {
                Err(GateError::MissingAnswerContent)
            }
            _ => Ok(()),
        }
    }

    /// Run the local gates and move to `Submitting`, yielding the request
    /// to send. A refusal leaves the dialog editing with the message shown.
    pub fn begin_submit(&mut self) -> Result<Submission, GateError> {
        if self.is_submitting() {
            return Err(GateError::Busy);
        }
        if let Err(gate) = self.check() {
            self.error = Some(gate.to_string());
            return Err(gate);
        }

        let content = self.content.clone();
        let submission = match &self.kind {
            DialogKind::NewQuestion => Submission::CreateQuestion(NewQuestion {
                title: self.title.trim().to_string(),
                content,
                tags: tags_from_input(&self.tags),
            }),
            DialogKind::EditQuestion(id) => Submission::UpdateQuestion {
                id: id.clone(),
                patch: QuestionPatch {
                    title: self.title.trim().to_string(),
                    content,
                },
            },
            DialogKind::NewAnswer { question_id } => Submission::PostAnswer {
                question_id: question_id.clone(),
                body: AnswerBody { content },
            },
            DialogKind::EditAnswer(id) => Submission::UpdateAnswer {
                id: id.clone(),
                body: AnswerBody { content },
            },
        };

        self.state = DialogState::Submitting;
        self.error = None;
        Ok(submission)
    }

    /// Apply the server's answer: close on success, otherwise stay open with
    /// the failure message inline.
    pub fn finish(
        &mut self,
        result: Result<Submitted, ApiError>,
    ) -> Result<Submitted, SubmitFailure> {
        match result {
            Ok(submitted) => {
                self.state = DialogState::Closed;
                self.error = None;
                if self.kind.intent() == Intent::Create {
                    self.title.clear();
                    self.tags.clear();
                    self.content.clear();
                }
                Ok(submitted)
            }
            Err(error) => {
                tracing::warn!(%error, kind = ?self.kind, "submit failed");
                let failure =
                    SubmitFailure::classify(error, self.kind.subject(), self.kind.intent());
                self.state = DialogState::Editing;
                self.error = Some(failure.message.clone());
                Err(failure)
            }
        }
    }
}

/// Issue exactly one request for `submission`.
pub async fn send<A: ForumApi + ?Sized>(
    api: &A,
    submission: Submission,
) -> Result<Submitted, ApiError> {
    match submission {
        Submission::CreateQuestion(question) => {
            api.create_question(&question).await?;
            Ok(Submitted::QuestionCreated)
        }
        Submission::UpdateQuestion { id, patch } => {
            api.update_question(&id, &patch).await?;
            Ok(Submitted::QuestionUpdated { id, patch })
        }
        Submission::PostAnswer { question_id, body } => api
            .post_answer(&question_id, &body)
            .await
            .map(Submitted::AnswerPosted),
        Submission::UpdateAnswer { id, body } => api
            .update_answer(&id, &body)
            .await
            .map(Submitted::AnswerUpdated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{answer, question, MockApi};

    #[tokio::test]
    async fn empty_title_issues_no_request() {
        let api = MockApi::default();
        let mut dialog = ComposeDialog::question();
        dialog.open();
        dialog.set_content("<p>body</p>");

        assert!(!dialog.editor_enabled());
        assert!(!dialog.can_submit());
        assert_eq!(dialog.begin_submit(), Err(GateError::MissingTitle));
        assert_eq!(dialog.state(), DialogState::Editing);
        assert!(dialog.error().is_some());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn create_question_round_trip() {
        let api = MockApi::default();
        api.creates.borrow_mut().push_back(Ok(()));

        let mut dialog = ComposeDialog::question();
        dialog.open();
        dialog.title = "  How do lifetimes work?  ".into();
        dialog.tags = "rust, Lifetimes, rust,".into();
        assert!(dialog.editor_enabled());
        dialog.set_content("<p>Explain please</p>");

        let submission = dialog.begin_submit().unwrap();
        match &submission {
            Submission::CreateQuestion(q) => {
                assert_eq!(q.title, "How do lifetimes work?");
                assert_eq!(q.tags, vec!["rust", "Lifetimes"]);
            }
            other => panic!("unexpected submission {other:?}"),
        }
        assert!(dialog.is_submitting());
        assert!(!dialog.editor_enabled());

        let result = send(&api, submission).await;
        let done = dialog.finish(result).unwrap();
        assert_eq!(done.success_message(), "Question created successfully!");
        assert_eq!(dialog.state(), DialogState::Closed);
        assert!(dialog.title.is_empty());
        assert_eq!(api.calls(), vec!["create_question:How do lifetimes work?"]);
    }

    #[tokio::test]
    async fn too_large_keeps_the_dialog_open() {
        let api = MockApi::default();
        api.creates.borrow_mut().push_back(Err(ApiError::status(413)));

        let mut dialog = ComposeDialog::question();
        dialog.open();
        dialog.title = "Title".into();
        dialog.set_content("<p>x</p>");
        let submission = dialog.begin_submit().unwrap();
        let failure = dialog.finish(send(&api, submission).await).unwrap_err();

        assert_eq!(
            failure.message,
            "The content is too large. Please reduce the size and try again."
        );
        assert_eq!(dialog.state(), DialogState::Editing);
        assert_eq!(dialog.error(), Some(failure.message.as_str()));
        assert_eq!(dialog.title, "Title");
    }

    #[test]
    fn only_edits_carry_a_preview() {
        let mut dialog = ComposeDialog::question();
        dialog.set_content("<p>draft</p>");
        assert_eq!(dialog.preview(), None);
        assert_eq!(ComposeDialog::answer(1.into()).preview(), None);
        assert_eq!(
            ComposeDialog::edit_question(&question(3, 0, 0)).preview(),
            Some("<p>body</p>")
        );
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut dialog = ComposeDialog::answer(1.into());
        dialog.open();
        dialog.set_content("<p>answer</p>");
        assert!(matches!(
            dialog.begin_submit(),
            Ok(Submission::PostAnswer { .. })
        ));
        assert_eq!(dialog.begin_submit(), Err(GateError::Busy));
        dialog.close();
        assert!(dialog.is_open());
    }

    #[test]
    fn answers_refuse_blank_content() {
        let mut dialog = ComposeDialog::answer(1.into());
        dialog.open();
        assert!(dialog.editor_enabled());
        dialog.set_content("<p> </p><p><br></p>");
        assert_eq!(dialog.begin_submit(), Err(GateError::MissingAnswerContent));

        dialog.set_content(r#"<p><img src="data:image/png;base64,AA"></p>"#);
        assert!(dialog.can_submit());
    }

    #[test]
    fn edits_prefill_and_require_both_fields() {
        let mut dialog = ComposeDialog::edit_question(&question(3, 0, 0));
        dialog.open();
        assert_eq!(dialog.title, "Question 3");
        assert_eq!(dialog.content(), "<p>body</p>");

        dialog.title = " ".into();
        let gate = dialog.begin_submit().unwrap_err();
        assert_eq!(gate.to_string(), "Title and content cannot be empty.");

        let mut dialog = ComposeDialog::edit_answer(&answer(9));
        dialog.open();
        dialog.set_content("<p>fixed <script>x()</script>typo</p>");
        assert_eq!(dialog.preview(), Some(dialog.content()));
        assert!(!dialog.preview().unwrap_or_default().contains("script"));
        assert!(matches!(
            dialog.begin_submit(),
            Ok(Submission::UpdateAnswer { id, .. }) if id == EntityId::Number(9)
        ));
    }

    #[test]
    fn failure_messages() {
        let msg = |status, subject, intent| {
            SubmitFailure::classify(ApiError::status(status), subject, intent).message
        };
        assert_eq!(
            msg(401, Subject::Question, Intent::Create),
            "You need to be logged in to create a question."
        );
        assert_eq!(
            msg(400, Subject::Question, Intent::Create),
            "Please provide a title and content for the question."
        );
        assert_eq!(
            msg(500, Subject::Question, Intent::Create),
            "An error occurred while creating the question. Please try again."
        );
        assert_eq!(
            msg(500, Subject::Question, Intent::Edit),
            "Failed to edit question. Please try again."
        );
        assert_eq!(msg(404, Subject::Answer, Intent::Edit), "Failed to update answer");
        assert_eq!(
            msg(413, Subject::Answer, Intent::Edit),
            "The content is too large. Please reduce the size and try again."
        );
    }
}
