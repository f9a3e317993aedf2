//! The application store: four slices mutated only through [`Store::dispatch`].

use bugbee_shared::{Answer, EntityId, Question, User, VoteTally};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSlice {
    pub user: Option<User>,
    /// The initial session lookup has finished (either way).
    pub resolved: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSlice {
    pub sidebar_collapsed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionsSlice {
    pub list: Vec<Question>,
    pub mine: Vec<Question>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Answers of the currently selected question only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswersSlice {
    pub list: Vec<Answer>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub auth: AuthSlice,
    pub app: AppSlice,
    pub questions: QuestionsSlice,
    pub answers: AnswersSlice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignedIn(User),
    SetUser(Option<User>),
    SignedOut,
    NewsletterSubscribed,

    ToggleSidebar,
    SetSidebarCollapsed(bool),

    QuestionsLoading(bool),
    QuestionsLoaded(Vec<Question>),
    QuestionsFailed(String),
    MyQuestionsLoaded(Vec<Question>),
    QuestionVotes { id: EntityId, votes: VoteTally },

    AnswersLoading(bool),
    AnswersLoaded(Vec<Answer>),
    AnswersFailed(String),
    AnswerAdded(Answer),
    AnswerUpdated(Answer),
    AnswerRemoved(EntityId),
    AnswerVotes { id: EntityId, votes: VoteTally },
}

impl Store {
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SignedIn(user) => {
                self.auth.user = Some(user);
                self.auth.resolved = true;
            }
            Action::SetUser(user) => {
                self.auth.user = user;
                self.auth.resolved = true;
            }
            Action::SignedOut => {
                self.auth.user = None;
                self.questions.mine.clear();
            }
            Action::NewsletterSubscribed => {
                if let Some(user) = self.auth.user.as_mut() {
                    user.is_news_letter_subscribed = true;
                }
            }

            Action::ToggleSidebar => {
                self.app.sidebar_collapsed = !self.app.sidebar_collapsed;
            }
            Action::SetSidebarCollapsed(collapsed) => self.app.sidebar_collapsed = collapsed,

            Action::QuestionsLoading(loading) => self.questions.loading = loading,
            Action::QuestionsLoaded(list) => {
                self.questions.list = list;
                self.questions.loading = false;
                self.questions.error = None;
            }
            Action::QuestionsFailed(message) => {
                self.questions.error = Some(message);
                self.questions.loading = false;
            }
            Action::MyQuestionsLoaded(list) => self.questions.mine = list,
            Action::QuestionVotes { id, votes } => {
                let slice = &mut self.questions;
                for q in slice.list.iter_mut().chain(slice.mine.iter_mut()) {
                    if q.id == id {
                        q.votes = votes;
                    }
                }
            }

            Action::AnswersLoading(loading) => self.answers.loading = loading,
            Action::AnswersLoaded(list) => {
                self.answers.list = list;
                self.answers.loading = false;
                self.answers.error = None;
            }
            Action::AnswersFailed(message) => {
                self.answers.error = Some(message);
                self.answers.loading = false;
            }
            Action::AnswerAdded(answer) => self.answers.list.push(answer),
            Action::AnswerUpdated(answer) => {
                if let Some(slot) = self.answers.list.iter_mut().find(|a| a.id == answer.id) {
                    *slot = answer;
                }
            }
            Action::AnswerRemoved(id) => self.answers.list.retain(|a| a.id != id),
            Action::AnswerVotes { id, votes } => {
                if let Some(answer) = self.answers.list.iter_mut().find(|a| a.id == id) {
                    answer.votes = votes;
                }
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.user.as_ref()
    }

    /// Whether the signed-in user authored content owned by `author`.
    pub fn is_own(&self, author: Option<&EntityId>) -> bool {
        match (self.auth.user.as_ref(), author) {
            (Some(user), Some(author)) => &user.id == author,
            _ => false,
        }
    }

    pub fn question(&self, id: &EntityId) -> Option<&Question> {
        self.questions
            .list
            .iter()
            .chain(self.questions.mine.iter())
            .find(|q| &q.id == id)
    }
}
