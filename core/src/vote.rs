//! Voting on questions (optimistic) and answers (confirmed).

use std::collections::HashMap;

use bugbee_shared::{EntityId, VoteKind, VoteRequest, VoteTally};

use crate::api::ForumApi;
use crate::error::{ApiError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTarget {
    Question,
    Answer,
}

impl VoteTarget {
    fn noun(self) -> &'static str {
        match self {
            VoteTarget::Question => "question",
            VoteTarget::Answer => "answer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoteFailure {
    pub error: ApiError,
    /// Tally in effect after the failure (the pre-vote tally for questions).
    pub restored: Option<VoteTally>,
    pub message: String,
}

/// The tally with exactly the acted-upon counter incremented by one.
pub fn optimistic_tally(current: VoteTally, kind: VoteKind) -> VoteTally {
    match kind {
        VoteKind::Upvote => VoteTally {
            upvotes: current.upvotes + 1,
            ..current
        },
        VoteKind::Downvote => VoteTally {
            downvotes: current.downvotes + 1,
            ..current
        },
    }
}

pub fn success_message(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Upvote => "Upvote registered",
        VoteKind::Downvote => "Downvote registered",
    }
}

pub fn failure_message(target: VoteTarget, kind: VoteKind, error: &ApiError) -> String {
    let noun = target.noun();
    match error.kind() {
        ErrorKind::Forbidden => format!("You can't vote on your own {noun}"),
        ErrorKind::NotFound => match target {
            VoteTarget::Question => "Question not found".to_string(),
            VoteTarget::Answer => "Answer not found".to_string(),
        },
        ErrorKind::BadRequest => "Invalid request".to_string(),
        _ => format!("Failed to {} {noun}: {error}", kind.as_str()),
    }
}

/// Optimistically vote on a question.
///
/// `apply` receives every tally that should become visible: first the local
/// guess, then either the server's tally or the pre-vote tally on failure.
/// Exactly one request is issued.
pub async fn vote_question<A, F>(
    api: &A,
    id: &EntityId,
    kind: VoteKind,
    current: VoteTally,
    mut apply: F,
) -> Result<VoteTally, VoteFailure>
where
    A: ForumApi + ?Sized,
    F: FnMut(VoteTally),
{
    let rollback = current;
    apply(optimistic_tally(current, kind));

    match api.vote(&VoteRequest::question(id.clone(), kind)).await {
        Ok(result) => {
            apply(result.votes);
            Ok(result.votes)
        }
        Err(error) => {
            tracing::warn!(question = %id, %error, "question vote failed, rolling back");
            apply(rollback);
            Err(VoteFailure {
                message: failure_message(VoteTarget::Question, kind, &error),
                restored: Some(rollback),
                error,
            })
        }
    }
}

/// Vote on an answer. Nothing is written until the server answers.
pub async fn vote_answer<A>(api: &A, id: &EntityId, kind: VoteKind) -> Result<VoteTally, VoteFailure>
where
    A: ForumApi + ?Sized,
{
    api.vote(&VoteRequest::answer(id.clone(), kind))
        .await
        .map(|result| result.votes)
        .map_err(|error| {
            tracing::warn!(answer = %id, %error, "answer vote failed");
            VoteFailure {
                message: failure_message(VoteTarget::Answer, kind, &error),
                restored: None,
                error,
            }
        })
}

/// Ids voted on during this page session. Resets on reload; the server
/// remains the authority on vote uniqueness.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VotedItems {
    questions: HashMap<EntityId, VoteKind>,
    answers: HashMap<EntityId, VoteKind>,
}

impl VotedItems {
    pub fn mark(&mut self, target: VoteTarget, id: EntityId, kind: VoteKind) {
        match target {
            VoteTarget::Question => self.questions.insert(id, kind),
            VoteTarget::Answer => self.answers.insert(id, kind),
        };
    }

    pub fn has_voted(&self, target: VoteTarget, id: &EntityId) -> bool {
        match target {
            VoteTarget::Question => self.questions.contains_key(id),
            VoteTarget::Answer => self.answers.contains_key(id),
        }
    }
}

/// How vote controls render for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteControls {
    /// Own content: no controls.
    Hidden,
    Disabled,
    Enabled,
}

pub fn vote_controls(own: bool, voted: bool, in_flight: bool) -> VoteControls {
    if own {
        VoteControls::Hidden
    } else if voted || in_flight {
        VoteControls::Disabled
    } else {
        VoteControls::Enabled
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::MockApi;
    use bugbee_shared::VoteResult;

    #[test]
    fn optimistic_increments_only_the_matching_counter() {
        let t = VoteTally::new(3, 1);
        assert_eq!(optimistic_tally(t, VoteKind::Upvote), VoteTally::new(4, 1));
        assert_eq!(optimistic_tally(t, VoteKind::Downvote), VoteTally::new(3, 2));
    }

    #[tokio::test]
    async fn guess_is_written_before_the_request_and_replaced_by_the_server() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let api = MockApi::with_log(log.clone());
        api.votes.borrow_mut().push_back(Ok(VoteResult {
            votes: VoteTally::new(5, 1),
        }));

        let seen = RefCell::new(Vec::new());
        let result = vote_question(&api, &42.into(), VoteKind::Upvote, VoteTally::new(3, 1), |t| {
            log.borrow_mut().push(format!("apply:{}/{}", t.upvotes, t.downvotes));
            seen.borrow_mut().push(t);
        })
        .await;

        assert_eq!(result, Ok(VoteTally::new(5, 1)));
        assert_eq!(
            *log.borrow(),
            vec!["apply:4/1", "vote:upvote:q42", "apply:5/1"]
        );
        assert_eq!(seen.borrow().last(), Some(&VoteTally::new(5, 1)));
    }

    #[tokio::test]
    async fn forbidden_vote_rolls_back_to_the_pre_vote_tally() {
        let api = MockApi::default();
        api.votes.borrow_mut().push_back(Err(ApiError::status(403)));

        let mut seen = Vec::new();
        let failure = vote_question(&api, &42.into(), VoteKind::Upvote, VoteTally::new(3, 1), |t| {
            seen.push(t)
        })
        .await
        .unwrap_err();

        assert_eq!(seen, vec![VoteTally::new(4, 1), VoteTally::new(3, 1)]);
        assert_eq!(failure.restored, Some(VoteTally::new(3, 1)));
        assert_eq!(failure.message, "You can't vote on your own question");
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn every_failure_kind_restores_exactly() {
        for error in [
            ApiError::status(400),
            ApiError::status(404),
            ApiError::status(500),
            ApiError::Network("offline".into()),
        ] {
            let api = MockApi::default();
            api.votes.borrow_mut().push_back(Err(error));
            let mut last = None;
            let _ = vote_question(&api, &1.into(), VoteKind::Downvote, VoteTally::new(0, 7), |t| {
                last = Some(t)
            })
            .await;
            assert_eq!(last, Some(VoteTally::new(0, 7)));
        }
    }

    #[tokio::test]
    async fn answer_votes_write_nothing_before_the_server() {
        let api = MockApi::default();
        api.votes.borrow_mut().push_back(Ok(VoteResult {
            votes: VoteTally::new(1, 0),
        }));

        let tally = vote_answer(&api, &"a1".into(), VoteKind::Upvote).await.unwrap();
        assert_eq!(tally, VoteTally::new(1, 0));
        assert_eq!(api.calls(), vec!["vote:upvote:aa1"]);
    }

    #[tokio::test]
    async fn answer_vote_failure_has_no_restored_tally() {
        let api = MockApi::default();
        api.votes.borrow_mut().push_back(Err(ApiError::status(403)));

        let failure = vote_answer(&api, &3.into(), VoteKind::Upvote).await.unwrap_err();
        assert_eq!(failure.restored, None);
        assert_eq!(failure.message, "You can't vote on your own answer");
    }

    #[test]
    fn failure_messages_by_status() {
        let q = VoteTarget::Question;
        assert_eq!(
            failure_message(q, VoteKind::Upvote, &ApiError::status(404)),
            "Question not found"
        );
        assert_eq!(
            failure_message(q, VoteKind::Upvote, &ApiError::status(400)),
            "Invalid request"
        );
        assert_eq!(
            failure_message(q, VoteKind::Downvote, &ApiError::status(500)),
            "Failed to downvote question: request failed with status 500"
        );
    }

    #[test]
    fn voted_items_disable_controls() {
        let mut voted = VotedItems::default();
        let id: EntityId = 42.into();
        assert!(!voted.has_voted(VoteTarget::Question, &id));

        voted.mark(VoteTarget::Question, id.clone(), VoteKind::Upvote);
        assert!(voted.has_voted(VoteTarget::Question, &id));
        assert!(!voted.has_voted(VoteTarget::Answer, &id));

        let controls = vote_controls(false, voted.has_voted(VoteTarget::Question, &id), false);
        assert_eq!(controls, VoteControls::Disabled);
        assert_eq!(vote_controls(true, false, false), VoteControls::Hidden);
        assert_eq!(vote_controls(false, false, true), VoteControls::Disabled);
        assert_eq!(vote_controls(false, false, false), VoteControls::Enabled);
    }
}
