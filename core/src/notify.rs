use bugbee_shared::Notification;

use crate::api::ForumApi;
use crate::error::ApiError;

/// Icon family for a notification, derived from its message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Answer,
    Like,
    Comment,
    Other,
}

impl NotificationKind {
    pub fn classify(message: &str) -> Self {
        if message.contains("has received a new answer") {
            NotificationKind::Answer
        } else if message.contains("has received a like") {
            NotificationKind::Like
        } else if message.contains("has been commented on") {
            NotificationKind::Comment
        } else {
            NotificationKind::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFeed {
    pub items: Vec<Notification>,
    pub unread: usize,
}

impl NotificationFeed {
    pub fn from_items(items: Vec<Notification>) -> Self {
        let unread = items.iter().filter(|n| !n.read).count();
        Self { items, unread }
    }

    /// Fetch the full list; the caller replaces its feed wholesale.
    pub async fn refresh<A: ForumApi + ?Sized>(api: &A) -> Result<Self, ApiError> {
        api.notifications().await.map(Self::from_items)
    }

    pub fn can_mark_read(&self, marking: bool) -> bool {
        self.unread > 0 && !marking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{notification, MockApi};

    #[test]
    fn classifies_by_substring() {
        assert_eq!(
            NotificationKind::classify("Your question has received a new answer"),
            NotificationKind::Answer
        );
        assert_eq!(
            NotificationKind::classify("Your answer has received a like"),
            NotificationKind::Like
        );
        assert_eq!(
            NotificationKind::classify("Your post has been commented on"),
            NotificationKind::Comment
        );
        assert_eq!(NotificationKind::classify("Welcome!"), NotificationKind::Other);
    }

    #[tokio::test]
    async fn refresh_counts_unread() {
        let api = MockApi::default();
        api.notifications.borrow_mut().push_back(Ok(vec![
            notification(1, "a", false),
            notification(2, "b", true),
            notification(3, "c", false),
        ]));

        let feed = NotificationFeed::refresh(&api).await.unwrap();
        assert_eq!(feed.items.len(), 3);
        assert_eq!(feed.unread, 2);
        assert!(feed.can_mark_read(false));
        assert!(!feed.can_mark_read(true));
        assert!(!NotificationFeed::default().can_mark_read(false));
    }
}
