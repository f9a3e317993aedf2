//! Background synchronization: fixed-interval polling bound to a view's
//! lifetime, and stale-response protection.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bugbee_shared::VoteTally;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    pub interval: Duration,
    /// Run the first tick before the first sleep.
    pub immediate: bool,
}

/// Notifications refresh while a session exists.
pub const NOTIFICATION_POLL: PollPlan = PollPlan {
    interval: Duration::from_secs(6),
    immediate: true,
};

/// Vote reconciliation for the open question.
pub const QUESTION_SYNC: PollPlan = PollPlan {
    interval: Duration::from_secs(60),
    immediate: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Generation counter owned by one view instance.
///
/// Work started under a [`Ticket`] stays valid until the epoch advances
/// (sign-out, deselection, unmount). Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Ticket {
        Ticket(self.0.load(Ordering::SeqCst))
    }

    /// Invalidate every outstanding ticket and hand out a fresh one.
    pub fn advance(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if it was requested under the current ticket.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!("discarding stale response");
            None
        }
    }
}

/// Run `tick` every `plan.interval` while `ticket` is current.
///
/// The ticket is checked after every sleep, so the loop ends within one
/// interval of the epoch advancing. Returns the number of ticks run.
pub async fn poll<S, SF, T, TF>(
    epoch: &Epoch,
    ticket: Ticket,
    plan: PollPlan,
    mut sleep: S,
    mut tick: T,
) -> u64
where
    S: FnMut(Duration) -> SF,
    SF: Future<Output = ()>,
    T: FnMut() -> TF,
    TF: Future<Output = ()>,
{
    let mut ticks = 0;
    if plan.immediate && epoch.is_current(ticket) {
        tick().await;
        ticks += 1;
    }
    while epoch.is_current(ticket) {
        sleep(plan.interval).await;
        if !epoch.is_current(ticket) {
            break;
        }
        tick().await;
        ticks += 1;
    }
    tracing::debug!(ticks, interval = ?plan.interval, "poll loop stopped");
    ticks
}

/// The server tally, when it differs from what is displayed.
pub fn reconcile(local: VoteTally, server: VoteTally) -> Option<VoteTally> {
    (local != server).then_some(server)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::notify::NotificationFeed;
    use crate::testing::{notification, MockApi};

    #[tokio::test]
    async fn stale_ticket_never_ticks() {
        let epoch = Epoch::new();
        let ticket = epoch.current();
        epoch.advance();

        let api = MockApi::default();
        let api = &api;
        let ticks = poll(
            &epoch,
            ticket,
            NOTIFICATION_POLL,
            |_| async {},
            move || async move {
                let _ = NotificationFeed::refresh(api).await;
            },
        )
        .await;

        assert_eq!(ticks, 0);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn loop_stops_within_one_tick_of_sign_out() {
        let epoch = Epoch::new();
        let ticket = epoch.current();
        let api = MockApi::default();
        for _ in 0..10 {
            api.notifications
                .borrow_mut()
                .push_back(Ok(vec![notification(1, "x", false)]));
        }

        let sleeps = Cell::new(0);
        let feed = RefCell::new(NotificationFeed::default());
        let (api_ref, epoch_ref, sleeps_ref, feed_ref) = (&api, &epoch, &sleeps, &feed);

        let ticks = poll(
            &epoch,
            ticket,
            NOTIFICATION_POLL,
            move |interval| {
                assert_eq!(interval, Duration::from_secs(6));
                sleeps_ref.set(sleeps_ref.get() + 1);
                if sleeps_ref.get() == 3 {
                    // Sign-out lands while the loop is sleeping.
                    epoch_ref.advance();
                }
                async {}
            },
            move || async move {
                if let Ok(fresh) = NotificationFeed::refresh(api_ref).await {
                    if let Some(fresh) = epoch_ref.accept(ticket, fresh) {
                        *feed_ref.borrow_mut() = fresh;
                    }
                }
            },
        )
        .await;

        assert_eq!(ticks, 3);
        assert_eq!(api.calls().len(), 3);
        assert_eq!(feed.borrow().unread, 1);
    }

    #[tokio::test]
    async fn delayed_plan_sleeps_first() {
        let epoch = Epoch::new();
        let ticket = epoch.current();
        let order = RefCell::new(Vec::new());
        let (epoch_ref, order_ref) = (&epoch, &order);

        poll(
            &epoch,
            ticket,
            QUESTION_SYNC,
            move |_| {
                order_ref.borrow_mut().push("sleep");
                async {}
            },
            move || {
                order_ref.borrow_mut().push("tick");
                epoch_ref.advance();
                async {}
            },
        )
        .await;

        assert_eq!(*order.borrow(), vec!["sleep", "tick"]);
    }

    #[test]
    fn accept_discards_stale_values() {
        let epoch = Epoch::new();
        let old = epoch.current();
        let fresh = epoch.advance();
        assert_eq!(epoch.accept(old, 1), None);
        assert_eq!(epoch.accept(fresh, 2), Some(2));

        let shared = epoch.clone();
        shared.advance();
        assert!(!epoch.is_current(fresh));
    }

    #[test]
    fn reconcile_only_on_difference() {
        let t = VoteTally::new(4, 1);
        assert_eq!(reconcile(t, t), None);
        assert_eq!(reconcile(t, VoteTally::new(6, 1)), Some(VoteTally::new(6, 1)));
    }
}
