//! Per-user turn queue.
//!
//! A [`Turn`] is reserved synchronously when a message arrives, before the
//! task handling it is spawned. Each turn waits for the user's previous turn
//! to finish, so a user's messages are answered in arrival order regardless
//! of which task the runtime polls first.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::oneshot;

use larisa_types::chat::UserId;

/// Sent by a turn dropped before it ever ran: hands its own predecessor on to
/// the next turn so the chain stays intact.
#[derive(Debug)]
struct Handoff(Option<oneshot::Receiver<Handoff>>);

/// Latest reserved turn per user: its ticket and the receiver that resolves
/// once it finishes.
type Tails = DashMap<UserId, (u64, oneshot::Receiver<Handoff>)>;

/// Hands out turns in reservation order, per user.
#[derive(Debug, Default)]
pub struct TurnQueue {
    tails: Arc<Tails>,
    next_ticket: AtomicU64,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next turn for `user_id`.
    ///
    /// Call this in arrival order, outside the spawned task.
    pub fn reserve(&self, user_id: UserId) -> Turn {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let (done, finished) = oneshot::channel();
        let previous = self
            .tails
            .insert(user_id, (ticket, finished))
            .map(|(_, receiver)| receiver);

        Turn {
            user_id,
            ticket,
            previous,
            done: Some(done),
            tails: self.tails.clone(),
        }
    }

    /// Number of users with a reserved or running turn.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.tails.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.tails.is_empty()
    }
}

/// A reserved place in one user's queue. Dropping it ends the turn.
#[derive(Debug)]
pub struct Turn {
    user_id: UserId,
    ticket: u64,
    previous: Option<oneshot::Receiver<Handoff>>,
    done: Option<oneshot::Sender<Handoff>>,
    tails: Arc<Tails>,
}

impl Turn {
    /// Wait until every earlier turn of the same user has finished.
    ///
    /// Cancel safe: an interrupted wait can be resumed.
    pub async fn ready(&mut self) {
        while let Some(previous) = self.previous.as_mut() {
            self.previous = match previous.await {
                Ok(Handoff(next)) => next,
                // Sender dropped: the earlier turn is over.
                Err(_) => None,
            };
        }
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        if let (Some(previous), Some(done)) = (self.previous.take(), self.done.take()) {
            let _ = done.send(Handoff(Some(previous)));
        }
        let ticket = self.ticket;
        self.tails.remove_if(&self.user_id, |_, (t, _)| *t == ticket);
    }
}
