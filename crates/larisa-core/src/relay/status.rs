//! Ephemeral "working" status messages.
//!
//! While a completion is in flight the user sees a message whose trailing
//! ellipsis grows from two to five dots and starts over. The animation runs
//! in its own task and stops when the handle's cancellation token fires;
//! deleting the message is left to the orchestrator.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use larisa_types::chat::{ChatId, MessageId, UserId};

use crate::transport::box_transport::BoxChatTransport;

/// Animation frames, in order. The status message is posted with the first.
pub const STATUS_FRAMES: [&str; 4] = [
    "⏳ Larisa is thinking..",
    "⏳ Larisa is thinking...",
    "⏳ Larisa is thinking....",
    "⏳ Larisa is thinking.....",
];

/// One user's live status message.
///
/// The handle is active until [`StatusHandle::deactivate`] cancels its token.
/// Clones share the token.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    cancel: CancellationToken,
}

impl StatusHandle {
    pub fn new(chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            chat_id,
            message_id,
            cancel: CancellationToken::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop the animation bound to this handle.
    pub fn deactivate(&self) {
        self.cancel.cancel();
    }

    /// Token the animator observes.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Live status handles keyed by user.
#[derive(Debug, Clone, Default)]
pub struct StatusRegistry {
    inner: Arc<DashMap<UserId, StatusHandle>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` as the user's status message.
    ///
    /// A handle already registered for the user is deactivated and returned.
    pub fn register(&self, user_id: UserId, handle: StatusHandle) -> Option<StatusHandle> {
        let previous = self.inner.insert(user_id, handle);
        if let Some(prev) = &previous {
            warn!(%user_id, message_id = %prev.message_id, "replacing live status handle");
            prev.deactivate();
        }
        previous
    }

    /// Remove the user's handle, but only if it still refers to `message_id`.
    pub fn remove(&self, user_id: UserId, message_id: MessageId) -> Option<StatusHandle> {
        self.inner
            .remove_if(&user_id, |_, h| h.message_id == message_id)
            .map(|(_, h)| h)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Drives the frame loop of status messages.
#[derive(Clone)]
pub struct StatusAnimator {
    transport: BoxChatTransport,
    interval: Duration,
}

impl StatusAnimator {
    pub fn new(transport: BoxChatTransport, interval: Duration) -> Self {
        Self {
            transport,
            interval,
        }
    }

    /// Spawn the animation loop for `handle`.
    ///
    /// The task edits the message to the next frame, then waits `interval`,
    /// until the handle is deactivated. A "message is not modified" rejection
    /// is skipped; any other edit error ends the loop. The returned task
    /// resolves to the number of edits attempted.
    pub fn start(&self, handle: &StatusHandle) -> JoinHandle<usize> {
        let transport = self.transport.clone();
        let interval = self.interval;
        let chat_id = handle.chat_id;
        let message_id = handle.message_id;
        let handle = handle.clone();
        let token = handle.token();

        tokio::spawn(async move {
            let mut frame = 1;
            let mut attempts = 0;

            while handle.is_active() {
                attempts += 1;
                let text = STATUS_FRAMES[frame % STATUS_FRAMES.len()];
                match transport.edit_message_text(chat_id, message_id, text).await {
                    Ok(()) => {}
                    Err(e) if e.is_not_modified() => {
                        debug!(%chat_id, %message_id, "status frame unchanged");
                    }
                    Err(e) => {
                        debug!(%chat_id, %message_id, error = %e, "status animation stopped");
                        break;
                    }
                }
                frame += 1;

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }

            attempts
        })
    }
}
