//! In-memory conversation history per user.
//!
//! `SessionStore` is a concurrent map backed by `DashMap`. Turns are cloned
//! out on read so no `DashMap` guard is ever held across an `.await`.
//! History lives for the lifetime of the process only.

use std::sync::Arc;

use dashmap::DashMap;

use larisa_types::chat::UserId;
use larisa_types::llm::{Message, MessageRole};

/// Number of most recent turns sent with each completion request.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Conversation history keyed by user.
///
/// Cloning produces a shared view of the same underlying data (backed by `Arc`).
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<DashMap<UserId, Vec<Message>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the user's history, creating the session on first use.
    pub fn append(&self, user_id: UserId, role: MessageRole, content: impl Into<String>) {
        self.inner.entry(user_id).or_default().push(Message {
            role,
            content: content.into(),
        });
    }

    /// The last `n` turns of the user's history, oldest first.
    pub fn window(&self, user_id: UserId, n: usize) -> Vec<Message> {
        self.inner
            .get(&user_id)
            .map(|turns| {
                let start = turns.len().saturating_sub(n);
                turns[start..].to_vec()
            })
            .unwrap_or_default()
    }

    /// Forget the user's history. The session itself is kept.
    pub fn clear(&self, user_id: UserId) {
        if let Some(mut turns) = self.inner.get_mut(&user_id) {
            turns.clear();
        }
    }

    /// Number of stored turns for the user.
    pub fn len(&self, user_id: UserId) -> usize {
        self.inner.get(&user_id).map(|t| t.len()).unwrap_or(0)
    }

    /// Whether the user has no stored turns.
    pub fn is_empty(&self, user_id: UserId) -> bool {
        self.len(user_id) == 0
    }
}
