//! Tunables for the completion relay.

use std::time::Duration;

use crate::chat::session::DEFAULT_HISTORY_WINDOW;
use crate::render::chunk::MAX_MESSAGE_LEN;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3.1:free";

/// Runtime configuration for [`super::orchestrator::RelayOrchestrator`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Model id sent with every completion request.
    pub model: String,
    /// Number of most recent turns sent as context.
    pub history_window: usize,
    /// Longest message the transport accepts, in characters.
    pub max_message_len: usize,
    /// Delay between status animation frames.
    pub frame_interval: Duration,
    /// Pause between stopping the animation and deleting the status message,
    /// letting an in-flight edit land first.
    pub settle_delay: Duration,
    /// Pause before each reply chunk after the first.
    pub chunk_pause: Duration,
}

impl RelayConfig {
    /// Default timings with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            max_message_len: MAX_MESSAGE_LEN,
            frame_interval: Duration::from_millis(1500),
            settle_delay: Duration::from_millis(500),
            chunk_pause: Duration::from_millis(500),
        }
    }
}
