//! Telegram Bot API transport.
//!
//! [`TelegramClient`] implements the `ChatTransport` port over plain HTTPS
//! calls and also exposes the `getUpdates` long poll used by the bot binary.

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::Update;
