//! Conversation state and inbound message routing.

pub mod commands;
pub mod dispatcher;
pub mod session;
