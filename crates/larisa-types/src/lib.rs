//! Shared domain types for Larisa.
//!
//! This crate contains the types passed between the relay core and its
//! infrastructure adapters: chat identifiers, inbound messages, LLM
//! request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod error;
pub mod llm;
