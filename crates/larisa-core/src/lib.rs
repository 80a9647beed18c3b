//! Relay logic and port trait definitions for Larisa.
//!
//! This crate defines the "ports" (`ChatTransport`, `LlmProvider`) that the
//! infrastructure layer implements, plus everything that runs between them:
//! reply formatting, chunking, session history, the status animation and the
//! request orchestrator. It depends only on `larisa-types` -- never on
//! `larisa-infra` or any HTTP crate.

pub mod chat;
pub mod llm;
pub mod relay;
pub mod render;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
