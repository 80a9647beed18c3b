//! Infrastructure layer for Larisa.
//!
//! Contains the adapters behind the ports defined in `larisa-core`:
//! the Telegram Bot API client and the OpenRouter completion provider.

pub mod llm;
pub mod telegram;
