//! Completion provider abstractions for Larisa.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe, cloneable wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;
