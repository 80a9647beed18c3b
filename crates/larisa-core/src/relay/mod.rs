//! The completion relay: status animation, provider call, reply delivery.

pub mod config;
pub mod orchestrator;
pub mod replies;
pub mod status;
pub mod turns;
