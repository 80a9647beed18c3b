//! Reply rendering: markup rewriting and length-limited chunking.

pub mod chunk;
pub mod format;
