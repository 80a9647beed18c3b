//! Chat transport port.
//!
//! - `ChatTransport`: RPITIT trait implemented by transport adapters
//! - `BoxChatTransport`: Object-safe, cloneable wrapper shared with spawned tasks

pub mod box_transport;
pub mod port;
