//! cloudmodel-transport: the bidirectional message channel the engine and
//! server are driven over (spec §4.3, §9 "Transport abstraction").
//!
//! The engine and server serializer never depend on this crate's concrete
//! implementations — they're written against [`MessageChannel`] so the
//! real WebSocket transport and the in-memory test transport are
//! interchangeable.

mod channel;
mod error;
mod ws_client;
mod ws_server;

#[cfg(any(test, feature = "test-support"))]
mod in_memory;

pub use channel::MessageChannel;
pub use error::TransportError;
pub use ws_client::WsClientChannel;
pub use ws_server::WsServerChannel;

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::{InMemoryChannel, in_memory_pair};
