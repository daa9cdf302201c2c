//! Network adapters for the Tally budget editor.
//!
//! - [`RestBackend`] implements the core `BudgetBackend` port over HTTP.
//! - [`WsChannel`] implements `RealtimeChannel` over a WebSocket to the relay.

pub mod error;
pub mod realtime;
pub mod rest;

pub use error::ClientError;
pub use realtime::WsChannel;
pub use rest::RestBackend;
