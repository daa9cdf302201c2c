//! Real-time channel errors.

use tally_shared::AppError;
use thiserror::Error;

/// Errors raised by a [`RealtimeChannel`](super::RealtimeChannel).
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The connection could not be opened.
    #[error("Failed to connect: {0}")]
    Connect(String),

    /// No connection is open.
    #[error("Real-time channel is not connected")]
    NotConnected,

    /// A frame could not be written.
    #[error("Failed to send event: {0}")]
    SendFailed(String),

    /// A frame could not be encoded or decoded.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The connection was closed by the peer.
    #[error("Real-time channel closed")]
    Closed,
}

impl From<serde_json::Error> for ChannelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

impl From<ChannelError> for AppError {
    fn from(err: ChannelError) -> Self {
        Self::Channel(err.to_string())
    }
}
