//! Real-time channel port and the in-process implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

use super::error::ChannelError;
use super::events::{ClientEvent, RoomKey, ServerEvent};
use super::hub::{ConnectionId, RoomHub};

/// Inbound events for one room. Dropping the handle detaches it.
#[derive(Debug)]
pub struct RoomSubscription {
    room: RoomKey,
    rx: UnboundedReceiver<ServerEvent>,
}

impl RoomSubscription {
    /// Wraps a receiver that only yields events for `room`.
    #[must_use]
    pub fn new(room: RoomKey, rx: UnboundedReceiver<ServerEvent>) -> Self {
        Self { room, rx }
    }

    /// Room this subscription listens to.
    #[must_use]
    pub fn room(&self) -> &RoomKey {
        &self.room
    }

    /// Waits for the next event. `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.rx.try_recv().ok()
    }
}

/// A connection to the budget room relay.
///
/// Delivery is best-effort: there is no retry and no offline queue.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    /// Opens the connection.
    async fn connect(&self) -> Result<(), ChannelError>;

    /// Joins a room and returns its inbound events.
    async fn join(&self, room: &RoomKey) -> Result<RoomSubscription, ChannelError>;

    /// Sends an event to the other members of its room.
    async fn emit(&self, event: ClientEvent) -> Result<(), ChannelError>;

    /// Leaves a room.
    async fn leave(&self, room: &RoomKey) -> Result<(), ChannelError>;

    /// Closes the connection and leaves every room.
    async fn disconnect(&self);

    /// Returns true while connected.
    fn is_connected(&self) -> bool;
}

/// Channel that talks to a [`RoomHub`] in the same process.
pub struct LocalChannel {
    hub: Arc<RoomHub>,
    conn: ConnectionId,
    connected: AtomicBool,
}

impl LocalChannel {
    /// Creates a disconnected channel on `hub`.
    #[must_use]
    pub fn new(hub: Arc<RoomHub>) -> Self {
        Self {
            hub,
            conn: ConnectionId::new(),
            connected: AtomicBool::new(false),
        }
    }

    /// Creates a channel and connects it.
    #[must_use]
    pub fn connected(hub: Arc<RoomHub>) -> Self {
        let channel = Self::new(hub);
        channel.connected.store(true, Ordering::SeqCst);
        channel
    }

    /// This channel's connection ID on the hub.
    #[must_use]
    pub const fn connection_id(&self) -> ConnectionId {
        self.conn
    }

    fn ensure_connected(&self) -> Result<(), ChannelError> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ChannelError::NotConnected)
        }
    }
}

#[async_trait]
impl RealtimeChannel for LocalChannel {
    async fn connect(&self) -> Result<(), ChannelError> {
        self.connected.store(true, Ordering::SeqCst);
        debug!(conn = %self.conn, "Local channel connected");
        Ok(())
    }

    async fn join(&self, room: &RoomKey) -> Result<RoomSubscription, ChannelError> {
        self.ensure_connected()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.hub.join(room.clone(), self.conn, tx);
        Ok(RoomSubscription::new(room.clone(), rx))
    }

    async fn emit(&self, event: ClientEvent) -> Result<(), ChannelError> {
        self.ensure_connected()?;
        match event {
            ClientEvent::JoinBudgetRoom(_) => Err(ChannelError::Protocol(
                "join through RealtimeChannel::join".into(),
            )),
            ClientEvent::LeaveBudgetRoom(room) => {
                self.hub.leave(&room, self.conn);
                Ok(())
            }
            other => {
                if let Some(relayed) = other.relay() {
                    self.hub.relay(self.conn, &relayed);
                }
                Ok(())
            }
        }
    }

    async fn leave(&self, room: &RoomKey) -> Result<(), ChannelError> {
        self.ensure_connected()?;
        self.hub.leave(room, self.conn);
        Ok(())
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.hub.leave_all(self.conn);
            debug!(conn = %self.conn, "Local channel disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
