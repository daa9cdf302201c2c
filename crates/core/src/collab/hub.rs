//! Room membership and relay.

use std::collections::HashMap;
use std::fmt;

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};
use uuid::Uuid;

use super::events::{RoomKey, ServerEvent};

/// Identifies one connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new time-ordered connection ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Members = HashMap<ConnectionId, UnboundedSender<ServerEvent>>;

/// Tracks which connections are in which rooms and fans events out.
#[derive(Debug, Default)]
pub struct RoomHub {
    rooms: DashMap<RoomKey, Members>,
}

impl RoomHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room. Joining twice replaces the sender.
    pub fn join(&self, room: RoomKey, conn: ConnectionId, tx: UnboundedSender<ServerEvent>) {
        debug!(%room, %conn, "Joined room");
        self.rooms.entry(room).or_default().insert(conn, tx);
    }

    /// Removes a connection from a room. Empty rooms are dropped.
    pub fn leave(&self, room: &RoomKey, conn: ConnectionId) -> bool {
        let removed = self
            .rooms
            .get_mut(room)
            .is_some_and(|mut members| members.remove(&conn).is_some());
        self.rooms.remove_if(room, |_, members| members.is_empty());
        if removed {
            debug!(%room, %conn, "Left room");
        }
        removed
    }

    /// Removes a connection from every room it joined.
    pub fn leave_all(&self, conn: ConnectionId) -> usize {
        let mut left = 0;
        for mut entry in self.rooms.iter_mut() {
            if entry.value_mut().remove(&conn).is_some() {
                left += 1;
            }
        }
        self.rooms.retain(|_, members| !members.is_empty());
        debug!(%conn, rooms = left, "Connection left all rooms");
        left
    }

    /// Sends an event to every member of its room except `from`.
    ///
    /// Members whose receiver is gone are pruned. Returns the number of
    /// members the event was delivered to.
    pub fn relay(&self, from: ConnectionId, event: &ServerEvent) -> usize {
        let room = event.room();
        let Some(mut members) = self.rooms.get_mut(room) else {
            trace!(%room, "Relay to unknown room dropped");
            return 0;
        };

        let mut delivered = 0;
        members.retain(|conn, tx| {
            if *conn == from {
                return true;
            }
            if tx.send(event.clone()).is_ok() {
                delivered += 1;
                true
            } else {
                debug!(%room, %conn, "Pruned closed member");
                false
            }
        });
        drop(members);
        self.rooms.remove_if(room, |_, members| members.is_empty());

        trace!(%room, %from, delivered, "Relayed event");
        delivered
    }

    /// Connections currently in a room.
    #[must_use]
    pub fn members(&self, room: &RoomKey) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of non-empty rooms.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
