//! WebSocket connection to the budget room relay.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tally_core::collab::{ChannelError, ClientEvent, RealtimeChannel, RoomKey, RoomSubscription, ServerEvent};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

type Routes = Arc<Mutex<HashMap<RoomKey, UnboundedSender<ServerEvent>>>>;

struct Connection {
    outbound: UnboundedSender<Message>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// [`RealtimeChannel`] over a WebSocket.
///
/// A reader task routes inbound frames to room subscriptions and a writer
/// task drains outbound frames. Events emitted while disconnected are
/// dropped.
pub struct WsChannel {
    url: String,
    connection: Mutex<Option<Connection>>,
    routes: Routes,
    connected: Arc<AtomicBool>,
}

impl WsChannel {
    /// Creates a disconnected channel for `url` (e.g. `ws://localhost:8090/ws`).
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection: Mutex::new(None),
            routes: Arc::new(Mutex::new(HashMap::new())),
            connected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Relay URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn send_event(&self, event: &ClientEvent) -> Result<(), ChannelError> {
        if !self.is_connected() {
            warn!(event = event.name(), room = %event.room(), "Dropped event while disconnected");
            return Err(ChannelError::NotConnected);
        }
        let frame = serde_json::to_string(event)?;
        let guard = self.connection.lock();
        let connection = guard.as_ref().ok_or(ChannelError::NotConnected)?;
        connection
            .outbound
            .send(Message::Text(frame.into()))
            .map_err(|_| ChannelError::Closed)
    }
}

fn route(routes: &Routes, text: &str) {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => {
            let routes = routes.lock();
            match routes.get(event.room()) {
                Some(tx) => {
                    // Subscriber dropped its handle.
                    let _ = tx.send(event);
                }
                None => debug!(room = %event.room(), "Event for a room we are not in"),
            }
        }
        Err(e) => warn!(error = %e, "Ignored malformed frame"),
    }
}

#[async_trait]
impl RealtimeChannel for WsChannel {
    async fn connect(&self) -> Result<(), ChannelError> {
        if self.is_connected() {
            return Ok(());
        }
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        let (mut sink, mut source) = stream.split();
        let (outbound, mut rx) = mpsc::unbounded_channel::<Message>();

        let writer = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = sink.send(message).await {
                    warn!(error = %e, "WebSocket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let routes = Arc::clone(&self.routes);
        let connected = Arc::clone(&self.connected);
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => route(&routes, text.as_str()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::SeqCst);
            routes.lock().clear();
            info!("Real-time channel closed");
        });

        *self.connection.lock() = Some(Connection {
            outbound,
            reader,
            writer,
        });
        self.connected.store(true, Ordering::SeqCst);
        info!(url = %self.url, "Real-time channel connected");
        Ok(())
    }

    async fn join(&self, room: &RoomKey) -> Result<RoomSubscription, ChannelError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.lock().insert(room.clone(), tx);
        if let Err(e) = self.send_event(&ClientEvent::JoinBudgetRoom(room.clone())) {
            self.routes.lock().remove(room);
            return Err(e);
        }
        debug!(%room, "Joined room");
        Ok(RoomSubscription::new(room.clone(), rx))
    }

    async fn emit(&self, event: ClientEvent) -> Result<(), ChannelError> {
        self.send_event(&event)
    }

    async fn leave(&self, room: &RoomKey) -> Result<(), ChannelError> {
        self.routes.lock().remove(room);
        self.send_event(&ClientEvent::LeaveBudgetRoom(room.clone()))
    }

    async fn disconnect(&self) {
        let connection = self.connection.lock().take();
        self.connected.store(false, Ordering::SeqCst);
        self.routes.lock().clear();
        if let Some(connection) = connection {
            let _ = connection.outbound.send(Message::Close(None));
            drop(connection.outbound);
            if connection.writer.await.is_err() {
                debug!("Writer task ended abnormally");
            }
            connection.reader.abort();
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.get_mut().take() {
            connection.reader.abort();
            connection.writer.abort();
        }
    }
}
