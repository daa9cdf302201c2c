//! WebSocket relay endpoint.
//!
//! Each connection gets its own ID and may join any number of rooms. Text
//! frames carry [`ClientEvent`]s; every non-membership event is forwarded to
//! the other members of its room as the matching [`ServerEvent`]. Closing
//! the socket removes the connection from all rooms.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use futures::{SinkExt, StreamExt};
use tally_core::collab::{ClientEvent, ConnectionId, RoomHub, ServerEvent};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};

use crate::AppState;

/// Upgrade handler for `GET /ws`.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<RoomHub>) {
    let conn = ConnectionId::new();
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    info!(%conn, "Client connected");

    let forward = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(%conn, error = %e, "Failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                handle_frame(&hub, conn, &tx, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(%conn, error = %e, "Socket error");
                break;
            }
        }
    }

    let rooms = hub.leave_all(conn);
    forward.abort();
    info!(%conn, rooms, "Client disconnected");
}

/// Applies one inbound frame. Returns the number of peers it reached.
fn handle_frame(
    hub: &RoomHub,
    conn: ConnectionId,
    tx: &UnboundedSender<ServerEvent>,
    text: &str,
) -> usize {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::JoinBudgetRoom(room)) => {
            hub.join(room, conn, tx.clone());
            0
        }
        Ok(ClientEvent::LeaveBudgetRoom(room)) => {
            hub.leave(&room, conn);
            0
        }
        Ok(event) => event
            .relay()
            .map_or(0, |relayed| hub.relay(conn, &relayed)),
        Err(e) => {
            warn!(%conn, error = %e, "Ignored malformed frame");
            0
        }
    }
}

/// Creates WebSocket routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use rstest::rstest;
    use serde_json::json;
    use tally_core::budget::BudgetType;
    use tally_core::collab::RoomKey;
    use tower::ServiceExt;

    fn join_frame(budget_id: &str) -> String {
        json!({
            "event": "join-budget-room",
            "data": {"budget_id": budget_id, "budget_type": "expense"}
        })
        .to_string()
    }

    fn removal_frame(budget_id: &str) -> String {
        json!({
            "event": "budget-item-removed",
            "data": {
                "room": {"budget_id": budget_id, "budget_type": "expense"},
                "index": 1
            }
        })
        .to_string()
    }

    #[test]
    fn test_frames_join_and_relay() {
        let hub = RoomHub::new();
        let (alice, bob) = (ConnectionId::new(), ConnectionId::new());
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        handle_frame(&hub, alice, &tx_a, &join_frame("b-1"));
        handle_frame(&hub, bob, &tx_b, &join_frame("b-1"));
        assert_eq!(hub.members(&RoomKey::new("b-1", BudgetType::Expense)).len(), 2);

        assert_eq!(handle_frame(&hub, alice, &tx_a, &removal_frame("b-1")), 1);
        assert!(rx_a.try_recv().is_err());
        let event = rx_b.try_recv().unwrap();
        assert_eq!(
            serde_json::to_value(&event).unwrap()["event"],
            "received-budget-item-removed"
        );
    }

    #[test]
    fn test_leave_frame() {
        let hub = RoomHub::new();
        let conn = ConnectionId::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_frame(&hub, conn, &tx, &join_frame("b-1"));

        let leave = json!({
            "event": "leave-budget-room",
            "data": {"budget_id": "b-1", "budget_type": "expense"}
        });
        handle_frame(&hub, conn, &tx, &leave.to_string());
        assert_eq!(hub.room_count(), 0);
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"{"event": "budget-exploded", "data": {}}"#)]
    #[case(r#"{"event": "budget-item-removed", "data": {"index": 1}}"#)]
    fn test_malformed_frames_are_ignored(#[case] frame: &str) {
        let hub = RoomHub::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(handle_frame(&hub, ConnectionId::new(), &tx, frame), 0);
        assert_eq!(hub.room_count(), 0);
    }

    #[tokio::test]
    async fn test_plain_get_is_rejected() {
        let app = routes().with_state(AppState::new());
        let response = app
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
