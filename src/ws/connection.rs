//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding scoped events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{ClientCommand, WsFrame};
use super::subscription::SubscriptionManager;
use crate::config::BroadcastScope;
use crate::domain::{EventFeed, FeedItem};

/// Per-connection settings fixed at upgrade time.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    /// Random identifier reported in `server:info` and logs.
    pub connection_id: String,
    /// Listen port reported in `server:info`.
    pub port: u16,
    /// Which events this connection receives.
    pub scope: BroadcastScope,
}

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Sends `server:info` once.
/// - Reads commands from the client and answers them.
/// - Forwards events from the [`EventFeed`] that pass the connection's
///   subscription filter.
///
/// A lagging feed skips the lost events and keeps going; the publisher
/// is never slowed down.
pub async fn run_connection(
    socket: WebSocket,
    mut feed: EventFeed,
    ctx: ConnectionContext,
) {
    let conn_id = ctx.connection_id.as_str();
    tracing::info!(conn_id, "ws client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    let hello = WsFrame::server_info(conn_id, ctx.port);
    if ws_tx.send(Message::text(hello.to_text())).await.is_err() {
        tracing::debug!(conn_id, "ws client gone before greeting");
        return;
    }

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(conn_id, &text, &mut subs);
                        if let Some(frame) = reply
                            && ws_tx.send(Message::text(frame.to_text())).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(conn_id, error = %e, "ws receive error");
                        break;
                    }
                    _ => {}
                }
            }
            item = feed.next() => {
                match item {
                    Some(FeedItem::Event(order_event)) => {
                        if subs.should_deliver(&order_event, ctx.scope) {
                            let frame = WsFrame::from(&order_event);
                            if ws_tx.send(Message::text(frame.to_text())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(FeedItem::Missed(n)) => {
                        tracing::warn!(conn_id, missed = n, "ws client lagged behind event bus");
                    }
                    None => break,
                }
            }
        }
    }

    tracing::info!(conn_id, subscriptions = subs.count(), "ws client disconnected");
}

/// Applies a client frame and returns the reply, if any.
fn handle_text_message(
    conn_id: &str,
    text: &str,
    subs: &mut SubscriptionManager,
) -> Option<WsFrame> {
    let command = match ClientCommand::parse(text) {
        Ok(command) => command,
        Err(err) => {
            tracing::debug!(conn_id, error = %err, "ws frame rejected");
            return Some(WsFrame::error(&err));
        }
    };

    match command {
        ClientCommand::Subscribe(id) => {
            subs.subscribe(id);
            tracing::debug!(conn_id, order_id = %id, "ws client subscribed");
        }
        ClientCommand::Unsubscribe(id) => {
            subs.unsubscribe(id);
            tracing::debug!(conn_id, order_id = %id, "ws client unsubscribed");
        }
        ClientCommand::Ping => return Some(WsFrame::pong()),
    }
    WsFrame::subscription_ack(&command)
}
