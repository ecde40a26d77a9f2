use crate::subscription::hub::BroadcastHub;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Manages a single push-only WebSocket connection
pub struct ConnectionManager {
    hub: Arc<BroadcastHub>,
}

impl ConnectionManager {
    pub fn new(hub: Arc<BroadcastHub>) -> Self {
        Self { hub }
    }

    /// Handle WebSocket connection lifecycle
    ///
    /// Pushes a snapshot immediately, then once per push interval until the
    /// client closes, errors, or a send fails. The push timer and the
    /// subscriber registration are owned by this call and released when it
    /// returns.
    pub async fn handle(self, mut socket: WebSocket) {
        let mut registration = self.hub.subscribe();
        let subscriber_id = registration.id();

        // First tick completes immediately: new viewers never wait for a period
        let mut ticker = interval(self.hub.push_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Clients send nothing meaningful; watch for close and errors
                msg = socket.recv() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            info!(subscriber_id = %subscriber_id, "WebSocket client disconnected");
                            break;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = socket.send(Message::Pong(data)).await {
                                error!(error = %e, "Failed to send pong");
                                break;
                            }
                        }
                        Some(Ok(_)) => {
                            debug!(subscriber_id = %subscriber_id, "Ignoring client message");
                        }
                        Some(Err(e)) => {
                            warn!(subscriber_id = %subscriber_id, error = %e, "WebSocket error");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.push_update(&mut socket).await {
                        warn!(subscriber_id = %subscriber_id, error = %e, "Push failed, dropping subscriber");
                        break;
                    }
                }
            }
        }

        registration.release();
        info!(subscriber_id = %subscriber_id, "WebSocket connection closed");
    }

    /// Send one snapshot
    ///
    /// A snapshot that fails to serialize is skipped; only transport errors
    /// are returned.
    async fn push_update(&self, socket: &mut WebSocket) -> Result<(), axum::Error> {
        let msg = self.hub.next_update();

        let json = match serde_json::to_string(&msg) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize update, skipping push");
                return Ok(());
            }
        };

        socket.send(Message::Text(json)).await
    }
}
