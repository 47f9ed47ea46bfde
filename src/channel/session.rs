//! Channel session: inbound snapshot dispatch and outbound input relay

use std::collections::VecDeque;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::channel::protocol::{ClientEnvelope, ServerEnvelope};
use crate::channel::socket::{send_msg, WsSink, WsSource};
use crate::input::InputEvent;
use crate::overlay::StatsOverlay;
use crate::scene::Scene;
use crate::util::rate_limit::EventRateLimiter;

/// Run the channel session with read/write split
///
/// Returns when the server closes the connection or the transport fails.
pub async fn run_session(
    mut ws_sink: WsSink,
    mut ws_source: WsSource,
    pending: VecDeque<ServerEnvelope>,
    scene: Arc<Scene>,
    overlay: Arc<StatsOverlay>,
    mut event_rx: mpsc::Receiver<InputEvent>,
) {
    let rate_limiter = EventRateLimiter::new();

    // Spawn writer task: input events -> channel pushes
    let writer_handle = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !rate_limiter.check_event() {
                warn!(action = ?event.action, "Rate limited input event");
                continue;
            }

            let msg = ClientEnvelope::Event {
                action: event.action,
                state: event.state,
            };

            if let Err(e) = send_msg(&mut ws_sink, &msg).await {
                debug!(error = %e, "Event push failed");
                break;
            }
        }
    });

    // Snapshots buffered during the join handshake come first
    for envelope in pending {
        handle_envelope(envelope, &scene, &overlay);
    }

    // Reader loop: channel -> scene and overlay
    while let Some(result) = ws_source.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEnvelope>(&text) {
                Ok(envelope) => handle_envelope(envelope, &scene, &overlay),
                Err(e) => {
                    warn!(error = %e, "Failed to parse server message");
                }
            },
            Ok(Message::Binary(_)) => {
                warn!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) => {
                debug!("Received ping");
            }
            Ok(Message::Pong(_)) => {
                debug!("Received pong");
            }
            Ok(Message::Close(_)) => {
                info!("Server initiated close");
                break;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                error!(error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Abort writer task
    writer_handle.abort();
}

/// Dispatch one inbound envelope
fn handle_envelope(envelope: ServerEnvelope, scene: &Scene, overlay: &StatsOverlay) {
    match envelope {
        ServerEnvelope::PlayerUpdate(payload) => {
            scene.apply(&payload);
            overlay.apply(&payload);
        }
        ServerEnvelope::PlayerJoin(payload) => {
            info!(players = payload.players.len(), "Player joined");
            scene.apply(&payload);
            overlay.apply(&payload);
        }
        ServerEnvelope::JoinReply(reply) => {
            debug!(reply_ref = %reply.join_ref, "Stray join reply, ignoring");
        }
    }
}
