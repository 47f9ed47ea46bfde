//! WebSocket client and channel join handshake

use std::collections::VecDeque;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::channel::protocol::{ClientEnvelope, JoinStatus, ServerEnvelope};
use crate::util::time::JOIN_TIMEOUT;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type WsSink = SplitSink<WsStream, Message>;
pub type WsSource = SplitStream<WsStream>;

/// Channel errors
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("WebSocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Server refused join: {reason}")]
    JoinRefused { reason: String },

    #[error("Join timed out")]
    JoinTimeout,

    #[error("Connection closed")]
    Closed,
}

/// Client side of the game channel
///
/// Owns the socket until [`GameSocket::into_parts`] hands the split halves to
/// the session.
pub struct GameSocket {
    sink: WsSink,
    source: WsSource,
    /// Game events received while waiting for the join reply
    pending: VecDeque<ServerEnvelope>,
}

impl GameSocket {
    /// Open the WebSocket connection to the game server
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (ws, _response) = connect_async(url).await?;
        let (sink, source) = ws.split();

        info!(url = %url, "Connected to game server");

        Ok(Self {
            sink,
            source,
            pending: VecDeque::new(),
        })
    }

    /// Join the game topic, waiting up to [`JOIN_TIMEOUT`] for the reply
    pub async fn join(&mut self, topic: &str, token: &str) -> Result<(), ChannelError> {
        self.join_with_timeout(topic, token, JOIN_TIMEOUT).await
    }

    /// Join the game topic with an explicit reply timeout
    pub async fn join_with_timeout(
        &mut self,
        topic: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<(), ChannelError> {
        let join_ref = Uuid::new_v4();
        self.push(&ClientEnvelope::Join {
            topic: topic.to_string(),
            token: token.to_string(),
            join_ref,
        })
        .await?;

        match tokio::time::timeout(timeout, self.await_join_reply(join_ref)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::JoinTimeout),
        }
    }

    /// Read frames until the reply matching `join_ref` arrives
    async fn await_join_reply(&mut self, join_ref: Uuid) -> Result<(), ChannelError> {
        while let Some(frame) = self.source.next().await {
            match frame? {
                Message::Text(text) => match serde_json::from_str::<ServerEnvelope>(&text) {
                    Ok(ServerEnvelope::JoinReply(reply)) => {
                        if reply.join_ref != join_ref {
                            debug!(reply_ref = %reply.join_ref, "Ignoring reply for unknown ref");
                            continue;
                        }

                        return match reply.status {
                            JoinStatus::Ok => {
                                info!("Joined game channel");
                                Ok(())
                            }
                            JoinStatus::Error => Err(ChannelError::JoinRefused {
                                reason: reply
                                    .reason
                                    .unwrap_or_else(|| "unknown reason".to_string()),
                            }),
                        };
                    }
                    Ok(envelope) => {
                        // Snapshot arrived before the reply, keep it for the session
                        self.pending.push_back(envelope);
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to parse server message during join");
                    }
                },
                Message::Close(_) => return Err(ChannelError::Closed),
                _ => {}
            }
        }

        Err(ChannelError::Closed)
    }

    /// Serialize and send an envelope
    pub async fn push(&mut self, msg: &ClientEnvelope) -> Result<(), ChannelError> {
        send_msg(&mut self.sink, msg).await
    }

    /// Hand out the split halves and any buffered snapshots
    pub fn into_parts(self) -> (WsSink, WsSource, VecDeque<ServerEnvelope>) {
        (self.sink, self.source, self.pending)
    }
}

/// Send a message over an already-split sink
pub async fn send_msg(sink: &mut WsSink, msg: &ClientEnvelope) -> Result<(), ChannelError> {
    let json = serde_json::to_string(msg)?;
    sink.send(Message::Text(json)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;

    /// Accept one connection and answer the join with the given status line
    async fn spawn_join_server(reply: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let join = match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => text,
                other => panic!("expected text join frame, got {:?}", other),
            };
            let value: serde_json::Value = serde_json::from_str(&join).unwrap();
            assert_eq!(value["event"], "join");
            let join_ref = value["payload"]["ref"].as_str().unwrap().to_string();

            let response = reply.replace("{ref}", &join_ref);
            ws.send(Message::Text(response)).await.unwrap();

            // Hold the connection open until the client is done
            while ws.next().await.is_some() {}
        });

        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn join_ok() {
        let url = spawn_join_server(
            r#"{"event":"join:reply","payload":{"ref":"{ref}","status":"ok"}}"#,
        )
        .await;

        let mut socket = GameSocket::connect(&url).await.unwrap();
        socket.join("game:default", "token").await.unwrap();
    }

    #[tokio::test]
    async fn join_refused_with_reason() {
        let url = spawn_join_server(
            r#"{"event":"join:reply","payload":{"ref":"{ref}","status":"error","reason":"bad token"}}"#,
        )
        .await;

        let mut socket = GameSocket::connect(&url).await.unwrap();
        let err = socket.join("game:default", "token").await.unwrap_err();
        match err {
            ChannelError::JoinRefused { reason } => assert_eq!(reason, "bad token"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn join_times_out_on_silent_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            // Swallow the join and never reply
            while ws.next().await.is_some() {}
        });

        let mut socket = GameSocket::connect(&format!("ws://{}", addr)).await.unwrap();
        let err = socket
            .join_with_timeout("game:default", "token", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::JoinTimeout));
    }

    #[tokio::test]
    async fn snapshots_before_reply_are_buffered() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            let join = match ws.next().await.unwrap().unwrap() {
                Message::Text(text) => text,
                other => panic!("expected text join frame, got {:?}", other),
            };
            let value: serde_json::Value = serde_json::from_str(&join).unwrap();
            let join_ref = value["payload"]["ref"].as_str().unwrap().to_string();

            // Snapshot races ahead of the reply
            ws.send(Message::Text(
                r#"{"event":"player:update","payload":{"players":{}}}"#.to_string(),
            ))
            .await
            .unwrap();
            ws.send(Message::Text(format!(
                r#"{{"event":"join:reply","payload":{{"ref":"{}","status":"ok"}}}}"#,
                join_ref
            )))
            .await
            .unwrap();

            while ws.next().await.is_some() {}
        });

        let mut socket = GameSocket::connect(&format!("ws://{}", addr)).await.unwrap();
        socket.join("game:default", "token").await.unwrap();

        let (_sink, _source, pending) = socket.into_parts();
        assert_eq!(pending.len(), 1);
        assert!(matches!(pending[0], ServerEnvelope::PlayerUpdate(_)));
    }
}
