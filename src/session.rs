//! Channel sessions over the remote-agent socket
//!
//! A `ChannelSession` owns one physical websocket connection and one
//! joined topic for the duration of a single logical operation:
//! connect, join, push one request, await the correlated reply, then
//! tear down. Sessions are never reused or pooled; concurrent
//! operations each get their own connection, so correlation state
//! cannot interfere across calls.

use crate::config::SessionConfig;
use crate::correlate::ReplySlot;
use crate::error::{LocatorError, Result};
use crate::wire::{Envelope, EVENT_JOIN, EVENT_LEAVE};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Bound on draining the socket after the close frame is sent
const CLOSE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One websocket connection with one joined topic
pub struct ChannelSession {
    ws: WsStream,
    topic: String,
}

impl ChannelSession {
    /// Connect and join the configured topic
    ///
    /// The connect URL already carries the session token and window id;
    /// the join is a `phx_join` push with an empty payload.
    pub async fn open(connect_url: &str, config: &SessionConfig) -> Result<Self> {
        let connected = tokio::time::timeout(config.connect_timeout(), connect_async(connect_url))
            .await
            .map_err(|_| {
                LocatorError::Timeout(format!(
                    "connect did not complete within {}s",
                    config.connect_timeout_secs
                ))
            })?;

        let (ws, _) = connected.map_err(|e| LocatorError::Transport(format!("connect: {}", e)))?;

        let mut session = Self {
            ws,
            topic: config.topic.clone(),
        };
        session.push(EVENT_JOIN, serde_json::json!({})).await?;

        tracing::debug!(topic = %session.topic, "Channel session opened");
        Ok(session)
    }

    /// The joined topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Push one envelope on the joined topic
    pub async fn push(&mut self, event: &str, payload: serde_json::Value) -> Result<()> {
        let envelope = Envelope::new(&self.topic, event, payload);
        let text = serde_json::to_string(&envelope)?;
        self.ws
            .send(Message::Text(text))
            .await
            .map_err(|e| LocatorError::Transport(format!("send '{}': {}", event, e)))
    }

    /// Suspend until the reply matching (topic, event) arrives
    ///
    /// Every inbound envelope on the shared channel is offered to a
    /// single-slot correlator; the first match is returned and all other
    /// traffic is dropped. Deadline expiry returns `Timeout` — the caller
    /// is still responsible for tearing the session down.
    pub async fn await_reply(&mut self, event: &str, deadline: Duration) -> Result<Envelope> {
        let mut slot = ReplySlot::new(&self.topic, event);

        let wait = async {
            while let Some(inbound) = self.ws.next().await {
                let message =
                    inbound.map_err(|e| LocatorError::Transport(format!("receive: {}", e)))?;

                let text = match message {
                    Message::Text(text) => text,
                    Message::Close(_) => {
                        return Err(LocatorError::Transport(
                            "connection closed before the reply arrived".to_string(),
                        ))
                    }
                    // Control and binary frames are not protocol envelopes
                    _ => continue,
                };

                let envelope: Envelope = match serde_json::from_str(&text) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        tracing::warn!(error = %e, "Discarding unparsable frame");
                        continue;
                    }
                };

                if slot.offer(envelope) {
                    if let Some(reply) = slot.take() {
                        return Ok(reply);
                    }
                }
            }

            Err(LocatorError::Transport(
                "connection closed before the reply arrived".to_string(),
            ))
        };

        let outcome = tokio::time::timeout(deadline, wait).await;
        match outcome {
            Ok(result) => {
                if let Ok(ref reply) = result {
                    tracing::debug!(topic = %reply.topic, event = %reply.event, "Reply correlated");
                }
                result
            }
            Err(_) => Err(LocatorError::Timeout(format!(
                "no '{}' reply on '{}' within {:?}",
                event, self.topic, deadline
            ))),
        }
    }

    /// Leave the topic, disconnect, and wait for the socket to drain
    ///
    /// Runs every step even when an earlier one fails, so no connection
    /// or channel registration is left open; the first failure is
    /// reported after the socket is released.
    pub async fn close(mut self) -> Result<()> {
        let mut first_error = None;

        if let Err(e) = self.push(EVENT_LEAVE, serde_json::json!({})).await {
            first_error = Some(e);
        }

        if let Err(e) = self.ws.close(None).await {
            // Already-closed is the expected state after a transport failure
            if first_error.is_none() {
                first_error = Some(LocatorError::Transport(format!("close: {}", e)));
            }
        }

        // Block (bounded) until the peer confirms the disconnect
        let drained = tokio::time::timeout(CLOSE_DRAIN_TIMEOUT, async {
            while let Some(message) = self.ws.next().await {
                if message.is_err() {
                    break;
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(topic = %self.topic, "Socket did not confirm disconnect in time");
        }

        tracing::debug!(topic = %self.topic, "Channel session closed");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
