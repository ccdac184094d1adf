// WebSocket push channel client.
//
// The service pushes `{"type": "update", "channel": <draft id>, ...}`
// frames on a draft-scoped channel. Updates carry no usable delta: the
// receiver always re-fetches the full status snapshot, so duplicate or
// out-of-order notifications are harmless. On disconnect the client
// reconnects with bounded exponential backoff and resubscribes; once the
// attempt cap is exhausted it emits `Degraded` and leaves polling as the
// only delivery path.

use std::time::Duration;

use futures_util::stream::Stream;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

/// Events emitted by the push client to the application layer.
#[derive(Debug, PartialEq, Eq)]
pub enum PushEvent {
    /// Connected and subscribed to the draft channel.
    Connected,
    /// Connection lost; a reconnect attempt follows.
    Disconnected,
    /// The server signalled new state for the subscribed draft. The
    /// application must re-fetch the full snapshot.
    Update,
    /// Reconnect attempts exhausted; no further push delivery.
    Degraded,
}

// ---------------------------------------------------------------------------
// Reconnect policy
// ---------------------------------------------------------------------------

/// Bounded exponential backoff for reconnect attempts.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl ReconnectPolicy {
    /// Delay before the given attempt (1-based): initial * 2^(attempt-1),
    /// capped at `max_backoff`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_backoff.saturating_mul(1u32 << exponent);
        delay.min(self.max_backoff)
    }
}

// ---------------------------------------------------------------------------
// Frame parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PushFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    channel: Option<String>,
}

/// Interpret one text frame. Returns `Some(Update)` for an update on the
/// subscribed channel; anything else (other channels, other frame types,
/// malformed JSON) is ignored.
pub fn parse_push_frame(text: &str, channel: &str) -> Option<PushEvent> {
    let frame: PushFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("ignoring malformed push frame: {e}");
            return None;
        }
    };
    if frame.kind == "update" && frame.channel.as_deref() == Some(channel) {
        Some(PushEvent::Update)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Stream processing
// ---------------------------------------------------------------------------

/// Process raw WebSocket [`Message`] items from any [`Stream`], forwarding
/// update notifications through `tx`. Pure logic with no I/O; the primary
/// unit-test target. Returns `Err(())` when the receiver is gone.
pub async fn process_push_stream<St>(
    mut stream: St,
    channel: &str,
    tx: &mpsc::Sender<PushEvent>,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if let Some(event) = parse_push_frame(&text, channel) {
                    if tx.send(event).await.is_err() {
                        return Err(());
                    }
                }
            }
            Ok(Message::Close(_)) => {
                info!("push channel closed by server");
                break;
            }
            Err(e) => {
                warn!("push channel error: {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Connection loop
// ---------------------------------------------------------------------------

/// Run the push client until the receiver is dropped, the task is
/// aborted, or the reconnect budget runs out.
///
/// Every (re)connect sends a fresh subscribe frame; the server does not
/// persist subscriptions across connections.
pub async fn run(url: String, channel: String, policy: ReconnectPolicy, tx: mpsc::Sender<PushEvent>) {
    let mut attempts: u32 = 0;

    loop {
        match tokio_tungstenite::connect_async(&url).await {
            Ok((mut ws, _response)) => {
                let subscribe = serde_json::json!({
                    "type": "subscribe",
                    "channel": channel,
                })
                .to_string();

                if let Err(e) = ws.send(Message::Text(subscribe.into())).await {
                    warn!("failed to send subscribe frame: {e}");
                } else {
                    attempts = 0;
                    info!("push channel subscribed to {channel}");
                    if tx.send(PushEvent::Connected).await.is_err() {
                        return;
                    }

                    let (mut write, read) = ws.split();
                    let outcome = process_push_stream(read, &channel, &tx).await;

                    // Best-effort unsubscribe; the connection is going away
                    // either way.
                    let unsubscribe = serde_json::json!({
                        "type": "unsubscribe",
                        "channel": channel,
                    })
                    .to_string();
                    let _ = write.send(Message::Text(unsubscribe.into())).await;

                    if outcome.is_err() {
                        return;
                    }
                    if tx.send(PushEvent::Disconnected).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("push channel connect failed: {e}");
            }
        }

        attempts += 1;
        if attempts > policy.max_attempts {
            warn!(
                "push channel reconnect budget exhausted after {} attempts, falling back to polling",
                policy.max_attempts
            );
            let _ = tx.send(PushEvent::Degraded).await;
            return;
        }

        let delay = policy.delay_for(attempts);
        info!(
            "push channel reconnecting in {:?} (attempt {}/{})",
            delay, attempts, policy.max_attempts
        );
        tokio::time::sleep(delay).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
