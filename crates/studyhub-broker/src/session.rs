//! A single established broker session: frame I/O, heartbeat, dispatch.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use studyhub_core::config::broker::BrokerConfig;

use crate::frame::{ClientFrame, ServerFrame};
use crate::subscription::SubscriptionRegistry;

/// Shared slot holding the live session's outbound sender, if any.
pub(crate) type OutboundSlot = Arc<Mutex<Option<mpsc::UnboundedSender<ClientFrame>>>>;

/// Runs an established session until the peer drops, the heartbeat declares
/// the connection half-open, or cancellation fires.
///
/// Inbound `message` frames are dispatched to topic handlers inline, so
/// per-topic delivery order matches broker arrival order.
pub(crate) async fn run_session(
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    config: &BrokerConfig,
    subscriptions: &SubscriptionRegistry,
    outbound: &OutboundSlot,
    cancel: &CancellationToken,
) {
    let (mut sink, mut stream) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientFrame>();

    *outbound.lock().unwrap_or_else(|e| e.into_inner()) = Some(tx.clone());

    // A fresh session has no memory of prior subscriptions.
    for topic in subscriptions.topics() {
        debug!(topic = %topic, "Subscribing on new session");
        let _ = tx.send(ClientFrame::Subscribe { topic });
    }

    let mut ping = time::interval(config.heartbeat_outgoing());
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; consume it so pings
    // start one interval in.
    ping.tick().await;

    let liveness = config.liveness_window();
    let mut last_inbound = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
            Some(frame) = rx.recv() => {
                match serde_json::to_string(&frame) {
                    Ok(text) => {
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            warn!("Broker send failed");
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize outbound frame"),
                }
            }
            _ = ping.tick() => {
                if last_inbound.elapsed() > liveness {
                    warn!(
                        window_ms = liveness.as_millis() as u64,
                        "No broker traffic within liveness window, dropping connection"
                    );
                    break;
                }
                let frame = ClientFrame::Ping {
                    timestamp: Utc::now().timestamp_millis(),
                };
                match serde_json::to_string(&frame) {
                    Ok(text) => {
                        if sink.send(Message::Text(text.into())).await.is_err() {
                            warn!("Broker heartbeat send failed");
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize heartbeat"),
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        last_inbound = Instant::now();
                        handle_frame(text.as_str(), subscriptions, &tx).await;
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        last_inbound = Instant::now();
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Broker closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "Broker read error");
                        break;
                    }
                    None => {
                        debug!("Broker stream ended");
                        break;
                    }
                }
            }
        }
    }

    *outbound.lock().unwrap_or_else(|e| e.into_inner()) = None;
}

/// Decodes one inbound text message and reacts to it. Text that is not a
/// valid frame envelope is logged and skipped.
async fn handle_frame(
    raw: &str,
    subscriptions: &SubscriptionRegistry,
    tx: &mpsc::UnboundedSender<ClientFrame>,
) {
    let frame: ServerFrame = match serde_json::from_str(raw) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "Skipping unparseable broker frame");
            return;
        }
    };

    match frame {
        ServerFrame::Message { topic, body } => {
            subscriptions.dispatch(&topic, &body).await;
        }
        ServerFrame::Ping { timestamp } => {
            let _ = tx.send(ClientFrame::Pong { timestamp });
        }
        ServerFrame::Pong { .. } => {}
        ServerFrame::Subscribed { topic } => {
            debug!(topic = %topic, "Subscription confirmed");
        }
    }
}
