//! Integration tests for broker reconnection and re-subscription.
//!
//! Runs an in-process WebSocket server speaking the broker dialect,
//! drops the first session, and verifies the client comes back after the
//! configured delay with its subscription re-established.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use studyhub_broker::{BrokerClient, ConnectionState, MessageHandler};
use studyhub_core::config::broker::BrokerConfig;

const TOPIC: &str = "/topic/notification";

/// Subscribe frame observed by the test server.
#[derive(Debug)]
struct SubscribeSeen {
    connection: usize,
    topic: String,
}

struct Recorder {
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl MessageHandler for Recorder {
    async fn on_message(&self, _topic: &str, body: &str) {
        let _ = self.tx.send(body.to_string());
    }
}

fn test_config(addr: std::net::SocketAddr) -> BrokerConfig {
    BrokerConfig {
        endpoint: format!("ws://{addr}"),
        notification_topic: TOPIC.to_string(),
        reconnect_delay_ms: 200,
        // Keep heartbeats out of the way; these tests drive the drop.
        heartbeat_incoming_ms: 60_000,
        heartbeat_outgoing_ms: 60_000,
    }
}

/// Accepts connections; on each one, waits for the subscribe frame, acks
/// it, pushes one message, then drops the first session immediately.
async fn run_server(listener: TcpListener, events: mpsc::UnboundedSender<SubscribeSeen>) {
    let mut connection = 0usize;
    loop {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        connection += 1;

        let mut ws = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(_) => continue,
        };

        let topic = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => {
                    let frame: serde_json::Value =
                        serde_json::from_str(text.as_str()).expect("frame should be JSON");
                    if frame["type"] == "subscribe" {
                        break frame["topic"].as_str().expect("topic").to_string();
                    }
                }
                Some(Ok(_)) => continue,
                _ => break String::new(),
            }
        };
        if topic.is_empty() {
            continue;
        }

        let _ = events.send(SubscribeSeen {
            connection,
            topic: topic.clone(),
        });

        let ack = serde_json::json!({"type": "subscribed", "topic": topic}).to_string();
        let _ = ws.send(Message::Text(ack.into())).await;

        let push =
            serde_json::json!({"type": "message", "topic": topic, "body": format!("push {connection}")})
                .to_string();
        let _ = ws.send(Message::Text(push.into())).await;

        if connection == 1 {
            // Unexpected drop: the client must reconnect on its own.
            drop(ws);
        } else {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

#[tokio::test]
async fn test_reconnect_and_resubscribe_after_drop() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (events_tx, mut events) = mpsc::unbounded_channel();
    tokio::spawn(run_server(listener, events_tx));

    let client = BrokerClient::connect(test_config(addr));
    let (bodies_tx, mut bodies) = mpsc::unbounded_channel();
    client.subscribe(TOPIC, Arc::new(Recorder { tx: bodies_tx }));
    client.activate();

    // First session: subscription established, message delivered.
    let first = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("first subscribe in time")
        .expect("server alive");
    assert_eq!(first.connection, 1);
    assert_eq!(first.topic, TOPIC);

    let body = tokio::time::timeout(Duration::from_secs(5), bodies.recv())
        .await
        .expect("first push in time")
        .expect("handler alive");
    assert_eq!(body, "push 1");
    let first_session_over = Instant::now();

    // The server dropped the session; the client must re-subscribe on a
    // fresh session, no earlier than the configured delay.
    let second = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("second subscribe in time")
        .expect("server alive");
    assert_eq!(second.connection, 2);
    assert_eq!(second.topic, TOPIC);
    assert!(
        first_session_over.elapsed() >= Duration::from_millis(200),
        "reconnect should wait for the configured delay"
    );

    let body = tokio::time::timeout(Duration::from_secs(5), bodies.recv())
        .await
        .expect("second push in time")
        .expect("handler alive");
    assert_eq!(body, "push 2");

    client.shutdown();
}

#[tokio::test]
async fn test_shutdown_settles_disconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (events_tx, _events) = mpsc::unbounded_channel();
    tokio::spawn(run_server(listener, events_tx));

    let client = BrokerClient::connect(test_config(addr));
    let mut state = client.state();
    client.activate();

    // Wait until the client reports an established connection.
    tokio::time::timeout(Duration::from_secs(5), async {
        while *state.borrow_and_update() != ConnectionState::Connected {
            state.changed().await.expect("state channel alive");
        }
    })
    .await
    .expect("connected in time");

    client.shutdown();

    tokio::time::timeout(Duration::from_secs(5), async {
        while *state.borrow_and_update() != ConnectionState::Disconnected {
            state.changed().await.expect("state channel alive");
        }
    })
    .await
    .expect("disconnected in time");
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_retry_when_broker_is_down() {
    // Nothing is listening on this address; the client must keep cycling
    // through connecting/disconnected without ever giving up.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = BrokerClient::connect(test_config(addr));
    let mut state = client.state();
    client.activate();

    // Each retry cycle publishes connecting and disconnected once; four
    // observed changes mean at least two full attempts without giving up.
    let mut changes = 0u32;
    tokio::time::timeout(Duration::from_secs(5), async {
        while changes < 4 {
            state.changed().await.expect("state channel alive");
            state.borrow_and_update();
            changes += 1;
        }
    })
    .await
    .expect("retry cycles in time");
    assert!(!client.is_connected());

    client.shutdown();
}
