//! Broker client handle — lifecycle owner for the persistent connection.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use studyhub_core::config::broker::BrokerConfig;

use crate::frame::ClientFrame;
use crate::handler::MessageHandler;
use crate::session::{run_session, OutboundSlot};
use crate::state::ConnectionState;
use crate::subscription::SubscriptionRegistry;

/// Client handle for the persistent broker connection.
///
/// [`connect`](Self::connect) builds the handle without touching the
/// network; [`activate`](Self::activate) spawns the connection run loop.
/// At most one run loop is live per client: a second `activate`
/// supersedes the previous one.
pub struct BrokerClient {
    /// Connection configuration.
    config: BrokerConfig,
    /// Registered topic handlers.
    subscriptions: Arc<SubscriptionRegistry>,
    /// Connection state publisher.
    state_tx: Arc<watch::Sender<ConnectionState>>,
    /// Outbound sender of the live session, if any.
    outbound: OutboundSlot,
    /// Root cancellation for teardown.
    shutdown: CancellationToken,
    /// Cancellation of the current activation generation.
    active: Mutex<Option<CancellationToken>>,
}

impl BrokerClient {
    /// Builds a client handle for the configured endpoint.
    ///
    /// No I/O happens until [`activate`](Self::activate) is called.
    pub fn connect(config: BrokerConfig) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            config,
            subscriptions: Arc::new(SubscriptionRegistry::new()),
            state_tx: Arc::new(state_tx),
            outbound: Arc::new(Mutex::new(None)),
            shutdown: CancellationToken::new(),
            active: Mutex::new(None),
        }
    }

    /// Registers a handler for a topic.
    ///
    /// If a session is currently live the subscribe frame goes out
    /// immediately; every later (re)connect re-issues it.
    pub fn subscribe(&self, topic: impl Into<String>, handler: Arc<dyn MessageHandler>) {
        let topic = topic.into();
        self.subscriptions.add(topic.clone(), handler);

        let slot = self.outbound.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tx) = slot.as_ref() {
            let _ = tx.send(ClientFrame::Subscribe { topic });
        }
    }

    /// Begins the connection attempt asynchronously; never blocks the
    /// caller. Supersedes any prior pending activation.
    pub fn activate(&self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = active.take() {
            debug!("Superseding previous broker activation");
            prev.cancel();
        }
        let cancel = self.shutdown.child_token();
        *active = Some(cancel.clone());

        let runner = ConnectionRunner {
            config: self.config.clone(),
            subscriptions: Arc::clone(&self.subscriptions),
            state: Arc::clone(&self.state_tx),
            outbound: Arc::clone(&self.outbound),
            cancel,
        };
        tokio::spawn(runner.run());
    }

    /// Returns a receiver observing the connection state.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Whether the connection is currently established.
    pub fn is_connected(&self) -> bool {
        *self.state_tx.borrow() == ConnectionState::Connected
    }

    /// Cancels the run loop and tears the connection down.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for BrokerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerClient")
            .field("endpoint", &self.config.endpoint)
            .field("state", &*self.state_tx.borrow())
            .finish()
    }
}

/// Owns one activation generation of the connect/retry loop.
struct ConnectionRunner {
    config: BrokerConfig,
    subscriptions: Arc<SubscriptionRegistry>,
    state: Arc<watch::Sender<ConnectionState>>,
    outbound: OutboundSlot,
    cancel: CancellationToken,
}

impl ConnectionRunner {
    /// Connect, run the session, then retry after the configured delay.
    ///
    /// Failures are retried indefinitely at the fixed delay; this is a
    /// best-effort always-on channel and never surfaces a fatal error.
    async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            let _ = self.state.send(ConnectionState::Connecting);

            let attempt = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = connect_async(self.config.endpoint.as_str()) => result,
            };

            match attempt {
                Ok((ws, _response)) => {
                    info!(endpoint = %self.config.endpoint, "Broker connected");
                    let _ = self.state.send(ConnectionState::Connected);

                    run_session(
                        ws,
                        &self.config,
                        &self.subscriptions,
                        &self.outbound,
                        &self.cancel,
                    )
                    .await;

                    let _ = self.state.send(ConnectionState::Disconnected);
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    warn!(
                        delay_ms = self.config.reconnect_delay_ms,
                        "Broker connection lost, scheduling reconnect"
                    );
                }
                Err(e) => {
                    let _ = self.state.send(ConnectionState::Disconnected);
                    warn!(
                        error = %e,
                        delay_ms = self.config.reconnect_delay_ms,
                        "Broker connect failed, scheduling retry"
                    );
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.reconnect_delay()) => {}
            }
        }

        let _ = self.state.send(ConnectionState::Disconnected);
        debug!("Broker run loop ended");
    }
}
