//! WebSocket session to the device
//!
//! `Session::spawn` starts one supervised tokio task that owns the
//! socket, the handler registry and the reconnect state:
//!
//! ```text
//! Closed ─► Connecting ─► Open ─► Reconnecting ─► Connecting ─► ...
//!                │                      ▲
//!                └──── connect failed ──┘
//! ```
//!
//! Callers talk to it through a cloneable `SessionHandle`. Dropping the
//! last handle stops the session like `shutdown()` does.

use super::reconnect::{ReconnectDecision, ReconnectPolicy, Reconnector};
use super::registry::HandlerRegistry;
use super::stats::{Stats, StatsSnapshot};
use crate::constants::{CHANNEL_CAPACITY, CHANNEL_COUNT};
use crate::error::{LinkError, Result};
use crate::model::{
    AlexaIntegrationSettings, BleStatus, HttpCredentials, WiFiConnectionDetails,
};
use crate::protocol::messages;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection state, published on a watch channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Closed,
    Connecting,
    Open,
    Reconnecting,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(name)
    }
}

/// Why a connected socket stopped
enum ConnectionEnd {
    Shutdown,
    Closed,
    Error(String),
}

pub struct Session;

impl Session {
    /// Start the session task
    ///
    /// Must be called from within a tokio runtime. The first connection
    /// attempt starts immediately.
    pub fn spawn(
        url: impl Into<String>,
        registry: HandlerRegistry,
        policy: ReconnectPolicy,
    ) -> SessionHandle {
        let url = url.into();
        let outbound: Arc<RwLock<Option<mpsc::Sender<Bytes>>>> = Arc::new(RwLock::new(None));
        let (state_tx, state_rx) = watch::channel(SessionState::Closed);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let stats = Arc::new(Stats::new());

        let worker = Worker {
            url,
            registry,
            reconnector: Reconnector::new(policy),
            outbound: outbound.clone(),
            state_tx,
            shutdown_rx,
            stats: stats.clone(),
        };
        let task = tokio::spawn(worker.run());

        SessionHandle {
            outbound,
            state_rx,
            shutdown_tx: Arc::new(shutdown_tx),
            stats,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable control surface for a running session
#[derive(Clone)]
pub struct SessionHandle {
    /// Sender for the currently open socket, `None` while not open
    outbound: Arc<RwLock<Option<mpsc::Sender<Bytes>>>>,
    state_rx: watch::Receiver<SessionState>,
    shutdown_tx: Arc<watch::Sender<bool>>,
    stats: Arc<Stats>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    /// Receiver for state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Wait until the session reports `Open`
    ///
    /// Fails with `NotOpen` on timeout or if the session has stopped.
    pub async fn wait_until_open(&self, timeout: Duration) -> Result<()> {
        let mut state_rx = self.state_rx.clone();
        let opened = tokio::time::timeout(timeout, async move {
            let opened = state_rx
                .wait_for(|state| *state == SessionState::Open)
                .await
                .is_ok();
            opened
        })
        .await;

        match opened {
            Ok(true) => Ok(()),
            _ => Err(LinkError::NotOpen),
        }
    }

    /// Queue a frame for the socket
    ///
    /// Best effort: returns `false` (and logs a warning) if the session
    /// is not open or the outbound queue is full. There is no
    /// acknowledgement and no retry.
    pub fn send(&self, frame: Bytes) -> bool {
        if !self.is_open() {
            warn!("WebSocket is not open, dropping {} byte frame", frame.len());
            self.stats.add_dropped_send();
            return false;
        }

        let sender = self.outbound.read().clone();
        let Some(tx) = sender else {
            warn!("WebSocket is not open, dropping {} byte frame", frame.len());
            self.stats.add_dropped_send();
            return false;
        };

        match tx.try_send(frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Outbound queue rejected frame: {}", e);
                self.stats.add_dropped_send();
                false
            }
        }
    }

    /// Set the R/G/B/W channel values (0 turns a channel off)
    pub fn send_color(&self, values: [u8; CHANNEL_COUNT]) -> bool {
        self.send(messages::encode_color_message(values))
    }

    pub fn send_http_credentials(&self, credentials: &HttpCredentials) -> Result<bool> {
        Ok(self.send(messages::encode_http_credentials_message(credentials)?))
    }

    pub fn send_device_name(&self, name: &str) -> Result<bool> {
        Ok(self.send(messages::encode_device_name_message(name)?))
    }

    pub fn send_wifi_connection_details(&self, details: &WiFiConnectionDetails) -> Result<bool> {
        Ok(self.send(messages::encode_wifi_connection_details_message(
            details,
        )?))
    }

    pub fn send_ble_status(&self, status: BleStatus) -> Result<bool> {
        Ok(self.send(messages::encode_ble_status_message(status)?))
    }

    pub fn send_alexa_settings(&self, settings: &AlexaIntegrationSettings) -> Result<bool> {
        Ok(self.send(messages::encode_alexa_settings_message(settings)?))
    }

    pub fn request_heap(&self) -> bool {
        self.send(messages::encode_heap_message())
    }

    pub fn request_wifi_scan(&self) -> bool {
        self.send(messages::encode_wifi_scan_request())
    }

    pub fn request_ota_progress(&self) -> bool {
        self.send(messages::encode_ota_progress_request())
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop the session: cancels a pending reconnect, closes the socket
    /// and waits for the task to finish
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Session task ended abnormally: {}", e);
            }
        }
    }
}

// =============================================================================
// Worker
// =============================================================================

struct Worker {
    url: String,
    registry: HandlerRegistry,
    reconnector: Reconnector,
    outbound: Arc<RwLock<Option<mpsc::Sender<Bytes>>>>,
    state_tx: watch::Sender<SessionState>,
    shutdown_rx: watch::Receiver<bool>,
    stats: Arc<Stats>,
}

impl Worker {
    fn shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!("Session {} -> {}", previous, state);
        }
    }

    async fn run(mut self) {
        while !self.shutdown_requested() {
            self.set_state(SessionState::Connecting);

            let connected = tokio::select! {
                result = connect_async(self.url.as_str()) => result,
                _ = self.shutdown_rx.changed() => break,
            };

            match connected {
                Ok((socket, _response)) => {
                    info!("Connected to {}", self.url);
                    self.reconnector.on_open();

                    let (tx, rx) = mpsc::channel::<Bytes>(CHANNEL_CAPACITY);
                    *self.outbound.write() = Some(tx);
                    self.set_state(SessionState::Open);

                    let end = self.run_connection(socket, rx).await;
                    *self.outbound.write() = None;

                    match end {
                        ConnectionEnd::Shutdown => break,
                        ConnectionEnd::Closed => info!("Connection to {} closed", self.url),
                        ConnectionEnd::Error(e) => warn!("Connection to {} lost: {}", self.url, e),
                    }
                }
                Err(e) => {
                    let error = LinkError::Connect {
                        url: self.url.clone(),
                        source: Box::new(e),
                    };
                    warn!("{}", error);
                }
            }

            let delay = match self.reconnector.on_failure() {
                ReconnectDecision::Schedule(delay) => delay,
                ReconnectDecision::AlreadyPending => {
                    debug!("Reconnect already pending");
                    self.reconnector.pending_delay()
                }
                ReconnectDecision::GiveUp => {
                    warn!(
                        "Giving up on {} after {} attempts",
                        self.url,
                        self.reconnector.attempts()
                    );
                    break;
                }
            };

            self.set_state(SessionState::Reconnecting);
            info!("Reconnecting in {} ms", delay.as_millis());
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.shutdown_rx.changed() => break,
            }
            self.reconnector.begin_attempt();
            self.stats.add_reconnect();
        }

        *self.outbound.write() = None;
        self.set_state(SessionState::Closed);
        debug!("Session task stopped");
    }

    /// Pump one open socket until it closes, fails, or shutdown is requested
    async fn run_connection(
        &mut self,
        socket: Socket,
        mut outbound_rx: mpsc::Receiver<Bytes>,
    ) -> ConnectionEnd {
        let (mut sink, mut stream) = socket.split();

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = sink.close().await;
                    return ConnectionEnd::Shutdown;
                }

                // Device -> client
                msg = stream.next() => match msg {
                    Some(Ok(Message::Binary(data))) => {
                        self.stats.add_rx(data.len());
                        if self.registry.dispatch(&data).is_dropped() {
                            self.stats.add_dropped_frame();
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        debug!("Ignoring text frame ({} bytes)", text.len());
                    }
                    Some(Ok(Message::Close(_))) | None => return ConnectionEnd::Closed,
                    Some(Ok(_)) => {} // Ping/pong are answered by tungstenite
                    Some(Err(e)) => return ConnectionEnd::Error(e.to_string()),
                },

                // Client -> device
                out = outbound_rx.recv() => match out {
                    Some(data) => {
                        let len = data.len();
                        if let Err(e) = sink.send(Message::Binary(data)).await {
                            return ConnectionEnd::Error(e.to_string());
                        }
                        self.stats.add_tx(len);
                    }
                    None => return ConnectionEnd::Closed,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Open.to_string(), "open");
        assert_eq!(SessionState::Reconnecting.to_string(), "reconnecting");
    }

    #[tokio::test]
    async fn test_send_before_open_is_dropped() {
        // Nothing listens on port 1
        let policy = ReconnectPolicy::fixed(Duration::from_millis(50));
        let handle = Session::spawn("ws://127.0.0.1:1/ws", HandlerRegistry::new(), policy);

        assert!(!handle.request_heap());
        assert!(!handle.send(Bytes::from_static(&[3])));
        assert_eq!(handle.stats().dropped_sends, 2);

        handle.shutdown().await;
        assert_eq!(handle.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_wait_until_open_times_out() {
        let policy = ReconnectPolicy::fixed(Duration::from_millis(50));
        let handle = Session::spawn("ws://127.0.0.1:1/ws", HandlerRegistry::new(), policy);

        let result = handle.wait_until_open(Duration::from_millis(100)).await;
        assert!(matches!(result, Err(LinkError::NotOpen)));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let policy = ReconnectPolicy {
            max_attempts: Some(1),
            ..ReconnectPolicy::fixed(Duration::from_millis(10))
        };
        let handle = Session::spawn("ws://127.0.0.1:1/ws", HandlerRegistry::new(), policy);

        let mut state_rx = handle.subscribe();
        let closed = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if *state_rx.borrow_and_update() == SessionState::Closed
                    && handle.stats().reconnects == 1
                {
                    break;
                }
                if state_rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;
        assert!(closed.is_ok());
        assert_eq!(handle.stats().reconnects, 1);
        handle.shutdown().await;
    }
}
