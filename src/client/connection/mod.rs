//! TCP connection manager: lifecycle state, send path, and receive loop.
//!
//! One [`TcpClient`] owns one logical connection to one remote endpoint.
//! Each successful connect creates a fresh connection generation: a write
//! half held behind a lock for caller-driven sends, and a spawned receive
//! task that reads until disconnect or failure. Generations are never shared
//! across reconnects.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected --connect ok--> Connected --disconnect (any trigger)--> Disconnected
//! ```
//!
//! The state lives in an `AtomicU8`. The Connected→Disconnected transition
//! is a compare-and-swap: whichever context wins it (owner-initiated
//! disconnect, a failing send, or the receive task itself) is the only one
//! that closes the transport and emits `StateChanged(false)`. Losers return
//! without effect, which makes disconnect idempotent and race-free.
//!
//! # Cancellation
//!
//! The receive task selects between the blocking read and a per-generation
//! shutdown channel, so an owner-initiated disconnect unblocks a pending
//! read instead of waiting for the peer to send bytes.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::client::event::{EventHub, LinkEvent};


/// Maximum bytes pulled from the transport per read.
const RECEIVE_BUFFER_SIZE: usize = 4096;

/// Default bound on how long disconnect waits for the receive task to finish.
const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Lifecycle states, stored in an `AtomicU8`.
const DISCONNECTED: u8 = 0;
const CONNECTING: u8 = 1;
const CONNECTED: u8 = 2;

/// Error returned by [`TcpClient::connect`].
///
/// Connect is the one operation that surfaces failure synchronously; send
/// and disconnect report problems only through the event stream and the log.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// A connection is already established (or a connect is in flight).
    ///
    /// Reconnecting over a live connection is rejected rather than
    /// implicitly disconnecting; callers wanting a fresh generation must
    /// disconnect first.
    #[error("already connected; disconnect before connecting again")]
    AlreadyConnected,

    /// The transport could not be opened (refused, unreachable, invalid
    /// address, timeout). State remains Disconnected and the caller may
    /// retry.
    #[error("failed to connect to {addr}: {source}")]
    Io {
        /// The `host:port` endpoint that was dialed.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Manager for a single persistent TCP connection.
///
/// Cloneable and cheap to share: all clones drive the same connection. The
/// receive task holds a clone, which is how a read failure can force the
/// shared state back to Disconnected.
///
/// # Example
///
/// ```no_run
/// use wireline::TcpClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
/// let client = TcpClient::new("127.0.0.1".to_string(), 5000);
/// client.connect().await?;
/// client.send("hello").await;
/// client.disconnect().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TcpClient {
    /// Remote host to dial.
    host: String,
    /// Remote TCP port to dial.
    port: u16,
    /// Bound on the teardown wait for the receive task.
    disconnect_timeout: Duration,
    /// Atomic lifecycle state machine.
    state: Arc<AtomicU8>,
    /// Write half of the current generation, exclusively locked per send.
    writer: Arc<Mutex<Option<OwnedWriteHalf>>>,
    /// Receive task handle of the current generation.
    receive_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    /// Shutdown signal sender for the current generation's receive task.
    shutdown_tx: Arc<Mutex<Option<broadcast::Sender<()>>>>,
    /// Broadcast hub for state-change and data events.
    events: EventHub,
}

impl TcpClient {
    /// Creates a disconnected client targeting `host:port`.
    pub fn new(host: String, port: u16) -> Self {
        tracing::debug!("Creating TcpClient for {}:{}", host, port);
        Self {
            host,
            port,
            disconnect_timeout: DEFAULT_DISCONNECT_TIMEOUT,
            state: Arc::new(AtomicU8::new(DISCONNECTED)),
            writer: Arc::new(Mutex::new(None)),
            receive_task: Arc::new(Mutex::new(None)),
            shutdown_tx: Arc::new(Mutex::new(None)),
            events: EventHub::new(),
        }
    }

    /// Creates a client from a loaded [`Config`](crate::config::schema::Config).
    pub fn from_config(config: &crate::config::schema::Config) -> Self {
        let mut client = Self::new(config.host.clone(), config.port);
        client.disconnect_timeout = Duration::from_millis(config.disconnect_timeout_ms);
        client
    }

    /// Returns the configured remote host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the configured remote port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `true` while a connection generation is live.
    pub fn is_connected(&self) -> bool {
        self.state.load(Ordering::Acquire) == CONNECTED
    }

    /// Registers a subscriber for [`LinkEvent`] notifications.
    ///
    /// Subscribers may attach before or during a connection; the receiver
    /// only observes events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<LinkEvent> {
        self.events.subscribe()
    }

    /// Opens the transport and starts a new connection generation.
    ///
    /// On success `StateChanged(true)` is emitted, the state flips to
    /// Connected, and the receive task is spawned, so the notification
    /// always precedes the generation's first read attempt.
    ///
    /// On transport failure the state stays Disconnected,
    /// `StateChanged(false)` is emitted, the cause is logged, and the error
    /// is returned. The caller may retry.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::AlreadyConnected`] - a generation is already live;
    ///   this call had no effect.
    /// * [`ConnectError::Io`] - the endpoint could not be reached.
    pub async fn connect(&self) -> Result<(), ConnectError> {
        // Single-entry gate: also excludes a second connect racing this one.
        if self
            .state
            .compare_exchange(
                DISCONNECTED,
                CONNECTING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            tracing::warn!(
                "Connect to {}:{} rejected: already connected",
                self.host,
                self.port
            );
            return Err(ConnectError::AlreadyConnected);
        }

        let addr = format!("{}:{}", self.host, self.port);
        let stream = match TcpStream::connect(&addr).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("Error connecting to server at {}: {}", addr, e);
                self.state.store(DISCONNECTED, Ordering::Release);
                self.events.emit(LinkEvent::StateChanged(false));
                return Err(ConnectError::Io { addr, source: e });
            }
        };

        tracing::info!("Connected to server at {}", addr);

        let (read_half, write_half) = stream.into_split();
        *self.writer.lock().await = Some(write_half);

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        *self.shutdown_tx.lock().await = Some(shutdown_tx);

        // Emitted before the state flips: a disconnect can only win the
        // Connected→Disconnected transition after the store below, so its
        // StateChanged(false) can never be observed ahead of this event.
        self.events.emit(LinkEvent::StateChanged(true));
        self.state.store(CONNECTED, Ordering::Release);

        let client = self.clone();
        let handle = tokio::spawn(async move {
            client.receive_loop(read_half, shutdown_rx).await;
        });
        *self.receive_task.lock().await = Some(handle);

        Ok(())
    }

    /// Sends `payload` as UTF-8 bytes on the caller's task.
    ///
    /// Best-effort: when not connected the payload is dropped with a
    /// warning, and a write failure forces a disconnect instead of
    /// propagating to the caller. Failures surface through the log and a
    /// single `StateChanged(false)` event.
    pub async fn send(&self, payload: &str) {
        if self.state.load(Ordering::Acquire) != CONNECTED {
            tracing::warn!("TCP client is not connected; dropping outbound payload");
            return;
        }

        let mut guard = self.writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            // A disconnect took the writer between the state check and the
            // lock; treat it the same as not connected.
            tracing::warn!("TCP client is not connected; dropping outbound payload");
            return;
        };

        if let Err(e) = writer.write_all(payload.as_bytes()).await {
            // Teardown locks the writer itself; release it first.
            drop(guard);
            tracing::error!("Error sending data: {}", e);
            self.disconnect().await;
        }
    }

    /// Closes the current generation and emits `StateChanged(false)`.
    ///
    /// Idempotent: only the caller that wins the Connected→Disconnected
    /// transition tears down and notifies; every other call (including one
    /// racing the receive task's own failure path) is a no-op.
    ///
    /// The wait for the receive task is bounded by the configured
    /// disconnect timeout (default 500 ms). A timeout is logged as a
    /// resource-leak risk and disconnect proceeds rather than blocking.
    pub async fn disconnect(&self) {
        if !self.teardown().await {
            tracing::debug!("Disconnect ignored: not connected");
            return;
        }

        let handle = self.receive_task.lock().await.take();
        if let Some(handle) = handle {
            match timeout(self.disconnect_timeout, handle).await {
                Ok(Ok(())) => tracing::debug!("Receive task finished"),
                Ok(Err(e)) => tracing::warn!("Receive task aborted abnormally: {}", e),
                Err(_) => tracing::warn!(
                    "Receive task did not finish within {:?}; detaching (possible resource leak)",
                    self.disconnect_timeout
                ),
            }
        }

        tracing::info!("Disconnected from {}:{}", self.host, self.port);
        self.events.emit(LinkEvent::StateChanged(false));
    }

    /// Runs the Connected→Disconnected transition and closes the transport.
    ///
    /// Returns `true` only for the single caller that won the transition.
    /// The `StateChanged(false)` event is the winner's responsibility and
    /// is emitted after this returns, once the transport is inert.
    async fn teardown(&self) -> bool {
        if self
            .state
            .compare_exchange(
                CONNECTED,
                DISCONNECTED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return false;
        }

        // Unblock a pending read before touching the transport.
        if let Some(tx) = self.shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }

        // Shutting down an already-closed stream is tolerated as a no-op.
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.shutdown().await {
                tracing::debug!("Transport shutdown returned: {}", e);
            }
        }

        true
    }

    /// Receive loop for one connection generation.
    ///
    /// Reads up to [`RECEIVE_BUFFER_SIZE`] bytes at a time, republishing
    /// each chunk as a `DataReceived` event. A zero-byte read is the remote
    /// peer's graceful close; a read error is a transport failure. Both end
    /// the generation through the same CAS-gated teardown as an explicit
    /// disconnect - except the loop never joins its own task, so it emits
    /// `StateChanged(false)` itself when it wins the transition.
    async fn receive_loop(
        &self,
        mut reader: OwnedReadHalf,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut buffer = [0u8; RECEIVE_BUFFER_SIZE];

        loop {
            // Exit promptly once another context has torn the link down.
            if self.state.load(Ordering::Acquire) != CONNECTED {
                tracing::debug!("Receive loop observed disconnected state, exiting");
                break;
            }

            tokio::select! {
                result = reader.read(&mut buffer) => {
                    match result {
                        Ok(0) => {
                            tracing::info!("Remote peer closed the connection");
                            self.teardown_from_receive_loop().await;
                            break;
                        }
                        Ok(n) => {
                            tracing::trace!("Received {} bytes", n);
                            let text = String::from_utf8_lossy(&buffer[..n]).into_owned();
                            self.events.emit(LinkEvent::DataReceived(text));
                        }
                        Err(e) => {
                            tracing::error!("Error receiving data: {}", e);
                            self.teardown_from_receive_loop().await;
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("Receive loop received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Self-initiated teardown from inside the receive task.
    ///
    /// Identical to [`disconnect`](Self::disconnect) except it never awaits
    /// the receive task handle - this *is* the receive task, and joining
    /// itself would deadlock.
    async fn teardown_from_receive_loop(&self) {
        if self.teardown().await {
            tracing::info!("Disconnected from {}:{}", self.host, self.port);
            self.events.emit(LinkEvent::StateChanged(false));
        }
    }
}

impl std::fmt::Debug for TcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}
