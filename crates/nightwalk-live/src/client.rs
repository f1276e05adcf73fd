//! Receive-only WebSocket client for simulated or shared device positions.
//!
//! [`LiveLocationClient::connect`] spawns one task that owns the socket. The
//! task reconnects on close or connect failure following a
//! [`ReconnectPolicy`], and stops for good once the returned handle is
//! disconnected or dropped. Only one reconnect sleep is ever pending, and it
//! is raced against the shutdown signal so no reconnect follows a disconnect.

use futures::StreamExt;
use nightwalk_core::LocationUpdate;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::backoff::ReconnectPolicy;
use crate::error::LiveError;
use crate::message::parse_frame;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Terminal: disconnected by the owner or out of reconnect attempts.
    Stopped,
}

pub struct LiveLocationClient;

impl LiveLocationClient {
    /// Starts the socket task and returns its handle.
    ///
    /// `on_update` runs on the socket task for every `location_update` frame.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError::Socket`] if `url` is not a usable WebSocket URL.
    pub fn connect<F>(
        url: &str,
        policy: ReconnectPolicy,
        on_update: F,
    ) -> Result<LiveLocationHandle, LiveError>
    where
        F: FnMut(LocationUpdate) + Send + 'static,
    {
        url.into_client_request()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let task = tokio::spawn(run(
            url.to_owned(),
            policy,
            on_update,
            shutdown_rx,
            state_tx,
        ));

        Ok(LiveLocationHandle {
            shutdown: shutdown_tx,
            state: state_rx,
            task: Some(task),
        })
    }
}

/// Owner's side of a running live client. Dropping it stops the client.
pub struct LiveLocationHandle {
    shutdown: watch::Sender<bool>,
    state: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl LiveLocationHandle {
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Closes the socket, cancels any pending reconnect, and waits for the
    /// task to finish.
    pub async fn disconnect(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "live client task ended abnormally");
            }
        }
        tracing::info!("live location client disconnected");
    }
}

impl Drop for LiveLocationHandle {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

enum SessionEnd {
    Shutdown,
    Closed,
}

async fn run<F>(
    url: String,
    policy: ReconnectPolicy,
    mut on_update: F,
    mut shutdown: watch::Receiver<bool>,
    state: watch::Sender<ConnectionState>,
) where
    F: FnMut(LocationUpdate) + Send + 'static,
{
    let mut failures: u32 = 0;

    loop {
        state.send_replace(ConnectionState::Connecting);
        tracing::debug!(%url, "connecting to live location socket");

        let connected = tokio::select! {
            biased;
            () = shutdown_requested(&mut shutdown) => break,
            result = tokio_tungstenite::connect_async(url.as_str()) => result,
        };

        match connected {
            Ok((mut socket, _response)) => {
                failures = 0;
                state.send_replace(ConnectionState::Connected);
                tracing::info!(%url, "live location socket connected");

                match read_frames(&mut socket, &mut on_update, &mut shutdown).await {
                    SessionEnd::Shutdown => {
                        if let Err(e) = socket.close(None).await {
                            tracing::debug!(error = %e, "close handshake failed");
                        }
                        break;
                    }
                    SessionEnd::Closed => tracing::info!(%url, "live location socket closed"),
                }
            }
            Err(e) => {
                let err = LiveError::from(e);
                tracing::warn!(%url, error = %err, "live location socket connect failed");
            }
        }

        state.send_replace(ConnectionState::Disconnected);
        failures = failures.saturating_add(1);
        if policy.is_exhausted(failures) {
            tracing::warn!(
                attempts = policy.max_attempts,
                "live location reconnect attempts exhausted; giving up"
            );
            break;
        }

        let delay = policy.delay_for(failures);
        tracing::info!(
            attempt = failures,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "scheduling live location reconnect"
        );
        tokio::select! {
            biased;
            () = shutdown_requested(&mut shutdown) => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    state.send_replace(ConnectionState::Stopped);
}

async fn read_frames<F>(
    socket: &mut Socket,
    on_update: &mut F,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd
where
    F: FnMut(LocationUpdate),
{
    loop {
        let frame = tokio::select! {
            biased;
            () = shutdown_requested(shutdown) => return SessionEnd::Shutdown,
            frame = socket.next() => frame,
        };

        match frame {
            Some(Ok(Message::Text(text))) => match parse_frame(&text) {
                Ok(Some(update)) => {
                    tracing::debug!(lat = update.lat, lng = update.lng, "location update");
                    on_update(update);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "dropping malformed live frame"),
            },
            Some(Ok(Message::Close(frame))) => {
                tracing::debug!(?frame, "server closed live socket");
                return SessionEnd::Closed;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                let err = LiveError::from(e);
                tracing::warn!(error = %err, "live socket read failed");
                return SessionEnd::Closed;
            }
            None => return SessionEnd::Closed,
        }
    }
}

/// Resolves once shutdown is requested or the handle has been dropped.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
