//! Ephemeral datagram sessions with the daemon.
//!
//! A [`Session`] is strictly single-use: created immediately before one
//! request/response exchange and torn down immediately after. The local
//! socket path embeds the process id and a process-wide counter so
//! concurrent invocations never collide.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::net::UnixDatagram;
use tokio::time;
use tracing::debug;

use super::wire::{Command, Reply, MAX_REPLY_SIZE};
use crate::BoxFuture;

/// How long to wait for the daemon's reply. A fixed protocol constant,
/// not configurable.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Distinguishes local-socket counters within one process.
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Errors from the control-interface transport.
#[derive(Debug, thiserror::Error)]
pub enum ClifError {
    #[error("failed to bind client socket at {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to connect to daemon socket at {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to send command: {0}")]
    Send(std::io::Error),

    #[error("failed to receive reply: {0}")]
    Recv(std::io::Error),

    #[error("command timed out")]
    TimedOut,
}

/// One ephemeral client endpoint, bound and connected on open.
#[derive(Debug)]
pub struct Session {
    socket: UnixDatagram,
    local_path: PathBuf,
}

impl Session {
    /// Bind a private client socket and record the daemon as its default
    /// destination.
    ///
    /// Connecting a datagram socket does not require the daemon to be
    /// serving yet, but the well-known path must exist. If any step
    /// after the bind fails, the local socket file is unlinked before
    /// the error propagates.
    pub fn open(daemon_path: &Path) -> Result<Self, ClifError> {
        let local_path = std::env::temp_dir().join(format!(
            "fabricadm_clif_{}-{}",
            std::process::id(),
            SESSION_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let socket = UnixDatagram::bind(&local_path).map_err(|source| ClifError::Bind {
            path: local_path.clone(),
            source,
        })?;

        if let Err(source) = socket.connect(daemon_path) {
            let _ = std::fs::remove_file(&local_path);
            return Err(ClifError::Connect {
                path: daemon_path.to_path_buf(),
                source,
            });
        }

        debug!(local = %local_path.display(), daemon = %daemon_path.display(), "session open");
        Ok(Self { socket, local_path })
    }

    /// Perform one request/response exchange with the fixed
    /// [`RESPONSE_TIMEOUT`].
    pub async fn exchange(&self, cmd: &Command) -> Result<Reply, ClifError> {
        self.exchange_deadline(cmd, RESPONSE_TIMEOUT).await
    }

    /// One send, one bounded wait, one receive.
    ///
    /// A failed send returns immediately; there is no retry and no
    /// partial-message reassembly. An elapsed deadline yields
    /// [`ClifError::TimedOut`], distinct from other transport failures.
    pub async fn exchange_deadline(
        &self,
        cmd: &Command,
        deadline: Duration,
    ) -> Result<Reply, ClifError> {
        self.socket
            .send(&cmd.to_bytes())
            .await
            .map_err(ClifError::Send)?;

        let mut buf = [0u8; MAX_REPLY_SIZE];
        match time::timeout(deadline, self.socket.recv(&mut buf)).await {
            Err(_elapsed) => Err(ClifError::TimedOut),
            Ok(Err(e)) => Err(ClifError::Recv(e)),
            Ok(Ok(n)) => {
                debug!(bytes = n, "reply received");
                Ok(Reply::new(&buf[..n]))
            }
        }
    }

    /// The session's private socket path.
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Unlink the local socket file and close the handle.
    ///
    /// Called exactly once per opened session, on every exit path; the
    /// session does not clean itself up implicitly.
    pub fn close(self) {
        let _ = std::fs::remove_file(&self.local_path);
        drop(self.socket);
    }
}

/// Transport seam used by the dispatcher.
///
/// The production implementation opens a fresh [`Session`] per request;
/// tests substitute stubs to observe (or suppress) traffic.
pub trait ClifTransport: Send + Sync {
    /// Send one command and return the daemon's reply.
    fn request<'a>(&'a self, cmd: &'a Command) -> BoxFuture<'a, Result<Reply, ClifError>>;
}

/// Production transport: one single-use datagram session per request.
pub struct DatagramTransport {
    daemon_path: PathBuf,
}

impl DatagramTransport {
    /// Create a transport targeting the daemon's well-known socket path.
    pub fn new(daemon_path: impl Into<PathBuf>) -> Self {
        Self {
            daemon_path: daemon_path.into(),
        }
    }
}

impl ClifTransport for DatagramTransport {
    fn request<'a>(&'a self, cmd: &'a Command) -> BoxFuture<'a, Result<Reply, ClifError>> {
        Box::pin(async move {
            let session = Session::open(&self.daemon_path)?;
            let result = session.exchange(cmd).await;
            // Closed on success and on a failed exchange alike.
            session.close();
            result
        })
    }
}
