//! Fake daemon test helper.
//!
//! Binds a Unix datagram socket in an owned temp directory and answers
//! each received command according to a configured [`FakeBehavior`].
//! Every received datagram is recorded for later inspection.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio::net::UnixDatagram;
use tokio::task::JoinHandle;

/// What the fake daemon does with each command it receives.
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Reply with an ASCII decimal status code.
    ReplyStatus(i32),
    /// Reply with exactly these bytes.
    ReplyRaw(Vec<u8>),
    /// Receive but never answer (for timeout tests).
    Silent,
}

/// A test-scoped daemon endpoint with an owned temp directory.
///
/// The socket task is aborted and the temp directory deleted when this
/// value is dropped, guaranteeing cleanup even on panic.
pub struct FakeDaemon {
    socket_path: PathBuf,
    received: Arc<Mutex<Vec<Vec<u8>>>>,
    task: JoinHandle<()>,
    _temp_dir: TempDir,
}

impl FakeDaemon {
    /// Bind the fake daemon socket and start answering. Must be called
    /// from within a tokio runtime.
    pub fn start(behavior: FakeBehavior) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let socket_path = temp_dir.path().join("fabricmond.sock");
        let socket = UnixDatagram::bind(&socket_path).expect("failed to bind fake daemon socket");

        let received = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(serve(socket, behavior, Arc::clone(&received)));

        Self {
            socket_path,
            received,
            task,
            _temp_dir: temp_dir,
        }
    }

    /// The well-known path clients should connect to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Every datagram received so far, in arrival order.
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.received.lock().expect("received lock poisoned").clone()
    }

    /// Received datagrams decoded as command records; `None` for any
    /// datagram that is not a well-formed record.
    pub fn received_commands(&self) -> Vec<Option<fabricadm_core::Command>> {
        self.received()
            .iter()
            .map(|bytes| fabricadm_core::Command::from_bytes(bytes))
            .collect()
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(socket: UnixDatagram, behavior: FakeBehavior, received: Arc<Mutex<Vec<Vec<u8>>>>) {
    let mut buf = [0u8; 256];
    loop {
        let Ok((n, peer)) = socket.recv_from(&mut buf).await else {
            break;
        };
        received
            .lock()
            .expect("received lock poisoned")
            .push(buf[..n].to_vec());

        let reply: Option<Vec<u8>> = match &behavior {
            FakeBehavior::ReplyStatus(code) => Some(code.to_string().into_bytes()),
            FakeBehavior::ReplyRaw(bytes) => Some(bytes.clone()),
            FakeBehavior::Silent => None,
        };

        if let (Some(reply), Some(path)) = (reply, peer.as_pathname()) {
            let _ = socket.send_to(&reply, path).await;
        }
    }
}
