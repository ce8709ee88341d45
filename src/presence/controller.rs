//! Session lifecycle: owns the background runtime and the single live
//! presence session.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PresenceConfig;
use crate::host::HostApplication;

use super::transport::PresenceTransport;
use super::worker::{self, WorkerContext};

/// How long `stop` waits for the worker before detaching it.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that keep a session from ever starting. Everything past a
/// successful `start` is handled inside the worker.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to start background runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// One start-to-stop lifetime of the worker and its connection.
struct PresenceSession {
    cancel: CancellationToken,
    worker: JoinHandle<()>,
    runtime: Handle,
}

/// Starts and stops presence sessions on behalf of the host's plugin hooks.
///
/// At most one session is live at a time. The controller never touches the
/// presence connection itself; the worker owns it exclusively and performs
/// the remote clear when its cancellation token fires.
pub struct PresenceController {
    config: Arc<PresenceConfig>,
    host: Arc<dyn HostApplication>,
    transport: Arc<dyn PresenceTransport>,
    runtime: Option<Runtime>,
    session: Option<PresenceSession>,
}

impl PresenceController {
    pub fn new(
        config: PresenceConfig,
        host: Arc<dyn HostApplication>,
        transport: Arc<dyn PresenceTransport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            host,
            transport,
            runtime: None,
            session: None,
        }
    }

    /// Spawn a new presence session and return immediately.
    ///
    /// Calling `start` while a session is live is a no-op: the host's
    /// lifecycle hooks can double-fire on reload, and tearing down a healthy
    /// connection to build an identical one helps nobody.
    pub fn start(&mut self) -> Result<(), StartupError> {
        if let Some(session) = &self.session {
            if !session.worker.is_finished() {
                tracing::warn!("Presence session already running, ignoring start");
                return Ok(());
            }
            // Previous session died on its own (failed connect); replace it.
            self.session = None;
        }

        let runtime = self.runtime_handle()?;

        let cancel = CancellationToken::new();
        let worker = runtime.spawn(worker::run(WorkerContext {
            config: Arc::clone(&self.config),
            host: Arc::clone(&self.host),
            transport: Arc::clone(&self.transport),
            cancel: cancel.clone(),
        }));

        self.session = Some(PresenceSession {
            cancel,
            worker,
            runtime,
        });
        tracing::info!("Presence session started");
        Ok(())
    }

    /// Signal the worker to stop and wait for it, bounded by [`STOP_TIMEOUT`].
    ///
    /// Cancellation wakes the worker's sleep immediately, so under normal
    /// conditions the remote presence is cleared and the connection closed
    /// well inside the timeout. A worker stuck in a blocking client call is
    /// left to finish detached; it can push nothing further once cancelled.
    /// Safe to call with no session live.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            tracing::debug!("Stop called with no presence session");
            return;
        };

        let PresenceSession {
            cancel,
            worker,
            runtime,
        } = session;

        cancel.cancel();

        let joined = runtime.block_on(async { tokio::time::timeout(STOP_TIMEOUT, worker).await });

        match joined {
            Ok(Ok(())) => tracing::info!("Presence session stopped"),
            Ok(Err(e)) => tracing::warn!("Presence worker ended abnormally: {}", e),
            Err(_) => tracing::warn!(
                "Presence worker did not stop within {:?}, leaving it detached",
                STOP_TIMEOUT
            ),
        }
    }

    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.worker.is_finished())
    }

    /// Hand out the background runtime, building it on first use.
    fn runtime_handle(&mut self) -> Result<Handle, StartupError> {
        if let Some(runtime) = &self.runtime {
            return Ok(runtime.handle().clone());
        }

        // Two threads: one runs the session task, the spare keeps the time
        // driver alive while the session task sits in a blocking host call,
        // so the bounded join in `stop` still times out.
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("presence-worker")
            .enable_all()
            .build()
            .map_err(StartupError::Runtime)?;

        let handle = runtime.handle().clone();
        self.runtime = Some(runtime);
        Ok(handle)
    }
}

impl Drop for PresenceController {
    fn drop(&mut self) {
        self.stop();
    }
}
