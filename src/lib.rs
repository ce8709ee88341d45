//! Discord Rich Presence add-in runtime for Autodesk Fusion.
//!
//! The embedding layer implements [`HostApplication`] over the Fusion API
//! and forwards the host's add-in lifecycle hooks to [`PresenceAddin`];
//! everything else (the background worker, the Discord connection, the
//! payload formatting) lives in here.

mod config;
mod discord;
mod host;
mod logging;
mod presence;

pub use config::{ImageAsset, PresenceConfig};
pub use discord::DiscordPresence;
pub use host::{HostApplication, HostDocument, HostError};
pub use logging::init_logging;
pub use presence::{
    ActivityText, PresenceConnection, PresenceController, PresencePayload, PresenceTransport,
    StartupError, TransportError,
};

use std::sync::Arc;

/// The add-in as the host runtime sees it.
///
/// Both hooks are infallible from the host's perspective: [`start`] reports
/// install-time problems through the host's error dialog and otherwise only
/// logs, [`stop`] cannot fail. No error or panic propagates into the host.
///
/// [`start`]: PresenceAddin::start
/// [`stop`]: PresenceAddin::stop
pub struct PresenceAddin {
    controller: PresenceController,
    host: Arc<dyn HostApplication>,
}

impl PresenceAddin {
    /// Build an add-in publishing to Discord with the given configuration.
    pub fn new(host: Arc<dyn HostApplication>, config: PresenceConfig) -> Self {
        let transport = Arc::new(DiscordPresence::new(config.client_id));
        Self::with_transport(host, config, transport)
    }

    /// Build an add-in publishing through an arbitrary transport.
    pub fn with_transport(
        host: Arc<dyn HostApplication>,
        config: PresenceConfig,
        transport: Arc<dyn PresenceTransport>,
    ) -> Self {
        Self {
            controller: PresenceController::new(config, Arc::clone(&host), transport),
            host,
        }
    }

    /// Host "add-in started" hook.
    ///
    /// A failure here means a broken installation, so it is the one case
    /// surfaced through a blocking user dialog.
    pub fn start(&mut self) {
        if let Err(e) = self.controller.start() {
            tracing::error!("Failed to start presence add-in: {}", e);
            self.host
                .show_error(&format!("Failed to start Discord Rich Presence:\n{}", e));
        }
    }

    /// Host "add-in stopped" hook.
    pub fn stop(&mut self) {
        self.controller.stop();
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }
}
