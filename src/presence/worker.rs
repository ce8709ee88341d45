//! The background presence worker.
//!
//! One task per session: connect once, then loop querying the host and
//! pushing updates until cancelled. Host queries and pushes are allowed to
//! fail on any cycle; the only fatal conditions are the initial connect
//! failure and cancellation itself.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::config::PresenceConfig;
use crate::host::HostApplication;

use super::payload::{ActivityText, FALLBACK_PROJECT, PresencePayload};
use super::transport::PresenceTransport;

/// Everything a worker run needs, handed over at spawn time.
pub(crate) struct WorkerContext {
    pub config: Arc<PresenceConfig>,
    pub host: Arc<dyn HostApplication>,
    pub transport: Arc<dyn PresenceTransport>,
    pub cancel: CancellationToken,
}

/// Run one presence session to completion.
///
/// Returning at all is the Terminated state; the controller's bounded join
/// unblocks on it.
pub(crate) async fn run(ctx: WorkerContext) {
    let mut conn = match ctx.transport.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            // Fatal for this session. No retry, no user dialog: the add-in
            // is a background nicety and the chat client may simply not be
            // running.
            tracing::warn!("Presence connect failed, session aborted: {}", e);
            return;
        }
    };

    let started_at = unix_now();
    tracing::info!("Presence connected");

    while !ctx.cancel.is_cancelled() {
        let text = observe_host(ctx.host.as_ref());
        let payload = PresencePayload::new(text, &ctx.config, started_at);

        if let Err(e) = conn.update(&payload).await {
            // Transient (e.g. chat client restarting). Keep the connection
            // and retry on the next cycle.
            tracing::debug!("Failed to push presence update: {}", e);
        }

        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = tokio::time::sleep(ctx.config.update_interval()) => {}
        }
    }

    if let Err(e) = conn.clear().await {
        tracing::debug!("Failed to clear presence on shutdown: {}", e);
    }
    conn.close().await;

    tracing::info!("Presence session closed");
}

/// Read the host state for one cycle, substituting fallbacks for anything
/// the host cannot answer right now.
fn observe_host(host: &dyn HostApplication) -> ActivityText {
    let document = match host.active_document() {
        Ok(Some(document)) => document,
        Ok(None) => return ActivityText::idle(),
        Err(e) => {
            tracing::debug!("Active document query failed: {}", e);
            return ActivityText::idle();
        }
    };

    // A document whose name cannot be read is mid-transition; report Idle
    // for this cycle rather than a half-built title.
    let name = match document.display_name() {
        Ok(name) => name,
        Err(e) => {
            tracing::debug!("Document name query failed: {}", e);
            return ActivityText::idle();
        }
    };

    let project = match document.project_name() {
        Ok(Some(project)) => project,
        Ok(None) => FALLBACK_PROJECT.to_string(),
        Err(e) => {
            tracing::debug!("Project lookup failed: {}", e);
            FALLBACK_PROJECT.to_string()
        }
    };

    ActivityText::working(&project, &name)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
