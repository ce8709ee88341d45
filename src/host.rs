//! Traits describing the hosting CAD application.
//!
//! The add-in never talks to the Fusion API directly; the embedding layer
//! implements these traits and every call is allowed to fail. Host state is
//! routinely unavailable mid-session (no open document, document still
//! uploading to the cloud, project association missing), so callers must
//! treat each accessor independently and substitute fallbacks locally.

/// Error raised by a host accessor.
///
/// The message is whatever the host API reported; the add-in only ever logs
/// it, so no structured variants are needed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("host query failed: {0}")]
pub struct HostError(String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A snapshot of one open document.
pub trait HostDocument {
    /// Human-readable display name, extension included (e.g. `Bracket.f3d`).
    fn display_name(&self) -> Result<String, HostError>;

    /// Name of the cloud project the document belongs to, `None` when the
    /// document has not been saved into a project yet.
    fn project_name(&self) -> Result<Option<String>, HostError>;
}

/// Read access to the hosting application, implemented by the embedding layer.
pub trait HostApplication: Send + Sync {
    /// The currently focused document, `None` when nothing is open.
    fn active_document(&self) -> Result<Option<Box<dyn HostDocument>>, HostError>;

    /// Show a blocking error dialog to the user.
    ///
    /// Only used for install-time problems (see [`crate::PresenceAddin`]);
    /// runtime hiccups never reach the user.
    fn show_error(&self, message: &str);
}
