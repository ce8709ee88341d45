//! Presence payload construction.
//!
//! The text derivation is kept separate from the transport so it can be
//! tested as a pure function. Every constructor defines both `details` and
//! `state`; there is no path on which one of them is left undecided.

use crate::config::{ImageAsset, PresenceConfig};

/// Extension Fusion appends to design documents.
const DOCUMENT_SUFFIX: &str = ".f3d";

/// Shown when no document is open or the host cannot be read.
const IDLE_DETAILS: &str = "Idle";

/// Shown when a document has no readable project association.
pub(crate) const FALLBACK_PROJECT: &str = "Unknown Project";

/// The two formatted status lines for one presence update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityText {
    pub details: String,
    /// Omitted entirely while idle.
    pub state: Option<String>,
}

impl ActivityText {
    pub fn idle() -> Self {
        Self {
            details: IDLE_DETAILS.to_string(),
            state: None,
        }
    }

    pub fn working(project: &str, document: &str) -> Self {
        Self {
            details: format!("Project: {}", project),
            state: Some(format!("Working on: {}", strip_document_suffix(document))),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_none()
    }
}

/// Drop a trailing `.f3d` from a document name; names without it pass
/// through unchanged.
fn strip_document_suffix(name: &str) -> &str {
    name.strip_suffix(DOCUMENT_SUFFIX).unwrap_or(name)
}

/// One immutable presence snapshot, built per cycle, transmitted and
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresencePayload {
    pub details: String,
    pub state: Option<String>,
    pub large_image: Option<ImageAsset>,
    pub small_image: Option<ImageAsset>,
    /// Epoch seconds of the session connect; identical across all payloads
    /// of one session so the remote display shows continuous elapsed time.
    pub start: i64,
}

impl PresencePayload {
    pub fn new(text: ActivityText, config: &PresenceConfig, start: i64) -> Self {
        Self {
            details: text.details,
            state: text.state,
            large_image: config.large_image.clone(),
            small_image: config.small_image.clone(),
            start,
        }
    }
}
