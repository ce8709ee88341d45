use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Discord application id the presence is published under.
const DEFAULT_CLIENT_ID: i64 = 1464029894223855642;

/// Seconds between presence refreshes.
const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 15;

/// An image asset uploaded to the Discord application, plus its hover text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Asset key as uploaded to Discord (case-sensitive, no spaces).
    pub key: String,
    pub text: Option<String>,
}

impl ImageAsset {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: Some(text.into()),
        }
    }
}

/// Static add-in configuration, loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub client_id: i64,
    pub update_interval_secs: u64,
    pub large_image: Option<ImageAsset>,
    pub small_image: Option<ImageAsset>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID,
            update_interval_secs: DEFAULT_UPDATE_INTERVAL_SECS,
            large_image: Some(ImageAsset::new("fusion_logo", "Autodesk Fusion")),
            small_image: Some(ImageAsset::new("designing", "Designing")),
        }
    }
}

impl PresenceConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults; an unreadable or corrupt file is
    /// logged and also yields the defaults. Configuration problems must never
    /// keep the add-in from starting.
    pub fn load(path: &Path) -> Self {
        tracing::debug!("Loading presence config from {}", path.display());

        if !path.exists() {
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
}
