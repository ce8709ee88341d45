//! Discord Rich Presence transport using discord-sdk

use std::time::{Duration, UNIX_EPOCH};

use async_trait::async_trait;
use discord_sdk::{
    Discord, Subscriptions,
    activity::{ActivityBuilder, Assets},
    wheel::{UserState, Wheel},
};

use crate::presence::{PresenceConnection, PresencePayload, PresenceTransport, TransportError};

/// Timeout for waiting for the Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connects the presence worker to a locally running Discord client.
pub struct DiscordPresence {
    app_id: i64,
}

impl DiscordPresence {
    pub fn new(app_id: i64) -> Self {
        Self { app_id }
    }
}

#[async_trait]
impl PresenceTransport for DiscordPresence {
    async fn connect(&self) -> Result<Box<dyn PresenceConnection>, TransportError> {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));

        let mut user_spoke = wheel.user();

        let discord = Discord::new(self.app_id, Subscriptions::ACTIVITY, Box::new(handler))
            .map_err(|e| TransportError::Connect(format!("Discord not available: {:?}", e)))?;

        tracing::info!("Discord connecting...");

        let user = match tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
            if user_spoke.0.changed().await.is_err() {
                Err(TransportError::Connect(
                    "Discord connection closed".to_string(),
                ))
            } else {
                match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.clone()),
                    UserState::Disconnected(err) => Err(TransportError::Connect(format!(
                        "Discord disconnected: {:?}",
                        err
                    ))),
                }
            }
        })
        .await
        {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(TransportError::HandshakeTimedOut),
        };

        tracing::info!("Discord Rich Presence connected as {}", user.username);

        Ok(Box::new(DiscordConnection { discord }))
    }
}

struct DiscordConnection {
    discord: Discord,
}

impl DiscordConnection {
    fn activity(payload: &PresencePayload) -> ActivityBuilder {
        let mut assets = Assets::default();
        if let Some(image) = &payload.large_image {
            assets = assets.large(image.key.clone(), image.text.clone());
        }
        if let Some(image) = &payload.small_image {
            assets = assets.small(image.key.clone(), image.text.clone());
        }

        let start = UNIX_EPOCH + Duration::from_secs(payload.start.max(0) as u64);

        let mut activity = ActivityBuilder::new()
            .details(payload.details.clone())
            .assets(assets)
            .start_timestamp(start);

        if let Some(state) = &payload.state {
            activity = activity.state(state.clone());
        }

        activity
    }
}

#[async_trait]
impl PresenceConnection for DiscordConnection {
    async fn update(&mut self, payload: &PresencePayload) -> Result<(), TransportError> {
        self.discord
            .update_activity(Self::activity(payload))
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Update(format!("{:?}", e)))
    }

    async fn clear(&mut self) -> Result<(), TransportError> {
        self.discord
            .clear_activity()
            .await
            .map(|_| ())
            .map_err(|e| TransportError::Clear(format!("{:?}", e)))
    }

    async fn close(self: Box<Self>) {
        self.discord.disconnect().await;
        tracing::info!("Discord Rich Presence disconnected");
    }
}
