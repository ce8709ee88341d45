//! Connection-oriented presence client contract.
//!
//! The worker assumes exactly these four operations and nothing stronger: no
//! delivery acknowledgement, no client-side retries. The Discord
//! implementation lives in [`crate::discord`]; tests use an in-memory fake.

use async_trait::async_trait;

use super::payload::PresencePayload;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to reach presence service: {0}")]
    Connect(String),

    #[error("presence service handshake timed out")]
    HandshakeTimedOut,

    #[error("presence update rejected: {0}")]
    Update(String),

    #[error("presence clear rejected: {0}")]
    Clear(String),
}

/// Factory for presence connections.
#[async_trait]
pub trait PresenceTransport: Send + Sync {
    /// Establish a connection to the presence service.
    ///
    /// Called once per session; the worker does not retry a failed connect.
    async fn connect(&self) -> Result<Box<dyn PresenceConnection>, TransportError>;
}

/// One live connection, exclusively owned by the worker for its lifetime.
#[async_trait]
pub trait PresenceConnection: Send {
    /// Replace the displayed presence with `payload`.
    async fn update(&mut self, payload: &PresencePayload) -> Result<(), TransportError>;

    /// Remove the displayed presence, best effort.
    async fn clear(&mut self) -> Result<(), TransportError>;

    /// Release the connection.
    async fn close(self: Box<Self>);
}
