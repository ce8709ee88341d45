mod controller;
mod payload;
mod transport;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{PresenceController, StartupError};
pub use payload::{ActivityText, PresencePayload};
pub use transport::{PresenceConnection, PresenceTransport, TransportError};
