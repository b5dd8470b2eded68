mod endpoint;
mod participant;
mod room;
mod signaling;

pub use endpoint::EndpointId;
pub use participant::Participant;
pub use room::RoomId;
pub use signaling::{ExistingUser, IceServerConfig, SignalEvent};
