use huddle_core::RoomId;
use thiserror::Error;

/// Errors surfaced to the embedding application.
///
/// Negotiation failures never show up here: they are logged and isolated
/// to the one peer session they belong to.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Capture devices could not be acquired. Fatal to the join; the
    /// room is never entered without local media.
    #[error("local media unavailable: {0}")]
    MediaUnavailable(#[from] MediaError),

    #[error("signaling channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("not joined to a room")]
    NotJoined,

    #[error("already joined to room {0}")]
    AlreadyJoined(RoomId),

    /// The coordinator task is gone; the handle is unusable.
    #[error("room coordinator terminated")]
    CoordinatorGone,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to connect to relay at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("channel is already connected")]
    AlreadyConnected,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("capture permission denied")]
    PermissionDenied,
}
