use crate::error::ClientError;
use crate::media::TrackKind;
use huddle_core::RoomId;
use tokio::sync::oneshot;

/// Commands from the embedding application into the room coordinator.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        room: RoomId,
        display_name: String,
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    Leave {
        reply: oneshot::Sender<Result<(), ClientError>>,
    },
    /// Mute / camera toggle on the shared local media.
    SetTrackEnabled { kind: TrackKind, enabled: bool },
}
