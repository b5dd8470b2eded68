use crate::session::SessionState;
use async_trait::async_trait;
use huddle_core::{EndpointId, Participant};
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Callbacks toward the rendering collaborator. All methods default to
/// no-ops so an embedder only implements what it displays.
#[async_trait]
pub trait RoomEvents: Send + Sync + 'static {
    async fn on_participant_joined(&self, _participant: &Participant) {}

    async fn on_participant_left(&self, _endpoint: &EndpointId) {}

    async fn on_session_state(&self, _endpoint: &EndpointId, _state: SessionState) {}

    /// A remote media track became readable. Entering `Connected` for
    /// the responder side is driven by the first of these.
    async fn on_remote_track(&self, _endpoint: &EndpointId, _track: Arc<TrackRemote>) {}

    /// The signaling transport dropped. Every session has been closed;
    /// re-joining is the embedder's decision.
    async fn on_channel_disconnected(&self) {}
}
