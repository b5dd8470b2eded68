use crate::session::peer_session::SessionState;
use huddle_core::EndpointId;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// A negotiation message produced by a session, to be routed to its
/// remote endpoint through the signaling channel.
#[derive(Debug)]
pub enum OutboundSignal {
    Offer(String),
    Answer(String),
    Candidate(String),
}

/// Events flowing from a peer session up to the room coordinator.
pub enum SessionEvent {
    Outbound(EndpointId, OutboundSignal),
    StateChanged(EndpointId, SessionState),
    RemoteTrack(EndpointId, Arc<TrackRemote>),
    /// The media transport dropped on its own (ICE failure, remote
    /// close). The session is shutting itself down.
    TransportDisconnected(EndpointId),
    /// Final event a session emits; the coordinator forgets the handle.
    Closed(EndpointId),
}
