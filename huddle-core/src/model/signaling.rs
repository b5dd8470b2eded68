use crate::model::endpoint::EndpointId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// A member entry in the `existing-users` roster snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingUser {
    pub socket_id: EndpointId,
    pub user_name: String,
}

/// The full relay vocabulary, both directions.
///
/// The relay is a dumb fan-out layer: it routes `offer` / `answer` /
/// `ice-candidate` by `targetSocketId` without reading the payload, and
/// fans room membership events out to everyone else in the room. All
/// semantics live on the client side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
#[serde(rename_all_fields = "camelCase")]
pub enum SignalEvent {
    /// Relay -> client, first event on a fresh connection: announces the
    /// endpoint id the relay assigned to this client.
    Welcome { socket_id: EndpointId },
    /// Client -> relay: request membership in a room.
    JoinRoom { room_id: RoomId, user_id: String },
    /// Client -> relay: request departure from a room.
    LeaveRoom { room_id: RoomId, user_id: String },
    /// Relay -> client: another participant entered the room.
    UserJoined {
        socket_id: EndpointId,
        user_id: String,
    },
    /// Relay -> client: roster snapshot sent to a joiner so it can catch
    /// up with members already in the room.
    ExistingUsers(Vec<ExistingUser>),
    /// Relay -> client: a participant left the room.
    UserLeft {
        socket_id: EndpointId,
        user_id: String,
    },
    Offer {
        target_socket_id: EndpointId,
        sender_socket_id: EndpointId,
        offer: String,
        room_name: RoomId,
    },
    Answer {
        target_socket_id: EndpointId,
        sender_socket_id: EndpointId,
        answer: String,
        room_name: RoomId,
    },
    IceCandidate {
        target_socket_id: EndpointId,
        sender_socket_id: EndpointId,
        candidate: String,
    },
}
