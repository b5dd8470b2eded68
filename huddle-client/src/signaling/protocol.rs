use crate::signaling::channel::SignalingChannel;
use huddle_core::{EndpointId, ExistingUser, RoomId, SignalEvent};
use std::sync::Arc;
use tracing::warn;

/// An inbound relay event translated into a coordinator operation.
#[derive(Debug)]
pub enum InboundSignal {
    Welcome {
        endpoint: EndpointId,
    },
    PeerJoined {
        endpoint: EndpointId,
        display_name: String,
    },
    ExistingPeers(Vec<ExistingUser>),
    PeerLeft {
        endpoint: EndpointId,
    },
    OfferReceived {
        from: EndpointId,
        sdp: String,
    },
    AnswerReceived {
        from: EndpointId,
        sdp: String,
    },
    CandidateReceived {
        from: EndpointId,
        candidate: String,
    },
}

/// Translates between the relay wire vocabulary and coordinator
/// operations. Every outbound negotiation message is stamped with
/// `{senderSocketId, targetSocketId, roomName}` so the relay can route it
/// point-to-point without understanding the payload.
pub struct ProtocolHandler {
    channel: Arc<dyn SignalingChannel>,
    local: Option<EndpointId>,
    room: Option<RoomId>,
}

impl ProtocolHandler {
    pub fn new(channel: Arc<dyn SignalingChannel>) -> Self {
        Self {
            channel,
            local: None,
            room: None,
        }
    }

    pub fn local_endpoint(&self) -> Option<&EndpointId> {
        self.local.as_ref()
    }

    pub fn set_local_endpoint(&mut self, endpoint: EndpointId) {
        self.local = Some(endpoint);
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    /// Forgets the connection-scoped state (endpoint id and room) after a
    /// leave or disconnect.
    pub fn reset(&mut self) {
        self.local = None;
        self.room = None;
    }

    pub async fn send_join(&mut self, room: RoomId, user_id: &str) {
        self.room = Some(room.clone());
        self.channel
            .send(SignalEvent::JoinRoom {
                room_id: room,
                user_id: user_id.to_owned(),
            })
            .await;
    }

    pub async fn send_leave(&self, user_id: &str) {
        let Some(room) = self.room.clone() else {
            return;
        };
        self.channel
            .send(SignalEvent::LeaveRoom {
                room_id: room,
                user_id: user_id.to_owned(),
            })
            .await;
    }

    pub async fn send_offer(&self, target: EndpointId, sdp: String) {
        let (Some(local), Some(room)) = (self.local.clone(), self.room.clone()) else {
            warn!("Cannot send offer before welcome/join");
            return;
        };
        self.channel
            .send(SignalEvent::Offer {
                target_socket_id: target,
                sender_socket_id: local,
                offer: sdp,
                room_name: room,
            })
            .await;
    }

    pub async fn send_answer(&self, target: EndpointId, sdp: String) {
        let (Some(local), Some(room)) = (self.local.clone(), self.room.clone()) else {
            warn!("Cannot send answer before welcome/join");
            return;
        };
        self.channel
            .send(SignalEvent::Answer {
                target_socket_id: target,
                sender_socket_id: local,
                answer: sdp,
                room_name: room,
            })
            .await;
    }

    pub async fn send_candidate(&self, target: EndpointId, candidate: String) {
        let Some(local) = self.local.clone() else {
            warn!("Cannot send candidate before welcome");
            return;
        };
        self.channel
            .send(SignalEvent::IceCandidate {
                target_socket_id: target,
                sender_socket_id: local,
                candidate,
            })
            .await;
    }

    /// Maps an inbound relay event to a coordinator operation. Events
    /// addressed to a different endpoint, and events that are
    /// client-to-relay only, decode to `None`.
    pub fn decode(&self, event: SignalEvent) -> Option<InboundSignal> {
        match event {
            SignalEvent::Welcome { socket_id } => Some(InboundSignal::Welcome {
                endpoint: socket_id,
            }),
            SignalEvent::UserJoined { socket_id, user_id } => Some(InboundSignal::PeerJoined {
                endpoint: socket_id,
                display_name: user_id,
            }),
            SignalEvent::ExistingUsers(users) => Some(InboundSignal::ExistingPeers(users)),
            SignalEvent::UserLeft { socket_id, .. } => Some(InboundSignal::PeerLeft {
                endpoint: socket_id,
            }),
            SignalEvent::Offer {
                target_socket_id,
                sender_socket_id,
                offer,
                ..
            } => self
                .check_target(target_socket_id)
                .then_some(InboundSignal::OfferReceived {
                    from: sender_socket_id,
                    sdp: offer,
                }),
            SignalEvent::Answer {
                target_socket_id,
                sender_socket_id,
                answer,
                ..
            } => self
                .check_target(target_socket_id)
                .then_some(InboundSignal::AnswerReceived {
                    from: sender_socket_id,
                    sdp: answer,
                }),
            SignalEvent::IceCandidate {
                target_socket_id,
                sender_socket_id,
                candidate,
            } => self
                .check_target(target_socket_id)
                .then_some(InboundSignal::CandidateReceived {
                    from: sender_socket_id,
                    candidate,
                }),
            SignalEvent::JoinRoom { .. } | SignalEvent::LeaveRoom { .. } => {
                warn!("Relay echoed a client-only event: {event:?}");
                None
            }
        }
    }

    fn check_target(&self, target: EndpointId) -> bool {
        match &self.local {
            Some(local) if *local == target => true,
            _ => {
                warn!("Dropping misrouted signal for {target}");
                false
            }
        }
    }
}
