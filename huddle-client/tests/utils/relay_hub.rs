use crate::utils::mock_signaling::MockChannel;
use huddle_core::{EndpointId, ExistingUser, RoomId, SignalEvent};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
struct HubInner {
    channels: HashMap<EndpointId, Arc<MockChannel>>,
    /// Room membership in join order.
    rooms: HashMap<RoomId, Vec<EndpointId>>,
    names: HashMap<EndpointId, String>,
}

/// In-process relay implementing the routing side of the wire protocol,
/// so several real clients can negotiate against each other in one test.
/// Dumb fan-out only: membership events go to the room, negotiation
/// events go to their `targetSocketId`, payloads pass through untouched.
#[derive(Clone, Default)]
pub struct RelayHub {
    inner: Arc<Mutex<HubInner>>,
}

impl RelayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a relay-side connection with the given socket id and
    /// starts routing the client's outbound traffic.
    pub async fn register(&self, socket_id: &str) -> Arc<MockChannel> {
        let (channel, mut outbound_rx) = MockChannel::new(socket_id);
        let sender = EndpointId::from(socket_id);

        self.inner
            .lock()
            .await
            .channels
            .insert(sender.clone(), channel.clone());

        let hub = self.clone();
        tokio::spawn(async move {
            while let Some(event) = outbound_rx.recv().await {
                hub.route(&sender, event).await;
            }
        });

        channel
    }

    async fn route(&self, sender: &EndpointId, event: SignalEvent) {
        match event {
            SignalEvent::JoinRoom { room_id, user_id } => {
                let mut inner = self.inner.lock().await;
                let members = inner.rooms.entry(room_id.clone()).or_default().clone();

                let roster = members
                    .iter()
                    .map(|m| ExistingUser {
                        socket_id: m.clone(),
                        user_name: inner.names.get(m).cloned().unwrap_or_default(),
                    })
                    .collect();
                Self::deliver(&inner, sender, SignalEvent::ExistingUsers(roster)).await;

                for member in &members {
                    Self::deliver(
                        &inner,
                        member,
                        SignalEvent::UserJoined {
                            socket_id: sender.clone(),
                            user_id: user_id.clone(),
                        },
                    )
                    .await;
                }

                inner.names.insert(sender.clone(), user_id);
                let room = inner.rooms.entry(room_id).or_default();
                if !room.contains(sender) {
                    room.push(sender.clone());
                }
            }
            SignalEvent::LeaveRoom { room_id, user_id } => {
                let mut inner = self.inner.lock().await;
                let Some(members) = inner.rooms.get_mut(&room_id) else {
                    return;
                };
                members.retain(|m| m != sender);
                let members = members.clone();
                for member in &members {
                    Self::deliver(
                        &inner,
                        member,
                        SignalEvent::UserLeft {
                            socket_id: sender.clone(),
                            user_id: user_id.clone(),
                        },
                    )
                    .await;
                }
            }
            SignalEvent::Offer {
                ref target_socket_id,
                ..
            }
            | SignalEvent::Answer {
                ref target_socket_id,
                ..
            }
            | SignalEvent::IceCandidate {
                ref target_socket_id,
                ..
            } => {
                let target = target_socket_id.clone();
                let inner = self.inner.lock().await;
                Self::deliver(&inner, &target, event).await;
            }
            other => {
                tracing::warn!("[RelayHub] unroutable client event: {other:?}");
            }
        }
    }

    async fn deliver(inner: &HubInner, target: &EndpointId, event: SignalEvent) {
        let Some(channel) = inner.channels.get(target) else {
            return;
        };
        if channel.is_connected().await {
            channel.inject(event).await;
        }
    }
}
