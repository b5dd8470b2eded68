use crate::error::ClientError;
use crate::media::{LocalMedia, MediaSource, TrackKind};
use crate::room::room_command::RoomCommand;
use crate::room::room_events::RoomEvents;
use crate::session::{
    NegotiationRole, OutboundSignal, PeerSession, SessionCommand, SessionEvent, SessionHandle,
    TransportConfig,
};
use crate::signaling::{ChannelEvent, InboundSignal, ProtocolHandler, SignalingChannel};
use huddle_core::{EndpointId, ExistingUser, Participant, RoomId, SignalEvent};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

/// Handle to a spawned room coordinator. Cheap to clone; dropping every
/// clone shuts the coordinator down.
#[derive(Clone)]
pub struct RoomClient {
    cmd_tx: mpsc::Sender<RoomCommand>,
}

impl RoomClient {
    /// Spawns the coordinator actor. The signaling channel is owned by
    /// this coordinator alone; nothing else may connect or disconnect it.
    pub fn spawn(
        channel: Arc<dyn SignalingChannel>,
        media_source: Arc<dyn MediaSource>,
        events: Arc<dyn RoomEvents>,
        transport_config: TransportConfig,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let coordinator =
            RoomCoordinator::new(channel, media_source, events, transport_config, cmd_rx);
        tokio::spawn(coordinator.run());
        Self { cmd_tx }
    }

    /// Acquires local media, connects the signaling channel, and sends
    /// the join notification. Fails without joining when capture devices
    /// are unavailable.
    pub async fn join(&self, room: RoomId, display_name: &str) -> Result<(), ClientError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(RoomCommand::Join {
                room,
                display_name: display_name.to_owned(),
                reply,
            })
            .await
            .map_err(|_| ClientError::CoordinatorGone)?;
        rx.await.map_err(|_| ClientError::CoordinatorGone)?
    }

    /// Sends the leave notification, closes every peer session, releases
    /// the local media devices, and disconnects the channel.
    pub async fn leave(&self) -> Result<(), ClientError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(RoomCommand::Leave { reply })
            .await
            .map_err(|_| ClientError::CoordinatorGone)?;
        rx.await.map_err(|_| ClientError::CoordinatorGone)?
    }

    pub async fn set_audio_enabled(&self, enabled: bool) -> Result<(), ClientError> {
        self.set_track_enabled(TrackKind::Audio, enabled).await
    }

    pub async fn set_video_enabled(&self, enabled: bool) -> Result<(), ClientError> {
        self.set_track_enabled(TrackKind::Video, enabled).await
    }

    async fn set_track_enabled(&self, kind: TrackKind, enabled: bool) -> Result<(), ClientError> {
        self.cmd_tx
            .send(RoomCommand::SetTrackEnabled { kind, enabled })
            .await
            .map_err(|_| ClientError::CoordinatorGone)
    }
}

/// The per-client orchestrator: one logical thread of control draining
/// app commands, signaling events, and session events in order.
struct RoomCoordinator {
    channel: Arc<dyn SignalingChannel>,
    protocol: ProtocolHandler,
    media_source: Arc<dyn MediaSource>,
    events: Arc<dyn RoomEvents>,
    transport_config: TransportConfig,
    cmd_rx: mpsc::Receiver<RoomCommand>,
    channel_rx: Option<mpsc::Receiver<ChannelEvent>>,
    session_tx: mpsc::Sender<SessionEvent>,
    session_rx: mpsc::Receiver<SessionEvent>,
    sessions: HashMap<EndpointId, SessionHandle>,
    participants: HashMap<EndpointId, Participant>,
    local_media: Option<Arc<LocalMedia>>,
    display_name: String,
    /// Roster events that raced ahead of the relay's `welcome`; replayed
    /// once the local endpoint id is known.
    pending_signals: VecDeque<InboundSignal>,
}

impl RoomCoordinator {
    fn new(
        channel: Arc<dyn SignalingChannel>,
        media_source: Arc<dyn MediaSource>,
        events: Arc<dyn RoomEvents>,
        transport_config: TransportConfig,
        cmd_rx: mpsc::Receiver<RoomCommand>,
    ) -> Self {
        let (session_tx, session_rx) = mpsc::channel(256);
        Self {
            protocol: ProtocolHandler::new(channel.clone()),
            channel,
            media_source,
            events,
            transport_config,
            cmd_rx,
            channel_rx: None,
            session_tx,
            session_rx,
            sessions: HashMap::new(),
            participants: HashMap::new(),
            local_media: None,
            display_name: String::new(),
            pending_signals: VecDeque::new(),
        }
    }

    async fn run(mut self) {
        info!("Room coordinator started");

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd).await,
                        None => break,
                    }
                }

                evt = recv_or_pending(&mut self.channel_rx) => {
                    match evt {
                        Some(ChannelEvent::Signal(event)) => self.handle_signal(event).await,
                        Some(ChannelEvent::Disconnected) | None => {
                            self.handle_channel_lost().await;
                        }
                    }
                }

                evt = self.session_rx.recv() => {
                    if let Some(evt) = evt {
                        self.handle_session_event(evt).await;
                    }
                }
            }
        }

        // Handle dropped: leave whatever room we are still in.
        self.teardown(true).await;
        info!("Room coordinator finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                room,
                display_name,
                reply,
            } => {
                let _ = reply.send(self.join(room, display_name).await);
            }
            RoomCommand::Leave { reply } => {
                if self.protocol.room().is_none() {
                    let _ = reply.send(Err(ClientError::NotJoined));
                    return;
                }
                self.teardown(true).await;
                let _ = reply.send(Ok(()));
            }
            RoomCommand::SetTrackEnabled { kind, enabled } => {
                if let Some(media) = &self.local_media {
                    media.set_enabled(kind, enabled);
                }
            }
        }
    }

    async fn join(&mut self, room: RoomId, display_name: String) -> Result<(), ClientError> {
        if let Some(current) = self.protocol.room() {
            return Err(ClientError::AlreadyJoined(current.clone()));
        }

        // Media first: a room is never entered without local tracks, and
        // every session created later can assume they exist.
        let media = self.media_source.acquire().await?;
        self.local_media = Some(Arc::new(media));

        let channel_rx = match self.channel.connect().await {
            Ok(rx) => rx,
            Err(e) => {
                if let Some(media) = self.local_media.take() {
                    media.stop();
                }
                return Err(e.into());
            }
        };
        self.channel_rx = Some(channel_rx);

        info!("Joining room {room} as '{display_name}'");
        self.display_name = display_name;
        self.protocol.send_join(room, &self.display_name).await;
        Ok(())
    }

    async fn handle_signal(&mut self, event: SignalEvent) {
        let Some(signal) = self.protocol.decode(event) else {
            return;
        };

        match signal {
            InboundSignal::Welcome { endpoint } => {
                info!("Relay assigned endpoint id {endpoint}");
                self.protocol.set_local_endpoint(endpoint);
                let queued: Vec<_> = self.pending_signals.drain(..).collect();
                for signal in queued {
                    self.apply_signal(signal).await;
                }
            }
            signal if self.protocol.local_endpoint().is_none() => {
                // Roster traffic raced ahead of welcome; sessions cannot
                // be created before the glare rule has a local id.
                self.pending_signals.push_back(signal);
            }
            signal => self.apply_signal(signal).await,
        }
    }

    async fn apply_signal(&mut self, signal: InboundSignal) {
        match signal {
            InboundSignal::Welcome { .. } => {}
            InboundSignal::PeerJoined {
                endpoint,
                display_name,
            } => {
                self.on_participant_joined(endpoint, display_name).await;
            }
            InboundSignal::ExistingPeers(users) => {
                self.on_existing_participants(users).await;
            }
            InboundSignal::PeerLeft { endpoint } => {
                self.on_participant_left(endpoint).await;
            }
            InboundSignal::OfferReceived { from, sdp } => {
                self.ensure_session(from.clone()).await;
                if let Some(session) = self.sessions.get(&from) {
                    session.send(SessionCommand::RemoteOffer { sdp }).await;
                }
            }
            InboundSignal::AnswerReceived { from, sdp } => {
                // An answer can only complete a negotiation we started;
                // unknown senders (including peers that already left) are
                // dropped without side effects.
                let Some(session) = self.sessions.get(&from) else {
                    warn!("Dropping answer from unknown endpoint {from}");
                    return;
                };
                session.send(SessionCommand::RemoteAnswer { sdp }).await;
            }
            InboundSignal::CandidateReceived { from, candidate } => {
                let Some(session) = self.sessions.get(&from) else {
                    warn!("Dropping candidate from unknown endpoint {from}");
                    return;
                };
                session
                    .send(SessionCommand::RemoteCandidate { candidate })
                    .await;
            }
        }
    }

    async fn on_participant_joined(&mut self, endpoint: EndpointId, display_name: String) {
        if self.protocol.local_endpoint() == Some(&endpoint) {
            return;
        }
        if !self.participants.contains_key(&endpoint) {
            let participant = Participant::new(endpoint.clone(), display_name);
            self.events.on_participant_joined(&participant).await;
            self.participants.insert(endpoint.clone(), participant);
        }
        self.ensure_session(endpoint).await;
    }

    /// Catch-up path for a late joiner: connect to everyone already in
    /// the room. Same idempotent route as a live `user-joined`.
    async fn on_existing_participants(&mut self, users: Vec<ExistingUser>) {
        for user in users {
            self.on_participant_joined(user.socket_id, user.user_name)
                .await;
        }
    }

    async fn on_participant_left(&mut self, endpoint: EndpointId) {
        // Only the one session goes away; local media stays shared with
        // the remaining sessions.
        if let Some(session) = self.sessions.remove(&endpoint) {
            session.close().await;
        }
        if self.participants.remove(&endpoint).is_some() {
            info!("Participant {endpoint} left");
            self.events.on_participant_left(&endpoint).await;
        }
    }

    /// Single source of truth for the one-session-per-endpoint invariant.
    /// A second creation request for a tracked endpoint is ignored; a
    /// duplicate transport would silently orphan the first and leak its
    /// device and network resources.
    async fn ensure_session(&mut self, endpoint: EndpointId) {
        if self.sessions.contains_key(&endpoint) {
            return;
        }
        let Some(local) = self.protocol.local_endpoint() else {
            warn!("Cannot create session for {endpoint} before welcome");
            return;
        };
        let Some(media) = self.local_media.clone() else {
            warn!("Cannot create session for {endpoint} without local media");
            return;
        };

        let role = NegotiationRole::decide(local, &endpoint);
        info!("Creating session for {endpoint} as {role:?}");

        match PeerSession::spawn(
            endpoint.clone(),
            role,
            self.transport_config.clone(),
            media.transport_tracks(),
            self.session_tx.clone(),
        )
        .await
        {
            Ok(handle) => {
                if role == NegotiationRole::Initiator {
                    handle.send(SessionCommand::StartOffer).await;
                }
                self.sessions.insert(endpoint, handle);
            }
            Err(e) => error!("Failed to create session for {endpoint}: {e:#}"),
        }
    }

    async fn handle_session_event(&mut self, evt: SessionEvent) {
        match evt {
            SessionEvent::Outbound(endpoint, signal) => match signal {
                OutboundSignal::Offer(sdp) => self.protocol.send_offer(endpoint, sdp).await,
                OutboundSignal::Answer(sdp) => self.protocol.send_answer(endpoint, sdp).await,
                OutboundSignal::Candidate(candidate) => {
                    self.protocol.send_candidate(endpoint, candidate).await
                }
            },
            SessionEvent::StateChanged(endpoint, state) => {
                self.events.on_session_state(&endpoint, state).await;
            }
            SessionEvent::RemoteTrack(endpoint, track) => {
                self.events.on_remote_track(&endpoint, track).await;
            }
            SessionEvent::TransportDisconnected(endpoint) => {
                info!("Transport lost for {endpoint}");
                self.sessions.remove(&endpoint);
            }
            SessionEvent::Closed(endpoint) => {
                self.sessions.remove(&endpoint);
            }
        }
    }

    /// The signaling transport dropped underneath us: every session is
    /// stale. Close them all, release media, and tell the embedder.
    async fn handle_channel_lost(&mut self) {
        warn!("Signaling channel lost");
        self.channel_rx = None;
        self.teardown(false).await;
        self.events.on_channel_disconnected().await;
    }

    async fn teardown(&mut self, notify_relay: bool) {
        if self.protocol.room().is_none() && self.sessions.is_empty() {
            return;
        }
        if notify_relay {
            self.protocol.send_leave(&self.display_name).await;
        }

        for (_, session) in self.sessions.drain() {
            session.close().await;
        }
        self.participants.clear();
        self.pending_signals.clear();

        if let Some(media) = self.local_media.take() {
            media.stop();
        }

        self.channel.disconnect().await;
        self.channel_rx = None;
        self.protocol.reset();
        info!("Left room");
    }
}

/// There is no channel receiver between joins; pend instead of waking
/// the loop with a spurious `None`.
async fn recv_or_pending(rx: &mut Option<mpsc::Receiver<ChannelEvent>>) -> Option<ChannelEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
