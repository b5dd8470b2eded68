use crate::session::candidate_queue::CandidateQueue;
use crate::session::session_command::SessionCommand;
use crate::session::session_event::{OutboundSignal, SessionEvent};
use crate::session::transport::{PeerTransport, TransportEvent};
use crate::session::transport_config::TransportConfig;
use anyhow::Result;
use huddle_core::EndpointId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::track::track_local::TrackLocal;

/// Negotiation lifecycle of one peer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    New,
    OfferSent,
    OfferReceived,
    AnswerSent,
    Connected,
    Closed,
}

/// Which side of the offer/answer exchange this session takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationRole {
    Initiator,
    Responder,
}

impl NegotiationRole {
    /// Deterministic glare tie-break: the endpoint whose identifier
    /// sorts lexicographically smaller initiates. Both sides of a pair
    /// evaluate the same rule, so they can never both send an offer.
    pub fn decide(local: &EndpointId, remote: &EndpointId) -> Self {
        if local < remote {
            Self::Initiator
        } else {
            Self::Responder
        }
    }
}

/// Coordinator-side handle to a running session actor.
pub struct SessionHandle {
    remote: EndpointId,
    role: NegotiationRole,
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn remote(&self) -> &EndpointId {
        &self.remote
    }

    pub fn role(&self) -> NegotiationRole {
        self.role
    }

    /// Queues a command into the session mailbox. Sending into a closed
    /// session is a deliberate no-op: late negotiation messages for a
    /// torn-down session must not do anything.
    pub async fn send(&self, cmd: SessionCommand) {
        if self.cmd_tx.send(cmd).await.is_err() {
            debug!("Dropping command for closed session {}", self.remote);
        }
    }

    pub async fn close(&self) {
        self.send(SessionCommand::Close).await;
    }
}

/// One peer session: owns the media transport toward a single remote
/// endpoint and runs the negotiation state machine over its mailbox.
pub struct PeerSession {
    remote: EndpointId,
    role: NegotiationRole,
    state: SessionState,
    candidates: CandidateQueue,
    transport: PeerTransport,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    event_tx: mpsc::Sender<SessionEvent>,
}

impl PeerSession {
    /// Builds the transport, attaches every local track, and spawns the
    /// session actor. Local tracks must already be available: a session
    /// is never constructed without them.
    pub async fn spawn(
        remote: EndpointId,
        role: NegotiationRole,
        config: TransportConfig,
        local_tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
        event_tx: mpsc::Sender<SessionEvent>,
    ) -> Result<SessionHandle> {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (transport_tx, transport_rx) = mpsc::channel(64);

        let transport = PeerTransport::new(remote.clone(), config, transport_tx).await?;
        for track in local_tracks {
            transport.add_local_track(track).await?;
        }

        let session = Self {
            remote: remote.clone(),
            role,
            state: SessionState::New,
            candidates: CandidateQueue::new(),
            transport,
            cmd_rx,
            transport_rx,
            event_tx,
        };
        tokio::spawn(session.run());

        Ok(SessionHandle {
            remote,
            role,
            cmd_tx,
        })
    }

    async fn run(mut self) {
        info!("Session started for {} as {:?}", self.remote, self.role);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Close) | None => break,
                        Some(cmd) => self.handle_command(cmd).await,
                    }
                }

                evt = self.transport_rx.recv() => {
                    match evt {
                        Some(TransportEvent::Disconnected) => {
                            self.emit(SessionEvent::TransportDisconnected(self.remote.clone()))
                                .await;
                            break;
                        }
                        Some(evt) => self.handle_transport_event(evt).await,
                        None => break,
                    }
                }
            }

            if self.state == SessionState::Closed {
                break;
            }
        }

        self.shutdown().await;
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::StartOffer => self.start_offer().await,
            SessionCommand::RemoteOffer { sdp } => self.apply_remote_offer(sdp).await,
            SessionCommand::RemoteAnswer { sdp } => self.apply_remote_answer(sdp).await,
            SessionCommand::RemoteCandidate { candidate } => {
                self.accept_remote_candidate(candidate).await
            }
            SessionCommand::Close => unreachable!("Close is handled by the event loop"),
        }
    }

    async fn start_offer(&mut self) {
        if self.role != NegotiationRole::Initiator || self.state != SessionState::New {
            warn!(
                "Ignoring StartOffer for {} ({:?}, {:?})",
                self.remote, self.role, self.state
            );
            return;
        }

        match self.transport.create_offer().await {
            Ok(sdp) => {
                self.set_state(SessionState::OfferSent).await;
                self.emit(SessionEvent::Outbound(
                    self.remote.clone(),
                    OutboundSignal::Offer(sdp),
                ))
                .await;
            }
            Err(e) => self.fail(format!("Failed to create offer: {e:#}")).await,
        }
    }

    async fn apply_remote_offer(&mut self, sdp: String) {
        if self.role != NegotiationRole::Responder {
            // A well-behaved peer running the same tie-break never offers
            // toward the initiating side.
            warn!("Ignoring remote offer at Initiator session {}", self.remote);
            return;
        }
        if self.state != SessionState::New {
            warn!(
                "Ignoring remote offer for {} in state {:?}",
                self.remote, self.state
            );
            return;
        }

        self.set_state(SessionState::OfferReceived).await;

        if let Err(e) = self.transport.apply_remote_offer(sdp).await {
            self.fail(format!("Failed to apply remote offer: {e:#}"))
                .await;
            return;
        }
        self.flush_candidates().await;

        match self.transport.create_answer().await {
            Ok(sdp) => {
                self.set_state(SessionState::AnswerSent).await;
                self.emit(SessionEvent::Outbound(
                    self.remote.clone(),
                    OutboundSignal::Answer(sdp),
                ))
                .await;
            }
            Err(e) => self.fail(format!("Failed to create answer: {e:#}")).await,
        }
    }

    async fn apply_remote_answer(&mut self, sdp: String) {
        if self.state != SessionState::OfferSent {
            warn!(
                "Ignoring remote answer for {} in state {:?}",
                self.remote, self.state
            );
            return;
        }

        if let Err(e) = self.transport.apply_remote_answer(sdp).await {
            self.fail(format!("Failed to apply remote answer: {e:#}"))
                .await;
            return;
        }
        self.flush_candidates().await;
        self.set_state(SessionState::Connected).await;
    }

    /// Candidates arriving before the remote description are buffered;
    /// afterwards they apply immediately. A bad candidate is logged and
    /// skipped, never fatal.
    async fn accept_remote_candidate(&mut self, candidate: String) {
        let Some(candidate) = self.candidates.accept(candidate) else {
            debug!(
                "Buffered early candidate for {} ({} pending)",
                self.remote,
                self.candidates.pending_len()
            );
            return;
        };
        if let Err(e) = self.transport.add_remote_candidate(&candidate).await {
            warn!("Skipping bad ICE candidate from {}: {e:#}", self.remote);
        }
    }

    async fn flush_candidates(&mut self) {
        let buffered = self.candidates.mark_ready();
        if buffered.is_empty() {
            return;
        }
        debug!(
            "Flushing {} buffered candidates for {}",
            buffered.len(),
            self.remote
        );
        for candidate in buffered {
            if let Err(e) = self.transport.add_remote_candidate(&candidate).await {
                warn!("Skipping bad ICE candidate from {}: {e:#}", self.remote);
            }
        }
    }

    async fn handle_transport_event(&mut self, evt: TransportEvent) {
        match evt {
            TransportEvent::LocalCandidate(candidate) => {
                self.emit(SessionEvent::Outbound(
                    self.remote.clone(),
                    OutboundSignal::Candidate(candidate),
                ))
                .await;
            }
            TransportEvent::RemoteTrack(track) => {
                if self.state == SessionState::AnswerSent {
                    self.set_state(SessionState::Connected).await;
                }
                self.emit(SessionEvent::RemoteTrack(self.remote.clone(), track))
                    .await;
            }
            TransportEvent::Disconnected => unreachable!("Disconnected is handled by the event loop"),
        }
    }

    /// Negotiation errors are isolated to this one session: log, close,
    /// let the coordinator forget us. A fresh `user-joined` can retry.
    async fn fail(&mut self, reason: String) {
        warn!("Session {} failed: {reason}", self.remote);
        self.set_state(SessionState::Closed).await;
    }

    async fn set_state(&mut self, state: SessionState) {
        if self.state == state || self.state == SessionState::Closed {
            return;
        }
        debug!("Session {}: {:?} -> {:?}", self.remote, self.state, state);
        self.state = state;
        self.emit(SessionEvent::StateChanged(self.remote.clone(), state))
            .await;
    }

    async fn shutdown(&mut self) {
        let _ = self.transport.close().await;
        self.set_state(SessionState::Closed).await;
        self.emit(SessionEvent::Closed(self.remote.clone())).await;
        info!("Session closed for {}", self.remote);
    }

    async fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event).await;
    }
}
