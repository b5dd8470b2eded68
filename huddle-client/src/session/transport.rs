use crate::session::transport_config::TransportConfig;
use anyhow::{Context, Result};
use huddle_core::EndpointId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Raw events from the underlying media transport, consumed by the
/// owning peer session.
pub enum TransportEvent {
    LocalCandidate(String),
    RemoteTrack(Arc<TrackRemote>),
    Disconnected,
}

/// Thin wrapper around one `RTCPeerConnection`, one per remote endpoint.
pub struct PeerTransport {
    remote: EndpointId,
    peer_connection: Arc<RTCPeerConnection>,
}

impl PeerTransport {
    /// Builds the peer connection and wires its callbacks into
    /// `event_tx`, the channel drained by the session's event loop.
    pub async fn new(
        remote: EndpointId,
        config: TransportConfig,
        event_tx: mpsc::Sender<TransportEvent>,
    ) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;

        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = config
            .ice_servers
            .into_iter()
            .map(|s| RTCIceServer {
                urls: s.urls,
                username: s.username.unwrap_or_default(),
                credential: s.credential.unwrap_or_default(),
            })
            .collect();

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        // The callbacks each own a clone of the event sender; if the
        // session is gone the sends fail silently and nothing observes a
        // dead transport.
        let state_tx = event_tx.clone();
        let remote_state = remote.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let remote = remote_state.clone();

                Box::pin(async move {
                    info!("Transport state for {remote}: {s:?}");
                    match s {
                        RTCPeerConnectionState::Failed
                        | RTCPeerConnectionState::Disconnected
                        | RTCPeerConnectionState::Closed => {
                            let _ = tx.send(TransportEvent::Disconnected).await;
                        }
                        _ => {}
                    }
                })
            },
        ));

        // Trickle ICE: forward local candidates toward the remote side.
        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(json_candidate) = candidate.to_json() else {
                    return;
                };
                let Ok(str_candidate) = serde_json::to_string(&json_candidate) else {
                    return;
                };
                let _ = tx.send(TransportEvent::LocalCandidate(str_candidate)).await;
            })
        }));

        let track_tx = event_tx.clone();
        let remote_track = remote.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let remote = remote_track.clone();

                Box::pin(async move {
                    info!(
                        "Remote {} track from {remote} (ssrc {})",
                        track.kind(),
                        track.ssrc()
                    );
                    let _ = tx.send(TransportEvent::RemoteTrack(track)).await;
                })
            },
        ));

        Ok(Self {
            remote,
            peer_connection,
        })
    }

    /// Attaches a shared local track. Must happen before negotiation
    /// begins; a transport negotiated without local tracks cannot be
    /// amended afterwards.
    pub async fn add_local_track(&self, track: Arc<dyn TrackLocal + Send + Sync>) -> Result<()> {
        self.peer_connection
            .add_track(track)
            .await
            .context("Failed to attach local track")?;
        Ok(())
    }

    /// Create a local SDP offer and install it as the local description.
    pub async fn create_offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    /// Apply a remote SDP offer (Responder role).
    pub async fn apply_remote_offer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    /// Create a local SDP answer and install it as the local description.
    pub async fn create_answer(&self) -> Result<String> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    /// Apply a remote SDP answer (Initiator role).
    pub async fn apply_remote_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    /// Apply a remote ICE candidate (trickle ICE).
    pub async fn add_remote_candidate(&self, candidate_json: &str) -> Result<()> {
        let candidate: RTCIceCandidateInit =
            serde_json::from_str(candidate_json).context("Failed to parse ICE candidate JSON")?;
        self.peer_connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }

    pub fn remote(&self) -> &EndpointId {
        &self.remote
    }
}
