use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use webrtc::track::track_local::TrackLocal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// One local capture track plus its mute flag.
///
/// The transport-level track has no native enable switch, so `enabled`
/// is a contract with the sample producer: a disabled track stays
/// attached to every session but receives no samples.
pub struct LocalTrack {
    kind: TrackKind,
    track: Arc<dyn TrackLocal + Send + Sync>,
    enabled: AtomicBool,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, track: Arc<dyn TrackLocal + Send + Sync>) -> Self {
        Self {
            kind,
            track,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn track(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        self.track.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

/// The local capture stream, acquired once per room and shared read-only
/// (as track references) by every peer session in that room.
pub struct LocalMedia {
    tracks: Vec<Arc<LocalTrack>>,
    stopped: AtomicBool,
}

impl LocalMedia {
    pub fn new(tracks: Vec<Arc<LocalTrack>>) -> Self {
        Self {
            tracks,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn tracks(&self) -> &[Arc<LocalTrack>] {
        &self.tracks
    }

    /// Track references in the form the media transport attaches.
    pub fn transport_tracks(&self) -> Vec<Arc<dyn TrackLocal + Send + Sync>> {
        self.tracks.iter().map(|t| t.track()).collect()
    }

    pub fn set_enabled(&self, kind: TrackKind, enabled: bool) {
        for track in self.tracks.iter().filter(|t| t.kind() == kind) {
            track.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, kind: TrackKind) -> bool {
        self.tracks
            .iter()
            .filter(|t| t.kind() == kind)
            .all(|t| t.is_enabled())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Releases the capture devices. Only the coordinator calls this, on
    /// full room exit. Returns `false` when the media was already
    /// stopped, so release happens exactly once.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        for track in &self.tracks {
            track.set_enabled(false);
        }
        info!("Local media stopped");
        true
    }
}
