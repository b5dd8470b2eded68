use crate::error::MediaError;
use crate::media::local_media::LocalMedia;
use async_trait::async_trait;

/// The device-capability boundary: acquires the local capture stream.
///
/// Called exactly once per room join, before the join notification is
/// sent. A failure here is fatal to the join; the orchestrator never
/// enters a room without local media.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalMedia, MediaError>;
}
