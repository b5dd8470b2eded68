use crate::error::MediaError;
use crate::media::local_media::{LocalMedia, LocalTrack, TrackKind};
use crate::media::source::MediaSource;
use async_trait::async_trait;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Default [`MediaSource`]: one Opus audio track and one VP8 video track
/// backed by sample-fed local tracks. A capture pipeline writes encoded
/// samples into [`SampleMediaSource::audio`] / [`SampleMediaSource::video`]
/// while the matching track is enabled.
pub struct SampleMediaSource {
    audio: Arc<TrackLocalStaticSample>,
    video: Arc<TrackLocalStaticSample>,
}

impl SampleMediaSource {
    pub fn new(stream_id: impl Into<String>) -> Self {
        let stream_id = stream_id.into();
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48_000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            stream_id.clone(),
        ));
        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90_000,
                ..Default::default()
            },
            "video".to_owned(),
            stream_id,
        ));
        Self { audio, video }
    }

    /// The writable audio track, for the sample producer.
    pub fn audio(&self) -> Arc<TrackLocalStaticSample> {
        self.audio.clone()
    }

    /// The writable video track, for the sample producer.
    pub fn video(&self) -> Arc<TrackLocalStaticSample> {
        self.video.clone()
    }
}

#[async_trait]
impl MediaSource for SampleMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        Ok(LocalMedia::new(vec![
            Arc::new(LocalTrack::new(TrackKind::Audio, self.audio.clone())),
            Arc::new(LocalTrack::new(TrackKind::Video, self.video.clone())),
        ]))
    }
}
