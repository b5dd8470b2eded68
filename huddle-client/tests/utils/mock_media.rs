use async_trait::async_trait;
use huddle_client::error::MediaError;
use huddle_client::media::{LocalMedia, LocalTrack, MediaSource, TrackKind};
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Media source backed by sample-fed tracks; no capture devices needed.
pub struct TestMediaSource;

#[async_trait]
impl MediaSource for TestMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        let audio = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48_000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            "test-stream".to_owned(),
        ));
        let video = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90_000,
                ..Default::default()
            },
            "video".to_owned(),
            "test-stream".to_owned(),
        ));
        Ok(LocalMedia::new(vec![
            Arc::new(LocalTrack::new(TrackKind::Audio, audio)),
            Arc::new(LocalTrack::new(TrackKind::Video, video)),
        ]))
    }
}

/// Simulates denied or missing capture devices.
pub struct FailingMediaSource;

#[async_trait]
impl MediaSource for FailingMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        Err(MediaError::DeviceUnavailable(
            "no capture device in tests".to_owned(),
        ))
    }
}
