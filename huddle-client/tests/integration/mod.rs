pub mod session_tests;
pub mod teardown_tests;

use std::sync::Arc;
use tracing::Level;

use huddle_client::room::RoomClient;
use huddle_client::session::TransportConfig;
use huddle_core::RoomId;

use crate::utils::{MockChannel, RecordingEvents, TestMediaSource};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestClientHarness {
    pub channel: Arc<MockChannel>,
    pub recorder: RecordingEvents,
    pub client: RoomClient,
}

/// Spawns a client on a mock channel with the given relay-assigned
/// socket id and joins it into `room`.
pub async fn join_room(socket_id: &str, room: &str) -> TestClientHarness {
    let (channel, _outbound) = MockChannel::new(socket_id);
    let recorder = RecordingEvents::new();
    let client = RoomClient::spawn(
        channel.clone(),
        Arc::new(TestMediaSource),
        Arc::new(recorder.clone()),
        TransportConfig::host_only(),
    );
    client
        .join(RoomId::from(room), "tester")
        .await
        .expect("join failed");

    TestClientHarness {
        channel,
        recorder,
        client,
    }
}
