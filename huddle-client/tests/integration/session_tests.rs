use crate::integration::{init_tracing, join_room};
use crate::utils::{
    RecordingEvents, RelayHub, SETTLE_MS, SIGNAL_TIMEOUT_MS, TestMediaSource, fake_candidate,
    make_offer_sdp,
};
use huddle_client::room::RoomClient;
use huddle_client::session::{SessionState, TransportConfig};
use huddle_core::{EndpointId, RoomId, SignalEvent};
use std::sync::Arc;
use std::time::Duration;

/// Full round trip through the relay: A joins first, B joins second, A
/// (smaller id) initiates, B answers, A applies the answer and reports
/// the session connected.
#[tokio::test]
async fn test_offer_answer_round_trip_connects() {
    init_tracing();

    let hub = RelayHub::new();
    let room = RoomId::from("abc-def-ghi");

    let channel_a = hub.register("A1").await;
    let channel_b = hub.register("B1").await;
    let recorder_a = RecordingEvents::new();
    let recorder_b = RecordingEvents::new();

    let client_a = RoomClient::spawn(
        channel_a,
        Arc::new(TestMediaSource),
        Arc::new(recorder_a.clone()),
        TransportConfig::host_only(),
    );
    let client_b = RoomClient::spawn(
        channel_b,
        Arc::new(TestMediaSource),
        Arc::new(recorder_b.clone()),
        TransportConfig::host_only(),
    );

    client_a.join(room.clone(), "alice").await.expect("A join");
    tokio::time::sleep(Duration::from_millis(100)).await;
    client_b.join(room.clone(), "bob").await.expect("B join");

    let a1 = EndpointId::from("A1");
    let b1 = EndpointId::from("B1");

    assert!(
        recorder_a
            .wait_for_state(&b1, SessionState::OfferSent, SIGNAL_TIMEOUT_MS)
            .await,
        "A never offered toward B"
    );
    assert!(
        recorder_b
            .wait_for_state(&a1, SessionState::AnswerSent, SIGNAL_TIMEOUT_MS)
            .await,
        "B never answered A"
    );
    assert!(
        recorder_a
            .wait_for_state(&b1, SessionState::Connected, SIGNAL_TIMEOUT_MS)
            .await,
        "A never applied B's answer"
    );

    // Each side saw exactly the other participant.
    assert_eq!(recorder_a.joined_count().await, 1);
    assert_eq!(recorder_b.joined_count().await, 1);

    client_a.leave().await.expect("A leave");
    client_b.leave().await.expect("B leave");
}

/// Candidates outrunning the offer are buffered, and the session still
/// negotiates once the remote description lands. Bad candidates are
/// skipped, not fatal.
#[tokio::test]
async fn test_candidates_buffered_before_remote_description() {
    init_tracing();

    let h = join_room("M5", "abc-def-ghi").await;
    let bob = EndpointId::from("B1");

    h.channel
        .inject(SignalEvent::UserJoined {
            socket_id: bob.clone(),
            user_id: "bob".to_owned(),
        })
        .await;

    for i in 0..3 {
        h.channel
            .inject(SignalEvent::IceCandidate {
                target_socket_id: EndpointId::from("M5"),
                sender_socket_id: bob.clone(),
                candidate: fake_candidate(i),
            })
            .await;
    }
    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;

    let sdp = make_offer_sdp().await.expect("offer helper");
    h.channel
        .inject(SignalEvent::Offer {
            target_socket_id: EndpointId::from("M5"),
            sender_socket_id: bob.clone(),
            offer: sdp,
            room_name: RoomId::from("abc-def-ghi"),
        })
        .await;

    assert!(
        h.recorder
            .wait_for_state(&bob, SessionState::AnswerSent, SIGNAL_TIMEOUT_MS)
            .await,
        "buffered candidates broke negotiation"
    );
    assert_eq!(h.channel.answers_to(&bob).await.len(), 1);
    assert_eq!(h.recorder.closed_count(&bob).await, 0);
}

#[tokio::test]
async fn test_answer_from_unknown_endpoint_is_rejected() {
    init_tracing();

    let h = join_room("A1", "abc-def-ghi").await;
    let stranger = EndpointId::from("Z9");

    h.channel
        .inject(SignalEvent::Answer {
            target_socket_id: EndpointId::from("A1"),
            sender_socket_id: stranger.clone(),
            answer: "not an sdp".to_owned(),
            room_name: RoomId::from("abc-def-ghi"),
        })
        .await;
    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;

    // No session materialized and nothing was sent back.
    assert!(h.recorder.state_history(&stranger).await.is_empty());
    assert_eq!(h.channel.sent().await.len(), 1, "only join-room expected");

    // The coordinator is unharmed: a real peer still gets an offer.
    let bob = EndpointId::from("B1");
    h.channel
        .inject(SignalEvent::UserJoined {
            socket_id: bob.clone(),
            user_id: "bob".to_owned(),
        })
        .await;
    assert!(
        h.recorder
            .wait_for_state(&bob, SessionState::OfferSent, SIGNAL_TIMEOUT_MS)
            .await
    );
}
