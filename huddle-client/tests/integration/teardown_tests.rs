use crate::integration::{init_tracing, join_room};
use crate::utils::{SETTLE_MS, SIGNAL_TIMEOUT_MS};
use huddle_client::error::ClientError;
use huddle_client::session::SessionState;
use huddle_core::{EndpointId, RoomId, SignalEvent};
use std::time::Duration;

#[tokio::test]
async fn test_leave_closes_every_session_once() {
    init_tracing();

    let h = join_room("A1", "abc-def-ghi").await;
    let bob = EndpointId::from("B1");
    let carol = EndpointId::from("C2");

    for (endpoint, name) in [(&bob, "bob"), (&carol, "carol")] {
        h.channel
            .inject(SignalEvent::UserJoined {
                socket_id: endpoint.clone(),
                user_id: name.to_owned(),
            })
            .await;
    }
    for endpoint in [&bob, &carol] {
        assert!(
            h.recorder
                .wait_for_state(endpoint, SessionState::OfferSent, SIGNAL_TIMEOUT_MS)
                .await
        );
    }

    h.client.leave().await.expect("leave failed");

    for endpoint in [&bob, &carol] {
        assert!(
            h.recorder
                .wait_for_state(endpoint, SessionState::Closed, SIGNAL_TIMEOUT_MS)
                .await,
            "session {endpoint} not closed on leave"
        );
    }
    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;

    assert_eq!(h.recorder.closed_count(&bob).await, 1);
    assert_eq!(h.recorder.closed_count(&carol).await, 1);
    assert_eq!(h.channel.leave_count().await, 1);

    // The room is gone; a second leave has nothing to do.
    let err = h.client.leave().await.expect_err("second leave must fail");
    assert!(matches!(err, ClientError::NotJoined));
}

/// Participant leaves after our offer went out but before any answer
/// came back; the late answer must be swallowed without side effects.
#[tokio::test]
async fn test_late_answer_after_peer_left_is_noop() {
    init_tracing();

    let h = join_room("A1", "abc-def-ghi").await;
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

    h.channel
        .inject(SignalEvent::UserLeft {
            socket_id: bob.clone(),
            user_id: "bob".to_owned(),
        })
        .await;
    assert!(
        h.recorder
            .wait_for_state(&bob, SessionState::Closed, SIGNAL_TIMEOUT_MS)
            .await
    );

    h.channel
        .inject(SignalEvent::Answer {
            target_socket_id: EndpointId::from("A1"),
            sender_socket_id: bob.clone(),
            answer: "stale answer".to_owned(),
            room_name: RoomId::from("abc-def-ghi"),
        })
        .await;
    tokio::time::sleep(Duration::from_millis(SETTLE_MS)).await;

    assert_eq!(h.recorder.closed_count(&bob).await, 1);
    assert_eq!(h.recorder.left().await, vec![bob]);

    // Still serviceable after the stale answer.
    h.client
        .set_audio_enabled(false)
        .await
        .expect("coordinator died on stale answer");
}

#[tokio::test]
async fn test_channel_disconnect_closes_all_sessions() {
    init_tracing();

    let h = join_room("A1", "abc-def-ghi").await;
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

    h.channel.inject_disconnect().await;

    assert!(
        h.recorder.wait_for_disconnect(SIGNAL_TIMEOUT_MS).await,
        "disconnect never surfaced"
    );
    assert!(
        h.recorder
            .wait_for_state(&bob, SessionState::Closed, SIGNAL_TIMEOUT_MS)
            .await,
        "session survived channel loss"
    );
    assert_eq!(h.recorder.closed_count(&bob).await, 1);
}
