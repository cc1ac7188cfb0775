mod common;

use pretty_assertions::assert_eq;
use rvoip_call_session::{
    CallDirection, CallSession, CallSessionConfig, CallState, CallSummary, HistoryConfig,
    RemoteEndpointInfo, SignalingEvent, TransitionRequest,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{drive, init_tracing, INCOMING_SETUP, OUTGOING_SETUP};

#[test]
fn test_duration_zero_until_connected() {
    let (session, controller) = CallSession::outgoing("sip:bob@example.com");
    drive(&controller, &[CallState::OutgoingInit, CallState::OutgoingProgress]);
    thread::sleep(Duration::from_millis(10));

    assert_eq!(session.duration().unwrap(), Duration::ZERO);
    assert_eq!(session.started_at().unwrap(), None);

    drive(&controller, &[CallState::Ended]);
    assert_eq!(session.duration().unwrap(), Duration::ZERO);
}

#[test]
fn test_duration_grows_then_freezes() {
    init_tracing();
    let (session, controller) = CallSession::outgoing("sip:bob@example.com");
    drive(&controller, &OUTGOING_SETUP);
    assert!(session.started_at().unwrap().is_some());

    let first = session.duration().unwrap();
    thread::sleep(Duration::from_millis(20));
    let second = session.duration().unwrap();
    assert!(second >= first);
    assert!(second >= Duration::from_millis(20));

    // Hold keeps the clock running
    drive(&controller, &[CallState::StreamsRunning, CallState::Paused]);
    assert!(session.duration().unwrap() >= second);

    drive(&controller, &[CallState::Ended]);
    let frozen = session.duration().unwrap();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(session.duration().unwrap(), frozen);
    assert_eq!(session.summary().unwrap().duration_ms, frozen.as_millis() as u64);
}

#[test]
fn test_duration_frozen_on_error() {
    let (session, controller) = CallSession::incoming("sip:alice@example.com");
    drive(&controller, &INCOMING_SETUP);
    thread::sleep(Duration::from_millis(5));
    controller
        .request_transition(TransitionRequest::to(CallState::Error).with_reason("media timeout"))
        .unwrap();

    let frozen = session.duration().unwrap();
    assert!(frozen >= Duration::from_millis(5));
    thread::sleep(Duration::from_millis(10));
    assert_eq!(session.duration().unwrap(), frozen);
}

#[test]
fn test_resume_to_connected_keeps_start_stamp() {
    let (session, controller) = CallSession::outgoing("sip:bob@example.com");
    drive(&controller, &OUTGOING_SETUP);
    let started_at = session.started_at().unwrap().expect("stamped on connect");

    thread::sleep(Duration::from_millis(15));
    drive(&controller, &[CallState::StreamsRunning, CallState::Paused]);
    let before_resume = session.duration().unwrap();
    assert!(before_resume >= Duration::from_millis(15));

    drive(&controller, &[CallState::Connected]);
    assert_eq!(session.started_at().unwrap(), Some(started_at));
    let after_resume = session.duration().unwrap();
    assert!(after_resume >= before_resume, "{:?} < {:?}", after_resume, before_resume);

    let summary = session.summary().unwrap();
    assert_eq!(summary.started_at, Some(started_at));
    assert!(summary.duration_ms >= 15);
}

#[test]
fn test_echo_toggles() {
    let config = CallSessionConfig::default()
        .with_echo_cancellation(false)
        .with_echo_limiter(true);
    let (session, _controller) =
        CallSession::<()>::create(CallDirection::Outgoing, "sip:bob@example.com", &config).unwrap();

    assert!(!session.is_echo_cancellation_enabled().unwrap());
    assert!(session.is_echo_limiter_enabled().unwrap());

    session.enable_echo_cancellation(true).unwrap();
    session.enable_echo_limiter(false).unwrap();

    // Toggles are visible through every handle
    let other = session.clone();
    assert!(other.is_echo_cancellation_enabled().unwrap());
    assert!(!other.is_echo_limiter_enabled().unwrap());
}

#[test]
fn test_remote_endpoint_reporting() {
    let (session, controller) = CallSession::incoming("sip:alice@example.com");
    assert_eq!(session.remote_user_agent().unwrap(), None);
    assert_eq!(session.remote_contact().unwrap(), None);
    assert!(!session.is_in_conference().unwrap());
    assert_eq!(session.play_volume().unwrap(), None);

    controller
        .apply_signaling_event(SignalingEvent::RemoteEndpoint(
            RemoteEndpointInfo::new()
                .with_user_agent("Linphone/5.2")
                .with_contact("sip:alice@10.0.0.7:5060")
                .with_conference(true)
                .with_play_volume(-12.5),
        ))
        .unwrap();

    assert_eq!(session.remote_user_agent().unwrap().as_deref(), Some("Linphone/5.2"));
    assert_eq!(
        session.remote_contact().unwrap().as_deref(),
        Some("sip:alice@10.0.0.7:5060")
    );
    assert!(session.is_in_conference().unwrap());
    assert_eq!(session.play_volume().unwrap(), Some(-12.5));
}

#[derive(Debug, PartialEq)]
struct UiCallCard {
    display_name: String,
}

#[test]
fn test_application_context() {
    let (session, controller) = CallSession::<UiCallCard>::create(
        CallDirection::Incoming,
        "sip:alice@example.com",
        &CallSessionConfig::default(),
    )
    .unwrap();
    assert!(session.application_context().unwrap().is_none());

    let card = Arc::new(UiCallCard {
        display_name: "Alice".to_string(),
    });
    assert!(session.set_application_context(card.clone()).unwrap().is_none());

    let seen = controller.session().application_context().unwrap().unwrap();
    assert_eq!(seen.display_name, "Alice");

    let replaced = session
        .set_application_context(Arc::new(UiCallCard {
            display_name: "Alice (work)".to_string(),
        }))
        .unwrap();
    assert_eq!(replaced, Some(card));

    assert!(session.take_application_context().unwrap().is_some());
    assert!(session.application_context().unwrap().is_none());
}

#[test]
fn test_release_drops_application_context() {
    let (session, controller) = CallSession::<String>::create(
        CallDirection::Outgoing,
        "sip:bob@example.com",
        &CallSessionConfig::default(),
    )
    .unwrap();
    let context = Arc::new("row 7".to_string());
    session.set_application_context(context.clone()).unwrap();
    assert_eq!(Arc::strong_count(&context), 2);

    drive(&controller, &[CallState::OutgoingInit, CallState::Ended, CallState::Released]);
    assert_eq!(Arc::strong_count(&context), 1);
    assert!(session.application_context().unwrap_err().is_usage_error());
}

#[test]
fn test_context_set_racing_release_never_survives() {
    for _ in 0..200 {
        let (session, controller) = CallSession::<String>::create(
            CallDirection::Outgoing,
            "sip:bob@example.com",
            &CallSessionConfig::default(),
        )
        .unwrap();
        drive(&controller, &[CallState::OutgoingInit, CallState::Ended]);

        let context = Arc::new("late row".to_string());
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let writer = {
            let session = session.clone();
            let context = context.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                let _ = session.set_application_context(context);
            })
        };

        barrier.wait();
        controller.request_transition(CallState::Released).unwrap();
        writer.join().expect("writer thread panicked");

        // Either the write lost the race or release dropped it
        assert_eq!(Arc::strong_count(&context), 1);
    }
}

#[test]
fn test_summary_serializes() {
    let (session, controller) = CallSession::outgoing("sip:bob@example.com");
    drive(&controller, &OUTGOING_SETUP);
    controller.ingest_quality(4.0f32).unwrap();
    controller
        .request_transition(TransitionRequest::to(CallState::Ended).with_reason("Normal clearing"))
        .unwrap();

    let summary = session.summary().unwrap();
    assert_eq!(summary.session_id, *session.id());
    assert_eq!(summary.direction, CallDirection::Outgoing);
    assert_eq!(summary.peer.as_str(), "sip:bob@example.com");
    assert_eq!(summary.state, CallState::Ended);
    assert!(summary.started_at.is_some());
    assert!(!summary.authentication_verified);

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"peer\":\"sip:bob@example.com\""));
    assert!(json.contains("Normal clearing"));

    let parsed: CallSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summary);
}

#[test]
fn test_history_disabled_and_bounded() {
    let config = CallSessionConfig::default().without_history();
    let (session, controller) =
        CallSession::<()>::create(CallDirection::Outgoing, "sip:bob@example.com", &config).unwrap();
    drive(&controller, &OUTGOING_SETUP);
    assert!(session.history().unwrap().is_empty());

    let config = CallSessionConfig::default().with_history(HistoryConfig {
        enabled: true,
        max_transitions: 2,
    });
    let (session, controller) =
        CallSession::<()>::create(CallDirection::Outgoing, "sip:bob@example.com", &config).unwrap();
    drive(&controller, &OUTGOING_SETUP);
    let history = session.history().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].to, CallState::Connected);
    assert_eq!(history[1].sequence, 4);
}

#[test]
fn test_invalid_config_rejected() {
    let config = CallSessionConfig::default().with_history(HistoryConfig {
        enabled: true,
        max_transitions: 0,
    });
    let err = CallSession::<()>::create(CallDirection::Outgoing, "sip:bob@example.com", &config)
        .unwrap_err();
    assert!(matches!(err, rvoip_call_session::CallSessionError::Config(_)));
}

#[test]
fn test_concurrent_readers_during_call() {
    let (session, controller) = CallSession::outgoing("sip:bob@example.com");
    drive(&controller, &OUTGOING_SETUP);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let session = session.clone();
            thread::spawn(move || {
                let mut last = Duration::ZERO;
                for _ in 0..500 {
                    let state = session.state().unwrap();
                    assert!(state.is_in_call() || state == CallState::Ended);
                    let duration = session.duration().unwrap();
                    assert!(duration >= last);
                    last = duration;
                }
            })
        })
        .collect();

    for _ in 0..200 {
        drive(&controller, &[CallState::StreamsRunning, CallState::Paused, CallState::Resuming]);
        drive(&controller, &[CallState::Connected]);
    }
    drive(&controller, &[CallState::Ended]);

    for reader in readers {
        reader.join().expect("reader thread panicked");
    }
}

#[tokio::test]
async fn test_session_shared_across_tasks() {
    init_tracing();
    let (session, controller) = CallSession::incoming("sip:alice@example.com");
    let controller = Arc::new(controller);

    let signaling = {
        let controller = controller.clone();
        tokio::spawn(async move {
            for state in [CallState::IncomingReceived, CallState::Connected, CallState::StreamsRunning] {
                controller.request_transition(state).unwrap();
                tokio::task::yield_now().await;
            }
        })
    };
    let media = {
        let controller = controller.clone();
        tokio::spawn(async move {
            for sample in [3.0f32, 4.0, 5.0] {
                controller.ingest_quality(sample).unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    signaling.await.unwrap();
    media.await.unwrap();

    assert_eq!(session.state().unwrap(), CallState::StreamsRunning);
    assert_eq!(session.quality_snapshot().unwrap().sample_count, 3);
    assert!((session.average_quality().unwrap() - 4.0).abs() < 1e-4);
}
