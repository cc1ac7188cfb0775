#![allow(dead_code)]

use rvoip_call_session::{CallController, CallState};

/// Install a fmt subscriber writing through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub const OUTGOING_SETUP: [CallState; 4] = [
    CallState::OutgoingInit,
    CallState::OutgoingProgress,
    CallState::OutgoingRinging,
    CallState::Connected,
];

pub const INCOMING_SETUP: [CallState; 2] = [CallState::IncomingReceived, CallState::Connected];

/// Drive a controller through a list of states, panicking on rejection
pub fn drive<C>(controller: &CallController<C>, states: &[CallState]) {
    for state in states {
        controller
            .request_transition(*state)
            .unwrap_or_else(|e| panic!("transition to {} failed: {}", state, e));
    }
}
