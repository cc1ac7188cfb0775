use crate::state_table::{Scope, StateTableBuilder};
use crate::types::CallState;

/// Add the caller-side setup transitions
pub fn add_outgoing_transitions(builder: &mut StateTableBuilder) {
    // Idle -> OutgoingInit: INVITE about to go out
    builder.add_transition(Scope::Outgoing, CallState::Idle, CallState::OutgoingInit);

    // OutgoingInit -> OutgoingProgress: first provisional response
    builder.add_transition(Scope::Outgoing, CallState::OutgoingInit, CallState::OutgoingProgress);

    // Progress -> Ringing / EarlyMedia
    builder.add_to_each(
        Scope::Outgoing,
        CallState::OutgoingProgress,
        &[CallState::OutgoingRinging, CallState::OutgoingEarlyMedia],
    );
    builder.add_transition(Scope::Outgoing, CallState::OutgoingRinging, CallState::OutgoingEarlyMedia);

    // Answered (200 OK)
    builder.add_from_each(
        Scope::Outgoing,
        &[
            CallState::OutgoingProgress,
            CallState::OutgoingRinging,
            CallState::OutgoingEarlyMedia,
        ],
        CallState::Connected,
    );

    // Cancelled locally or declined by the callee
    builder.add_from_each(
        Scope::Outgoing,
        &[
            CallState::OutgoingInit,
            CallState::OutgoingProgress,
            CallState::OutgoingRinging,
            CallState::OutgoingEarlyMedia,
        ],
        CallState::Ended,
    );
}
