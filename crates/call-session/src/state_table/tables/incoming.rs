use crate::state_table::{Scope, StateTableBuilder};
use crate::types::CallState;

/// Add the callee-side setup transitions
pub fn add_incoming_transitions(builder: &mut StateTableBuilder) {
    // Idle -> IncomingReceived: INVITE arrived
    builder.add_transition(Scope::Incoming, CallState::Idle, CallState::IncomingReceived);

    // Early media before answering
    builder.add_transition(Scope::Incoming, CallState::IncomingReceived, CallState::IncomingEarlyMedia);

    // Accepted, or declined / cancelled by the caller
    for from in [CallState::IncomingReceived, CallState::IncomingEarlyMedia] {
        builder.add_to_each(Scope::Incoming, from, &[CallState::Connected, CallState::Ended]);
    }
}
