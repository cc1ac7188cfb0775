use crate::state_table::{Scope, StateTableBuilder};
use crate::types::CallState;

/// Add the in-call and teardown transitions shared by both directions
pub fn add_common_transitions(builder: &mut StateTableBuilder) {
    // Media confirmed
    builder.add_transition(Scope::Both, CallState::Connected, CallState::StreamsRunning);

    // Local hold, with or without the intermediate Pausing step
    builder.add_to_each(
        Scope::Both,
        CallState::StreamsRunning,
        &[CallState::Pausing, CallState::Paused],
    );
    builder.add_transition(Scope::Both, CallState::Pausing, CallState::Paused);

    // Local resume
    builder.add_to_each(
        Scope::Both,
        CallState::Paused,
        &[CallState::Resuming, CallState::StreamsRunning, CallState::Connected],
    );
    builder.add_to_each(
        Scope::Both,
        CallState::Resuming,
        &[CallState::StreamsRunning, CallState::Connected],
    );

    // Remote hold and resume
    builder.add_transition(Scope::Both, CallState::StreamsRunning, CallState::PausedByRemote);
    builder.add_to_each(
        Scope::Both,
        CallState::PausedByRemote,
        &[CallState::StreamsRunning, CallState::Connected],
    );

    // Remote re-INVITE
    builder.add_transition(Scope::Both, CallState::StreamsRunning, CallState::UpdatedByRemote);
    builder.add_to_each(
        Scope::Both,
        CallState::UpdatedByRemote,
        &[CallState::StreamsRunning, CallState::PausedByRemote],
    );

    // Hang-up from any in-call state
    let in_call: Vec<CallState> = CallState::ALL.iter().copied().filter(CallState::is_in_call).collect();
    builder.add_from_each(Scope::Both, &in_call, CallState::Ended);

    builder.add_transition(Scope::Both, CallState::Ended, CallState::Released);

    // Error absorbs every non-terminal state
    let live: Vec<CallState> = CallState::ALL.iter().copied().filter(|s| !s.is_terminal()).collect();
    builder.add_from_each(Scope::Both, &live, CallState::Error);
}
