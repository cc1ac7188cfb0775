use std::collections::{HashMap, HashSet};

use crate::types::{CallDirection, CallState};

/// Which call directions a table row applies to
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Scope {
    Incoming,
    Outgoing,
    Both,
}

impl Scope {
    pub fn directions(&self) -> &'static [CallDirection] {
        match self {
            Scope::Incoming => &[CallDirection::Incoming],
            Scope::Outgoing => &[CallDirection::Outgoing],
            Scope::Both => &[CallDirection::Incoming, CallDirection::Outgoing],
        }
    }
}

/// Key for looking up transitions in the state table
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct StateKey {
    pub direction: CallDirection,
    pub state: CallState,
}

/// Structural problems found by [`StateTable::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A terminal state has outgoing rows
    TerminalHasExit { direction: CallDirection, state: CallState },
    /// A non-terminal state cannot reach `Error`
    MissingErrorExit { direction: CallDirection, state: CallState },
    /// `Idle` has no way forward
    NoEntryFromIdle { direction: CallDirection },
}

/// Direction-scoped table of allowed `from -> to` moves
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    pub(crate) transitions: HashMap<StateKey, HashSet<CallState>>,
}

impl StateTable {
    /// Whether `to` may follow `from` for a call placed in `direction`
    pub fn is_allowed(&self, direction: CallDirection, from: CallState, to: CallState) -> bool {
        self.transitions
            .get(&StateKey { direction, state: from })
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    /// All states reachable in one step, in declaration order
    pub fn targets(&self, direction: CallDirection, from: CallState) -> Vec<CallState> {
        match self.transitions.get(&StateKey { direction, state: from }) {
            Some(targets) => CallState::ALL
                .iter()
                .copied()
                .filter(|s| targets.contains(s))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of (direction, from, to) rows
    pub fn len(&self) -> usize {
        self.transitions.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Check the structural invariants of the table.
    ///
    /// Terminal states have no exits, every other state (including `Ended`
    /// and `Idle`) can fall into `Error`, and `Idle` leads somewhere.
    pub fn validate(&self) -> Result<(), Vec<TableError>> {
        let mut errors = Vec::new();

        for direction in [CallDirection::Incoming, CallDirection::Outgoing] {
            for state in CallState::ALL {
                let targets = self.targets(direction, state);
                if state.is_terminal() {
                    if !targets.is_empty() {
                        errors.push(TableError::TerminalHasExit { direction, state });
                    }
                } else if !targets.contains(&CallState::Error) {
                    errors.push(TableError::MissingErrorExit { direction, state });
                }
            }

            let from_idle = self.targets(direction, CallState::Idle);
            if from_idle.iter().all(|s| *s == CallState::Error) {
                errors.push(TableError::NoEntryFromIdle { direction });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
