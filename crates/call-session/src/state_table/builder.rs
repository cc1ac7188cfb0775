use std::collections::HashSet;

use super::types::{Scope, StateKey, StateTable};
use crate::types::CallState;

/// Incrementally assembles a [`StateTable`]
#[derive(Debug, Default)]
pub struct StateTableBuilder {
    table: StateTable,
}

impl StateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `from -> to` for the directions covered by `scope`
    pub fn add_transition(&mut self, scope: Scope, from: CallState, to: CallState) -> &mut Self {
        for direction in scope.directions() {
            self.table
                .transitions
                .entry(StateKey { direction: *direction, state: from })
                .or_insert_with(HashSet::new)
                .insert(to);
        }
        self
    }

    /// Allow every `from` in `sources` to move to `to`
    pub fn add_from_each(&mut self, scope: Scope, sources: &[CallState], to: CallState) -> &mut Self {
        for from in sources {
            self.add_transition(scope, *from, to);
        }
        self
    }

    /// Allow `from` to move to every state in `targets`
    pub fn add_to_each(&mut self, scope: Scope, from: CallState, targets: &[CallState]) -> &mut Self {
        for to in targets {
            self.add_transition(scope, from, *to);
        }
        self
    }

    pub fn build(self) -> StateTable {
        self.table
    }
}
