//! Bounded record of applied state transitions

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::Instant;

use crate::config::HistoryConfig;
use crate::types::CallState;

/// One applied transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRecord {
    /// Position in the session's transition sequence, starting at 1
    pub sequence: u64,
    pub from: CallState,
    pub to: CallState,
    pub at: Instant,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
    pub error_code: Option<u16>,
}

/// Ring buffer of the most recent transitions
#[derive(Debug, Clone)]
pub struct SessionHistory {
    max_transitions: usize,
    records: VecDeque<TransitionRecord>,
    pub total_transitions: u64,
}

impl SessionHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            max_transitions: config.max_transitions.max(1),
            records: VecDeque::with_capacity(config.max_transitions.min(64)),
            total_transitions: 0,
        }
    }

    /// Append a record, assigning its sequence number
    pub fn record_transition(&mut self, mut record: TransitionRecord) {
        self.total_transitions += 1;
        record.sequence = self.total_transitions;
        if self.records.len() == self.max_transitions {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Up to `count` most recent records, oldest first
    pub fn get_recent(&self, count: usize) -> Vec<TransitionRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).cloned().collect()
    }

    pub fn all(&self) -> Vec<TransitionRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
