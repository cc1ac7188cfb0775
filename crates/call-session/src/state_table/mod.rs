//! Transition table for the call state machine
//!
//! Allowed transitions are data, keyed by call direction. The table is built
//! once and shared by every session; [`CallController`](crate::CallController)
//! consults it before applying any state change.

pub mod builder;
pub mod tables;
pub mod types;

pub use builder::StateTableBuilder;
pub use types::*;

use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// The master state table shared by all sessions
    pub static ref MASTER_TABLE: Arc<StateTable> = Arc::new(build_master_table());
}

fn build_master_table() -> StateTable {
    let mut builder = StateTableBuilder::new();
    tables::outgoing::add_outgoing_transitions(&mut builder);
    tables::incoming::add_incoming_transitions(&mut builder);
    tables::common::add_common_transitions(&mut builder);
    let table = builder.build();

    if let Err(errors) = table.validate() {
        tracing::error!("Call state table failed validation: {:?}", errors);
    }
    tracing::debug!("Built call state table with {} transitions", table.len());
    table
}
