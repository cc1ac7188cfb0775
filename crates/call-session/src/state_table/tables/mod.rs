pub mod common;
pub mod incoming;
pub mod outgoing;
