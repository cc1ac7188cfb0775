//! Error types for call-session
//!
//! Every fallible operation on a call session returns [`Result`]. The three
//! families mirror how the embedding call manager reacts to them:
//!
//! - [`CallSessionError::InvalidTransition`]: the signaling layer asked for a
//!   state change the table does not allow. The session is left untouched.
//!   [`CallSessionError::TerminalState`] belongs to the same family: any
//!   change requested once the call sits in `Error` or `Released`.
//! - [`CallSessionError::DataUnavailable`]: a value has not been produced yet
//!   (no quality sample, no remote SDP answer, no SAS).
//! - [`CallSessionError::Usage`]: the caller used the API wrongly, e.g.
//!   verifying a SAS that was never delivered or reading a released session.

use thiserror::Error;

use crate::types::{CallDirection, CallState};

/// Result type alias for call-session operations
pub type Result<T> = std::result::Result<T, CallSessionError>;

/// Errors returned by call-session operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallSessionError {
    /// The requested state is not reachable from the current one
    #[error("Invalid transition for {direction} call: {from} -> {to}")]
    InvalidTransition {
        direction: CallDirection,
        from: CallState,
        to: CallState,
    },

    /// The call is in `Error` or `Released` and accepts no further changes
    #[error("{operation} rejected: {direction} call is in terminal state {state}")]
    TerminalState {
        direction: CallDirection,
        state: CallState,
        operation: &'static str,
    },

    /// A value was read before it exists
    #[error("{0} is not available")]
    DataUnavailable(DataKind),

    /// The API was used in a way that has no meaning
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Configuration rejected by validation or parsing
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Values that may not exist yet when read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    CurrentQuality,
    AverageQuality,
    RemoteParameters,
    AuthenticationToken,
    AudioStats,
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataKind::CurrentQuality => "Current quality rating",
            DataKind::AverageQuality => "Average quality rating",
            DataKind::RemoteParameters => "Remote media parameters",
            DataKind::AuthenticationToken => "Authentication token",
            DataKind::AudioStats => "Audio statistics",
        };
        f.write_str(name)
    }
}

/// Caller mistakes. None of these change session state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UsageError {
    #[error("session has been released")]
    SessionReleased,

    #[error("no authentication token has been delivered for the main stream")]
    NoAuthenticationToken,

    #[error("authentication token is empty")]
    EmptyAuthenticationToken,

    #[error("quality rating {0} is outside 0..=5")]
    QualityOutOfRange(f32),
}

impl CallSessionError {
    /// Create a new configuration error
    pub fn config(details: impl Into<String>) -> Self {
        Self::Config(details.into())
    }

    /// Rejected state change, including any change to a terminated call
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::TerminalState { .. }
        )
    }

    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_))
    }

    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
