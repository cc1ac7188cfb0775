//! Inbound events from the signaling layer

use serde::{Deserialize, Serialize};

use crate::media::MediaParameters;
use crate::types::{CallState, RemoteEndpointInfo};

/// Request to move the call to `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target: CallState,
    /// Free-form reason, e.g. the SIP reason phrase
    pub reason: Option<String>,
    /// Protocol error code, e.g. a SIP status code
    pub error_code: Option<u16>,
}

impl TransitionRequest {
    pub fn to(target: CallState) -> Self {
        Self {
            target,
            reason: None,
            error_code: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_error_code(mut self, code: u16) -> Self {
        self.error_code = Some(code);
        self
    }
}

impl From<CallState> for TransitionRequest {
    fn from(target: CallState) -> Self {
        Self::to(target)
    }
}

/// Everything the signaling layer may push into a session
#[derive(Debug, Clone, PartialEq)]
pub enum SignalingEvent {
    /// State change request
    StateChange(TransitionRequest),
    /// Locally negotiated parameters after an offer/answer exchange
    CurrentParameters(MediaParameters),
    /// Parameters advertised by the peer
    RemoteParameters(MediaParameters),
    /// Peer metadata learned while connecting
    RemoteEndpoint(RemoteEndpointInfo),
}

impl SignalingEvent {
    pub fn state_change(target: CallState) -> Self {
        SignalingEvent::StateChange(TransitionRequest::to(target))
    }

    /// Event name for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            SignalingEvent::StateChange(_) => "StateChange",
            SignalingEvent::CurrentParameters(_) => "CurrentParameters",
            SignalingEvent::RemoteParameters(_) => "RemoteParameters",
            SignalingEvent::RemoteEndpoint(_) => "RemoteEndpoint",
        }
    }
}
