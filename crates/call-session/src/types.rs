//! Core types for call-session
//!
//! Identifiers, the call state enumeration and the small value types the
//! signaling layer hands to a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Session ID type
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("call-{}", uuid::Uuid::new_v4()))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side placed the call. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

impl fmt::Display for CallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallDirection::Incoming => f.write_str("incoming"),
            CallDirection::Outgoing => f.write_str("outgoing"),
        }
    }
}

/// Call lifecycle state
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CallState {
    /// Session created, nothing sent or received yet
    Idle,
    /// INVITE received, local side alerted
    IncomingReceived,
    /// Early media flowing before the local side answers
    IncomingEarlyMedia,
    /// INVITE about to be sent
    OutgoingInit,
    /// 1xx provisional response received
    OutgoingProgress,
    /// 180 Ringing received
    OutgoingRinging,
    /// 183 with early media received
    OutgoingEarlyMedia,
    /// Call answered, media not yet confirmed
    Connected,
    /// Media streams established
    StreamsRunning,
    /// Local hold in progress
    Pausing,
    /// Held by the local side
    Paused,
    /// Local resume in progress
    Resuming,
    /// Held by the remote side
    PausedByRemote,
    /// Remote side is renegotiating the session
    UpdatedByRemote,
    /// Call finished normally
    Ended,
    /// Call failed
    Error,
    /// Session resources reclaimed
    Released,
}

impl CallState {
    /// No transition leaves a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallState::Released | CallState::Error)
    }

    /// States in which the call has been answered and the duration clock runs
    pub fn is_in_call(&self) -> bool {
        matches!(
            self,
            CallState::Connected
                | CallState::StreamsRunning
                | CallState::Pausing
                | CallState::Paused
                | CallState::Resuming
                | CallState::PausedByRemote
                | CallState::UpdatedByRemote
        )
    }

    /// Setup states before the call is answered
    pub fn is_early(&self) -> bool {
        matches!(
            self,
            CallState::IncomingReceived
                | CallState::IncomingEarlyMedia
                | CallState::OutgoingInit
                | CallState::OutgoingProgress
                | CallState::OutgoingRinging
                | CallState::OutgoingEarlyMedia
        )
    }

    /// Every state, in declaration order
    pub const ALL: [CallState; 17] = [
        CallState::Idle,
        CallState::IncomingReceived,
        CallState::IncomingEarlyMedia,
        CallState::OutgoingInit,
        CallState::OutgoingProgress,
        CallState::OutgoingRinging,
        CallState::OutgoingEarlyMedia,
        CallState::Connected,
        CallState::StreamsRunning,
        CallState::Pausing,
        CallState::Paused,
        CallState::Resuming,
        CallState::PausedByRemote,
        CallState::UpdatedByRemote,
        CallState::Ended,
        CallState::Error,
        CallState::Released,
    ];
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Remote party identifier as handed over by the signaling layer.
///
/// The session never parses it; cloning shares the underlying string.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PeerAddress(Arc<str>);

impl PeerAddress {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(Arc::from(address.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PeerAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for PeerAddress {
    fn from(address: String) -> Self {
        Self(Arc::from(address))
    }
}

impl From<PeerAddress> for String {
    fn from(address: PeerAddress) -> Self {
        address.0.to_string()
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Peer metadata reported by the signaling/media layer once the call connects.
///
/// `None` means "not reported yet".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteEndpointInfo {
    pub user_agent: Option<String>,
    pub contact: Option<String>,
    pub in_conference: bool,
    pub play_volume: Option<f32>,
}

impl RemoteEndpointInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn with_conference(mut self, in_conference: bool) -> Self {
        self.in_conference = in_conference;
        self
    }

    pub fn with_play_volume(mut self, volume: f32) -> Self {
        self.play_volume = Some(volume);
        self
    }
}

/// Why a call reached `Ended` or `Error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndReason {
    pub state: CallState,
    pub reason: Option<String>,
    pub error_code: Option<u16>,
}
