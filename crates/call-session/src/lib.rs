//! # Call-Session - A Single Live Call for RVoIP
//!
//! This crate models one voice/video call inside a VoIP client: its
//! lifecycle state, the negotiated media parameters, a running call quality
//! rating and the ZRTP short authentication string (SAS) the user verifies.
//!
//! Signaling, RTP transport and the ZRTP key agreement live elsewhere. They
//! feed a session through its [`CallController`]; the application reads the
//! session through [`CallSession`].
//!
//! ## Usage
//!
//! ```rust
//! use rvoip_call_session::{AuthenticationToken, CallSession, CallState};
//!
//! let (session, controller) = CallSession::outgoing("sip:bob@example.com");
//!
//! for state in [
//!     CallState::OutgoingInit,
//!     CallState::OutgoingProgress,
//!     CallState::OutgoingRinging,
//!     CallState::Connected,
//! ] {
//!     controller.request_transition(state)?;
//! }
//!
//! controller.ingest_quality(4.5f32)?;
//! controller.deliver_authentication_token(AuthenticationToken::for_main_stream("ab12"))?;
//!
//! assert_eq!(session.state()?, CallState::Connected);
//! assert_eq!(session.current_quality()?, 4.5);
//! assert_eq!(session.authentication_token()?, "ab12");
//! assert!(!session.is_authentication_token_verified()?);
//! # Ok::<(), rvoip_call_session::CallSessionError>(())
//! ```

pub mod auth;
pub mod config;
pub mod errors;
pub mod media;
pub mod quality;
pub mod session;
pub mod state_table;
pub mod types;

pub use auth::{AuthenticationSession, AuthenticationToken, MAIN_STREAM_INDEX};
pub use config::{CallSessionConfig, HistoryConfig};
pub use errors::{CallSessionError, DataKind, Result, UsageError};
pub use media::{MediaEncryption, MediaParameters, MediaParametersBuilder};
pub use quality::{QualityMonitor, QualityReport, QualitySample, QualitySnapshot, QUALITY_UNAVAILABLE};
pub use session::{
    CallController, CallSession, CallSummary, SignalingEvent, TransitionRecord, TransitionRequest,
};
pub use state_table::MASTER_TABLE;
pub use types::{CallDirection, CallState, EndReason, PeerAddress, RemoteEndpointInfo, SessionId};
