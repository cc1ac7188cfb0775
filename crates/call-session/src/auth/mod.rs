//! ZRTP short authentication string (SAS) tracking
//!
//! The ZRTP engine computes the SAS once the key agreement for a stream
//! completes. Only the main (voice) stream's SAS is shown to the user, who
//! compares it with the peer and records the outcome here. This module
//! stores that attestation; it performs no cryptography.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CallSessionError, DataKind, Result, UsageError};

/// Index of the voice stream, whose SAS is the one presented to the user
pub const MAIN_STREAM_INDEX: usize = 0;

/// SAS delivery from the ZRTP engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationToken {
    /// The short authentication string, e.g. `"ab12"`
    pub sas: String,
    /// Stream the key agreement ran on
    pub stream_index: usize,
    /// Number of media streams in the call
    pub stream_count: usize,
    /// The engine already trusts the peer through a cached shared secret
    pub cache_verified: bool,
}

impl AuthenticationToken {
    /// Token for the main voice stream of a single-stream call
    pub fn for_main_stream(sas: impl Into<String>) -> Self {
        Self {
            sas: sas.into(),
            stream_index: MAIN_STREAM_INDEX,
            stream_count: 1,
            cache_verified: false,
        }
    }

    pub fn on_stream(mut self, stream_index: usize, stream_count: usize) -> Self {
        self.stream_index = stream_index;
        self.stream_count = stream_count;
        self
    }

    pub fn cache_verified(mut self, verified: bool) -> Self {
        self.cache_verified = verified;
        self
    }

    pub fn is_main_stream(&self) -> bool {
        self.stream_index == MAIN_STREAM_INDEX
    }
}

#[derive(Debug, Default, Clone)]
struct AuthState {
    token: Option<String>,
    verified: bool,
}

/// SAS token and the user's verification decision
#[derive(Debug, Default)]
pub struct AuthenticationSession {
    state: RwLock<AuthState>,
}

impl AuthenticationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a SAS delivered by the ZRTP engine.
    ///
    /// Tokens for secondary streams are ignored and `Ok(false)` is returned.
    /// A new main-stream token replaces the previous one and resets the
    /// verified flag to what the engine reported through its cache.
    pub fn deliver(&self, token: AuthenticationToken) -> Result<bool> {
        if token.sas.is_empty() {
            return Err(UsageError::EmptyAuthenticationToken.into());
        }
        if !token.is_main_stream() {
            debug!(
                "Ignoring SAS for stream {} of {}",
                token.stream_index, token.stream_count
            );
            return Ok(false);
        }

        let mut state = self.state.write();
        state.token = Some(token.sas);
        state.verified = token.cache_verified;
        info!(
            "SAS delivered for main stream (cache verified: {})",
            token.cache_verified
        );
        Ok(true)
    }

    /// The main stream's SAS
    pub fn token(&self) -> Result<String> {
        self.state
            .read()
            .token
            .clone()
            .ok_or(CallSessionError::DataUnavailable(DataKind::AuthenticationToken))
    }

    pub fn has_token(&self) -> bool {
        self.state.read().token.is_some()
    }

    pub fn is_verified(&self) -> bool {
        self.state.read().verified
    }

    /// Record whether the user confirmed the SAS.
    ///
    /// Fails with [`UsageError::NoAuthenticationToken`] when no SAS exists;
    /// the flag keeps its previous value in that case.
    pub fn set_verified(&self, verified: bool) -> Result<()> {
        let mut state = self.state.write();
        if state.token.is_none() {
            warn!("SAS verification attempted before any token was delivered");
            return Err(UsageError::NoAuthenticationToken.into());
        }
        state.verified = verified;
        info!("SAS marked as {}", if verified { "verified" } else { "not verified" });
        Ok(())
    }

    /// Forget the token and the decision
    pub fn clear(&self) {
        *self.state.write() = AuthState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_unavailable_before_delivery() {
        let auth = AuthenticationSession::new();
        assert_eq!(
            auth.token().unwrap_err(),
            CallSessionError::DataUnavailable(DataKind::AuthenticationToken)
        );
        assert!(!auth.is_verified());
    }

    #[test]
    fn test_verify_without_token_keeps_flag() {
        let auth = AuthenticationSession::new();
        let err = auth.set_verified(true).unwrap_err();
        assert_eq!(err, CallSessionError::Usage(UsageError::NoAuthenticationToken));
        assert!(!auth.is_verified());
    }

    #[test]
    fn test_secondary_stream_ignored() {
        let auth = AuthenticationSession::new();
        let video = AuthenticationToken::for_main_stream("ffff").on_stream(1, 2);
        assert!(!auth.deliver(video).unwrap());
        assert!(!auth.has_token());
    }

    #[test]
    fn test_redelivery_resets_verification() {
        let auth = AuthenticationSession::new();
        auth.deliver(AuthenticationToken::for_main_stream("ab12")).unwrap();
        auth.set_verified(true).unwrap();
        assert!(auth.is_verified());

        auth.deliver(AuthenticationToken::for_main_stream("cd34")).unwrap();
        assert_eq!(auth.token().unwrap(), "cd34");
        assert!(!auth.is_verified());

        auth.deliver(AuthenticationToken::for_main_stream("ef56").cache_verified(true))
            .unwrap();
        assert!(auth.is_verified());
    }

    #[test]
    fn test_empty_token_rejected() {
        let auth = AuthenticationSession::new();
        assert!(auth.deliver(AuthenticationToken::for_main_stream("")).is_err());
        assert!(!auth.has_token());
    }
}
