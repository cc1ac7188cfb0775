//! Read handle given to the embedding application

use chrono::{DateTime, Utc};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{CallController, CallSummary, SessionInner, TransitionRecord};
use crate::config::CallSessionConfig;
use crate::errors::{CallSessionError, DataKind, Result, UsageError};
use crate::media::MediaParameters;
use crate::quality::{QualityReport, QualitySnapshot};
use crate::types::{CallDirection, CallState, EndReason, PeerAddress, SessionId};

/// Application-facing view of one call.
///
/// Cheap to clone; every clone observes the same call. `C` is the type of
/// the opaque application context the embedding application may attach.
///
/// Once the call has been released every accessor except [`id`](Self::id)
/// and [`direction`](Self::direction) fails with
/// [`UsageError::SessionReleased`]. Setters are refused with
/// [`CallSessionError::TerminalState`] as soon as the call is in `Error`
/// or `Released`.
#[derive(Debug)]
pub struct CallSession<C = ()> {
    inner: Arc<SessionInner<C>>,
}

impl<C> Clone for CallSession<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl CallSession {
    /// Outgoing call with the default configuration
    pub fn outgoing(peer: impl Into<PeerAddress>) -> (CallSession, CallController) {
        super::new_pair(CallDirection::Outgoing, peer.into(), &CallSessionConfig::default())
    }

    /// Incoming call with the default configuration
    pub fn incoming(peer: impl Into<PeerAddress>) -> (CallSession, CallController) {
        super::new_pair(CallDirection::Incoming, peer.into(), &CallSessionConfig::default())
    }
}

impl<C> CallSession<C> {
    /// Create a session and the controller that drives it
    pub fn create(
        direction: CallDirection,
        peer: impl Into<PeerAddress>,
        config: &CallSessionConfig,
    ) -> Result<(CallSession<C>, CallController<C>)> {
        config.validate()?;
        Ok(super::new_pair(direction, peer.into(), config))
    }

    pub(crate) fn from_inner(inner: Arc<SessionInner<C>>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> &SessionId {
        &self.inner.id
    }

    pub fn direction(&self) -> CallDirection {
        self.inner.direction
    }

    pub fn remote_address(&self) -> Result<PeerAddress> {
        self.inner.ensure_live()?;
        Ok(self.inner.peer.clone())
    }

    pub fn state(&self) -> Result<CallState> {
        let state = self.inner.state();
        if state == CallState::Released {
            return Err(UsageError::SessionReleased.into());
        }
        Ok(state)
    }

    /// Time since the call was first connected.
    ///
    /// Zero if it never connected; frozen once the call ends or fails.
    pub fn duration(&self) -> Result<Duration> {
        let lifecycle = self.inner.lifecycle.read();
        if lifecycle.state == CallState::Released {
            return Err(UsageError::SessionReleased.into());
        }
        Ok(lifecycle.duration_at(Instant::now()))
    }

    /// Wall-clock time of the first connection
    pub fn started_at(&self) -> Result<Option<DateTime<Utc>>> {
        self.inner.ensure_live()?;
        Ok(self.inner.lifecycle.read().started_at)
    }

    /// Why the call ended or failed, once it has
    pub fn end_reason(&self) -> Result<Option<EndReason>> {
        self.inner.ensure_live()?;
        Ok(self.inner.lifecycle.read().end_reason.clone())
    }

    /// Recorded transitions, oldest first. Empty when history is disabled.
    pub fn history(&self) -> Result<Vec<TransitionRecord>> {
        self.inner.ensure_live()?;
        Ok(self
            .inner
            .lifecycle
            .read()
            .history
            .as_ref()
            .map(|h| h.all())
            .unwrap_or_default())
    }

    /// Independent snapshot of the negotiated parameters
    pub fn current_parameters_copy(&self) -> Result<MediaParameters> {
        self.inner.ensure_live()?;
        Ok(self.inner.params.current_copy())
    }

    /// Parameters last advertised by the peer
    pub fn remote_parameters(&self) -> Result<MediaParameters> {
        self.inner.ensure_live()?;
        self.inner
            .params
            .remote()
            .ok_or(CallSessionError::DataUnavailable(DataKind::RemoteParameters))
    }

    /// Latest quality rating (0..=5)
    pub fn current_quality(&self) -> Result<f32> {
        self.inner.ensure_live()?;
        self.inner
            .quality
            .current_quality()
            .ok_or(CallSessionError::DataUnavailable(DataKind::CurrentQuality))
    }

    /// Mean quality rating over the whole call
    pub fn average_quality(&self) -> Result<f32> {
        self.inner.ensure_live()?;
        self.inner
            .quality
            .average_quality()
            .ok_or(CallSessionError::DataUnavailable(DataKind::AverageQuality))
    }

    /// Transport statistics from the most recent quality report
    pub fn audio_stats(&self) -> Result<QualityReport> {
        self.inner.ensure_live()?;
        self.inner
            .quality
            .last_report()
            .ok_or(CallSessionError::DataUnavailable(DataKind::AudioStats))
    }

    pub fn quality_snapshot(&self) -> Result<QualitySnapshot> {
        self.inner.ensure_live()?;
        Ok(self.inner.quality.snapshot())
    }

    /// SAS of the main voice stream
    pub fn authentication_token(&self) -> Result<String> {
        self.inner.ensure_live()?;
        self.inner.auth.token()
    }

    pub fn is_authentication_token_verified(&self) -> Result<bool> {
        self.inner.ensure_live()?;
        Ok(self.inner.auth.is_verified())
    }

    /// Record the user's SAS comparison result
    pub fn set_authentication_token_verified(&self, verified: bool) -> Result<()> {
        self.inner.mutate("set_authentication_token_verified", |inner| {
            inner.auth.set_verified(verified)
        })
    }

    /// Takes effect on the next audio pipeline setup
    pub fn enable_echo_cancellation(&self, enabled: bool) -> Result<()> {
        self.inner.mutate("enable_echo_cancellation", |inner| {
            inner.echo_cancellation.store(enabled, Ordering::SeqCst);
            debug!("Session {} echo cancellation: {}", inner.id, enabled);
            Ok(())
        })
    }

    pub fn is_echo_cancellation_enabled(&self) -> Result<bool> {
        self.inner.ensure_live()?;
        Ok(self.inner.echo_cancellation.load(Ordering::SeqCst))
    }

    /// Takes effect on the next audio pipeline setup
    pub fn enable_echo_limiter(&self, enabled: bool) -> Result<()> {
        self.inner.mutate("enable_echo_limiter", |inner| {
            inner.echo_limiter.store(enabled, Ordering::SeqCst);
            debug!("Session {} echo limiter: {}", inner.id, enabled);
            Ok(())
        })
    }

    pub fn is_echo_limiter_enabled(&self) -> Result<bool> {
        self.inner.ensure_live()?;
        Ok(self.inner.echo_limiter.load(Ordering::SeqCst))
    }

    /// Remote User-Agent header, `None` until reported
    pub fn remote_user_agent(&self) -> Result<Option<String>> {
        self.inner.ensure_live()?;
        Ok(self.inner.remote_endpoint.read().user_agent.clone())
    }

    /// Remote Contact, `None` until reported
    pub fn remote_contact(&self) -> Result<Option<String>> {
        self.inner.ensure_live()?;
        Ok(self.inner.remote_endpoint.read().contact.clone())
    }

    /// `false` until the media layer reports conference membership
    pub fn is_in_conference(&self) -> Result<bool> {
        self.inner.ensure_live()?;
        Ok(self.inner.remote_endpoint.read().in_conference)
    }

    /// Playback volume of the remote stream, `None` until reported
    pub fn play_volume(&self) -> Result<Option<f32>> {
        self.inner.ensure_live()?;
        Ok(self.inner.remote_endpoint.read().play_volume)
    }

    /// Attach application data, returning what was attached before
    pub fn set_application_context(&self, context: Arc<C>) -> Result<Option<Arc<C>>> {
        self.inner.mutate("set_application_context", |inner| {
            Ok(inner.context.write().replace(context))
        })
    }

    pub fn application_context(&self) -> Result<Option<Arc<C>>> {
        self.inner.ensure_live()?;
        Ok(self.inner.context.read().clone())
    }

    pub fn take_application_context(&self) -> Result<Option<Arc<C>>> {
        self.inner
            .mutate("take_application_context", |inner| Ok(inner.context.write().take()))
    }

    /// Record for an external call log
    pub fn summary(&self) -> Result<CallSummary> {
        self.inner.ensure_live()?;
        let (state, started_at, duration, end_reason) = {
            let lifecycle = self.inner.lifecycle.read();
            (
                lifecycle.state,
                lifecycle.started_at,
                lifecycle.duration_at(Instant::now()),
                lifecycle.end_reason.clone(),
            )
        };
        Ok(CallSummary {
            session_id: self.inner.id.clone(),
            direction: self.inner.direction,
            peer: self.inner.peer.clone(),
            state,
            created_at: self.inner.created_at,
            started_at,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            average_quality: self.inner.quality.average_quality(),
            authentication_verified: self.inner.auth.is_verified(),
            end_reason,
        })
    }
}
