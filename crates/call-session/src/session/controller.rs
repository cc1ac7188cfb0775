//! Mutation capability held by the call manager

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{CallSession, SessionInner, SignalingEvent, TransitionRecord, TransitionRequest};
use crate::auth::AuthenticationToken;
use crate::errors::{CallSessionError, Result};
use crate::media::MediaParameters;
use crate::quality::{QualityReport, QualitySample};
use crate::state_table::MASTER_TABLE;
use crate::types::{CallState, EndReason, RemoteEndpointInfo, SessionId};

/// Write side of a call session.
///
/// Owned by the call manager. Signaling callbacks drive state through
/// [`apply_signaling_event`](Self::apply_signaling_event); the media and
/// ZRTP layers push quality samples and SAS tokens through the other
/// methods. All methods take `&self`, so the manager may share the
/// controller between those paths behind an `Arc`.
///
/// Once the call is in `Error` or `Released` every method other than
/// [`state`](Self::state) and [`session`](Self::session) fails with
/// [`CallSessionError::TerminalState`].
#[derive(Debug)]
pub struct CallController<C = ()> {
    inner: Arc<SessionInner<C>>,
}

impl<C> CallController<C> {
    pub(crate) fn from_inner(inner: Arc<SessionInner<C>>) -> Self {
        Self { inner }
    }

    pub fn id(&self) -> &SessionId {
        &self.inner.id
    }

    /// A new read handle for the application
    pub fn session(&self) -> CallSession<C> {
        CallSession::from_inner(self.inner.clone())
    }

    /// Current state; unlike the read handle this works after release
    pub fn state(&self) -> CallState {
        self.inner.state()
    }

    /// Dispatch one event from the signaling layer
    pub fn apply_signaling_event(&self, event: SignalingEvent) -> Result<()> {
        debug!("Session {} applying {}", self.inner.id, event.type_name());
        match event {
            SignalingEvent::StateChange(request) => self.request_transition(request).map(|_| ()),
            SignalingEvent::CurrentParameters(params) => self.replace_current_parameters(params),
            SignalingEvent::RemoteParameters(params) => self.set_remote_parameters(params),
            SignalingEvent::RemoteEndpoint(info) => self.update_remote_endpoint(info),
        }
    }

    /// Move the call to `request.target` if the state table allows it.
    ///
    /// Returns the state the call left. A rejected request leaves the
    /// session untouched and yields [`CallSessionError::InvalidTransition`].
    /// Entering `Released` reclaims resources before the lifecycle lock is
    /// given up, so no mutation can slip in between.
    pub fn request_transition(&self, request: impl Into<TransitionRequest>) -> Result<CallState> {
        let request = request.into();
        let inner = &self.inner;
        let mut lifecycle = inner.lifecycle.write();
        let from = lifecycle.state;
        let to = request.target;

        if !MASTER_TABLE.is_allowed(inner.direction, from, to) {
            warn!(
                "Session {} rejected {} transition {} -> {}",
                inner.id, inner.direction, from, to
            );
            return Err(CallSessionError::InvalidTransition {
                direction: inner.direction,
                from,
                to,
            });
        }

        let now = Instant::now();
        if to == CallState::Connected && lifecycle.connected_at.is_none() {
            lifecycle.connected_at = Some(now);
            lifecycle.started_at = Some(Utc::now());
        }
        if from.is_in_call() && !to.is_in_call() {
            let elapsed = lifecycle.duration_at(now);
            lifecycle.frozen_duration = Some(elapsed);
        }
        if matches!(to, CallState::Ended | CallState::Error) {
            lifecycle.end_reason = Some(EndReason {
                state: to,
                reason: request.reason.clone(),
                error_code: request.error_code,
            });
        }
        lifecycle.state = to;

        if let Some(history) = lifecycle.history.as_mut() {
            history.record_transition(TransitionRecord {
                sequence: 0,
                from,
                to,
                at: now,
                timestamp: Utc::now(),
                reason: request.reason,
                error_code: request.error_code,
            });
        }

        info!("Session {} state: {} -> {}", inner.id, from, to);
        let released_context = if to == CallState::Released {
            info!("Session {} released", inner.id);
            inner.release_resources()
        } else {
            None
        };
        drop(lifecycle);
        drop(released_context);
        Ok(from)
    }

    /// Publish newly negotiated local parameters
    pub fn replace_current_parameters(&self, params: MediaParameters) -> Result<()> {
        self.inner.mutate("replace_current_parameters", |inner| {
            inner.params.replace_current(params);
            Ok(())
        })
    }

    /// Publish parameters advertised by the peer
    pub fn set_remote_parameters(&self, params: MediaParameters) -> Result<()> {
        self.inner.mutate("set_remote_parameters", |inner| {
            inner.params.replace_remote(params);
            Ok(())
        })
    }

    /// Replace the peer metadata wholesale
    pub fn update_remote_endpoint(&self, info: RemoteEndpointInfo) -> Result<()> {
        self.inner.mutate("update_remote_endpoint", |inner| {
            debug!(
                "Session {} remote endpoint: ua={:?} contact={:?} conference={}",
                inner.id, info.user_agent, info.contact, info.in_conference
            );
            *inner.remote_endpoint.write() = info;
            Ok(())
        })
    }

    /// Feed one quality rating from the media statistics path
    pub fn ingest_quality(&self, sample: impl Into<QualitySample>) -> Result<bool> {
        let sample: QualitySample = sample.into();
        self.inner
            .mutate("ingest_quality", |inner| inner.quality.ingest(sample))
    }

    /// Feed transport statistics, rated by [`crate::quality::rate`]
    pub fn ingest_quality_report(&self, report: &QualityReport) -> Result<bool> {
        self.inner
            .mutate("ingest_quality_report", |inner| inner.quality.ingest_report(report))
    }

    /// Hand over a SAS computed by the ZRTP engine
    pub fn deliver_authentication_token(&self, token: AuthenticationToken) -> Result<bool> {
        self.inner
            .mutate("deliver_authentication_token", |inner| inner.auth.deliver(token))
    }
}
