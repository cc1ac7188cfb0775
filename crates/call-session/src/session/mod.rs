//! A single call session
//!
//! A session is split into two handles over the same shared state:
//!
//! ```text
//!  signaling / media / ZRTP layers            application threads
//!               │                                      │
//!        CallController<C>  ──── Arc<SessionInner> ──── CallSession<C> (Clone)
//!   (transitions, parameters,                   (getters, echo toggles,
//!    quality samples, SAS)                        SAS verification, context)
//! ```
//!
//! The controller is the only way to change call state or swap media
//! parameters. It is handed to the call manager at creation and is not
//! `Clone`; everything else gets a [`CallSession`].
//!
//! Each component guards its own data: the lifecycle behind one `RwLock`,
//! quality and SAS behind their own locks, parameters behind `arc-swap`,
//! echo toggles as atomics. Mutations hold the lifecycle read lock while
//! they touch a component, and the lifecycle lock is always taken first.
//! Readers combining values from several components may see a quality
//! sample taken just before or after a transition.

pub mod call;
pub mod controller;
pub mod events;
pub mod history;
pub mod summary;

pub use call::CallSession;
pub use controller::CallController;
pub use events::{SignalingEvent, TransitionRequest};
pub use history::{SessionHistory, TransitionRecord};
pub use summary::CallSummary;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::auth::AuthenticationSession;
use crate::config::CallSessionConfig;
use crate::errors::{CallSessionError, Result, UsageError};
use crate::media::ParameterSlots;
use crate::quality::QualityMonitor;
use crate::types::{CallDirection, CallState, EndReason, PeerAddress, RemoteEndpointInfo, SessionId};

/// State owned by the transition function
#[derive(Debug)]
pub(crate) struct Lifecycle {
    pub state: CallState,
    /// Set on the first entry into `Connected`, never reset
    pub connected_at: Option<Instant>,
    pub started_at: Option<DateTime<Utc>>,
    /// Duration captured when the call left the in-call states
    pub frozen_duration: Option<Duration>,
    pub end_reason: Option<EndReason>,
    pub history: Option<SessionHistory>,
}

impl Lifecycle {
    fn new(config: &CallSessionConfig) -> Self {
        Self {
            state: CallState::Idle,
            connected_at: None,
            started_at: None,
            frozen_duration: None,
            end_reason: None,
            history: config
                .history
                .enabled
                .then(|| SessionHistory::new(&config.history)),
        }
    }

    pub fn duration_at(&self, now: Instant) -> Duration {
        if let Some(frozen) = self.frozen_duration {
            return frozen;
        }
        match self.connected_at {
            Some(connected_at) if self.state.is_in_call() => {
                now.saturating_duration_since(connected_at)
            }
            _ => Duration::ZERO,
        }
    }
}

/// Shared state behind both handles
#[derive(Debug)]
pub(crate) struct SessionInner<C> {
    pub id: SessionId,
    pub direction: CallDirection,
    pub peer: PeerAddress,
    pub created_at: DateTime<Utc>,
    pub lifecycle: RwLock<Lifecycle>,
    pub quality: QualityMonitor,
    pub params: ParameterSlots,
    pub auth: AuthenticationSession,
    pub echo_cancellation: AtomicBool,
    pub echo_limiter: AtomicBool,
    pub remote_endpoint: RwLock<RemoteEndpointInfo>,
    pub context: RwLock<Option<Arc<C>>>,
}

impl<C> SessionInner<C> {
    fn new(direction: CallDirection, peer: PeerAddress, config: &CallSessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            direction,
            peer,
            created_at: Utc::now(),
            lifecycle: RwLock::new(Lifecycle::new(config)),
            quality: QualityMonitor::new(),
            params: ParameterSlots::new(config.initial_parameters.clone()),
            auth: AuthenticationSession::new(),
            echo_cancellation: AtomicBool::new(config.echo_cancellation),
            echo_limiter: AtomicBool::new(config.echo_limiter),
            remote_endpoint: RwLock::new(RemoteEndpointInfo::default()),
            context: RwLock::new(None),
        }
    }

    pub fn state(&self) -> CallState {
        self.lifecycle.read().state
    }

    /// Fail with `SessionReleased` once the session reached `Released`
    pub fn ensure_live(&self) -> Result<()> {
        if self.state() == CallState::Released {
            tracing::warn!("Session {} used after release", self.id);
            return Err(UsageError::SessionReleased.into());
        }
        Ok(())
    }

    /// Run a mutation while the call is still live.
    ///
    /// The lifecycle read lock is held across `f`, so no transition into
    /// `Error` or `Released` can interleave with it. `f` must not touch the
    /// lifecycle lock itself.
    pub fn mutate<R>(&self, operation: &'static str, f: impl FnOnce(&Self) -> Result<R>) -> Result<R> {
        let lifecycle = self.lifecycle.read();
        if lifecycle.state.is_terminal() {
            tracing::warn!(
                "Session {} rejected {} in terminal state {}",
                self.id, operation, lifecycle.state
            );
            return Err(CallSessionError::TerminalState {
                direction: self.direction,
                state: lifecycle.state,
                operation,
            });
        }
        let result = f(self);
        drop(lifecycle);
        result
    }

    /// Detach what the session holds on behalf of others.
    ///
    /// Called with the lifecycle write lock held. The context is handed back
    /// so the caller can drop it after unlocking.
    pub fn release_resources(&self) -> Option<Arc<C>> {
        self.auth.clear();
        self.context.write().take()
    }
}

/// Create the controller/session pair for a new call
pub(crate) fn new_pair<C>(
    direction: CallDirection,
    peer: PeerAddress,
    config: &CallSessionConfig,
) -> (CallSession<C>, CallController<C>) {
    let inner = Arc::new(SessionInner::new(direction, peer, config));
    tracing::info!(
        "Created {} call session {} with {}",
        direction,
        inner.id,
        inner.peer
    );
    (
        CallSession::from_inner(inner.clone()),
        CallController::from_inner(inner),
    )
}
