//! Media parameter snapshots held by a session
//!
//! Both slots are backed by `arc-swap`: a renegotiation publishes a complete
//! new [`MediaParameters`] in one pointer swap, so readers see either the old
//! set or the new one, never a mix.

pub mod params;

pub use params::{MediaEncryption, MediaParameters, MediaParametersBuilder};

use arc_swap::{ArcSwap, ArcSwapOption};
use std::sync::Arc;
use tracing::debug;

/// Current (locally negotiated) and remote parameter sets
#[derive(Debug)]
pub struct ParameterSlots {
    current: ArcSwap<MediaParameters>,
    remote: ArcSwapOption<MediaParameters>,
}

impl ParameterSlots {
    pub fn new(initial: MediaParameters) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            remote: ArcSwapOption::empty(),
        }
    }

    /// Independent copy of the current set
    pub fn current_copy(&self) -> MediaParameters {
        MediaParameters::clone(&self.current.load())
    }

    /// Last set advertised by the peer, if any
    pub fn remote(&self) -> Option<MediaParameters> {
        self.remote.load().as_deref().cloned()
    }

    pub fn replace_current(&self, params: MediaParameters) {
        debug!(
            "Replacing current media parameters (video: {}, encryption: {})",
            params.video_enabled(),
            params.encryption()
        );
        self.current.store(Arc::new(params));
    }

    pub fn replace_remote(&self, params: MediaParameters) {
        debug!(
            "Replacing remote media parameters (video: {}, encryption: {})",
            params.video_enabled(),
            params.encryption()
        );
        self.remote.store(Some(Arc::new(params)));
    }
}
