//! Session configuration
//!
//! ```rust
//! use rvoip_call_session::{CallSessionConfig, MediaEncryption, MediaParameters};
//!
//! let config = CallSessionConfig::default()
//!     .with_echo_limiter(true)
//!     .with_initial_parameters(
//!         MediaParameters::builder().encryption(MediaEncryption::Zrtp).build(),
//!     );
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CallSessionError, Result};
use crate::media::MediaParameters;

/// Transition history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record transitions at all
    pub enabled: bool,
    /// Ring buffer size; older records are dropped
    pub max_transitions: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_transitions: 32,
        }
    }
}

/// Per-session settings supplied by the call manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSessionConfig {
    /// Initial echo canceller toggle
    pub echo_cancellation: bool,
    /// Initial echo limiter toggle
    pub echo_limiter: bool,
    /// Locally offered parameters, reported as current until negotiation
    pub initial_parameters: MediaParameters,
    pub history: HistoryConfig,
}

impl Default for CallSessionConfig {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            echo_limiter: false,
            initial_parameters: MediaParameters::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl CallSessionConfig {
    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| CallSessionError::config(format!("Invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_echo_cancellation(mut self, enabled: bool) -> Self {
        self.echo_cancellation = enabled;
        self
    }

    pub fn with_echo_limiter(mut self, enabled: bool) -> Self {
        self.echo_limiter = enabled;
        self
    }

    pub fn with_initial_parameters(mut self, params: MediaParameters) -> Self {
        self.initial_parameters = params;
        self
    }

    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    /// Disable transition history
    pub fn without_history(mut self) -> Self {
        self.history.enabled = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.history.enabled && self.history.max_transitions == 0 {
            return Err(CallSessionError::config(
                "history.max_transitions must be greater than zero when history is enabled",
            ));
        }
        Ok(())
    }
}
