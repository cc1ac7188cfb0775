use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CallDirection, CallState, EndReason, PeerAddress, SessionId};

/// Call log entry produced from a session; storage is up to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSummary {
    pub session_id: SessionId,
    pub direction: CallDirection,
    pub peer: PeerAddress,
    pub state: CallState,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub average_quality: Option<f32>,
    pub authentication_verified: bool,
    pub end_reason: Option<EndReason>,
}
