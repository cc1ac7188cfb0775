//! Rating derived from RTP/RTCP transport statistics
//!
//! A deliberately small model: start from a perfect 5 and subtract
//! independent penalties for packet loss, jitter above a 20 ms budget and
//! round-trip time above 150 ms. The result is clamped to 0..=5.

use serde::{Deserialize, Serialize};

use super::{QualitySample, MAX_QUALITY};

/// Rating lost per percent of packet loss
const LOSS_PENALTY_PER_PERCENT: f32 = 0.2;
const MAX_LOSS_PENALTY: f32 = 4.0;

/// Jitter absorbed by a typical playout buffer
const JITTER_BUDGET_MS: f32 = 20.0;
const JITTER_PENALTY_SPAN_MS: f32 = 40.0;
const MAX_JITTER_PENALTY: f32 = 1.5;

/// ITU-T G.114 comfort limit for one-way delay, applied to the round trip
const RTT_BUDGET_MS: f32 = 150.0;
const RTT_PENALTY_SPAN_MS: f32 = 200.0;
const MAX_RTT_PENALTY: f32 = 1.5;

/// Receiver statistics for one reporting interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Packets received during the interval; zero means the stream is idle
    pub packets_received: u64,
    /// Fraction of packets lost, 0.0..=1.0
    pub packet_loss_ratio: f32,
    /// Interarrival jitter in milliseconds
    pub jitter_ms: f32,
    /// Round-trip time from RTCP SR/RR, when known
    pub round_trip_ms: Option<f32>,
}

impl QualityReport {
    pub fn new(packets_received: u64, packet_loss_ratio: f32, jitter_ms: f32) -> Self {
        Self {
            packets_received,
            packet_loss_ratio,
            jitter_ms,
            round_trip_ms: None,
        }
    }

    pub fn with_round_trip(mut self, round_trip_ms: f32) -> Self {
        self.round_trip_ms = Some(round_trip_ms);
        self
    }
}

/// Turn a transport report into a quality sample
pub fn rate(report: &QualityReport) -> QualitySample {
    if report.packets_received == 0
        || report.packet_loss_ratio.is_nan()
        || report.jitter_ms.is_nan()
    {
        return QualitySample::Unavailable;
    }

    let loss_percent = report.packet_loss_ratio.clamp(0.0, 1.0) * 100.0;
    let loss_penalty = (loss_percent * LOSS_PENALTY_PER_PERCENT).min(MAX_LOSS_PENALTY);

    let jitter_penalty = ((report.jitter_ms - JITTER_BUDGET_MS) / JITTER_PENALTY_SPAN_MS)
        .clamp(0.0, MAX_JITTER_PENALTY);

    let rtt_penalty = report
        .round_trip_ms
        .filter(|rtt| !rtt.is_nan())
        .map(|rtt| ((rtt - RTT_BUDGET_MS) / RTT_PENALTY_SPAN_MS).clamp(0.0, MAX_RTT_PENALTY))
        .unwrap_or(0.0);

    let rating = (MAX_QUALITY - loss_penalty - jitter_penalty - rtt_penalty).clamp(0.0, MAX_QUALITY);
    QualitySample::Rating(rating)
}
