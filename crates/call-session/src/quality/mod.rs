//! Call quality rating
//!
//! The media layer feeds a [`QualityMonitor`] with ratings on a 0..=5 scale
//! roughly every five seconds:
//!
//! | rating | meaning |
//! |--------|---------|
//! | 4-5    | good |
//! | 3-4    | average |
//! | 2-3    | poor |
//! | 1-2    | very poor |
//! | 0-1    | mostly unusable |
//!
//! The monitor keeps the latest rating and a running mean over the whole
//! call. It stores no history and imposes no sampling interval.

pub mod rating;

pub use rating::{rate, QualityReport};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{Result, UsageError};

/// Rating reported by callers that need the numeric "no measurement" value
pub const QUALITY_UNAVAILABLE: f32 = -1.0;

/// Upper bound of the rating scale
pub const MAX_QUALITY: f32 = 5.0;

/// One measurement from the media layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QualitySample {
    /// Rating in 0..=5
    Rating(f32),
    /// No measurement, e.g. the stream is not active yet
    Unavailable,
}

impl QualitySample {
    /// Interpret a raw value where any negative number or NaN means "unavailable"
    pub fn from_raw(value: f32) -> Self {
        if value.is_nan() || value < 0.0 {
            QualitySample::Unavailable
        } else {
            QualitySample::Rating(value)
        }
    }
}

impl From<f32> for QualitySample {
    fn from(value: f32) -> Self {
        Self::from_raw(value)
    }
}

/// Point-in-time view of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualitySnapshot {
    pub current: Option<f32>,
    pub average: Option<f32>,
    pub sample_count: u64,
}

impl QualitySnapshot {
    pub fn current_or_sentinel(&self) -> f32 {
        self.current.unwrap_or(QUALITY_UNAVAILABLE)
    }

    pub fn average_or_sentinel(&self) -> f32 {
        self.average.unwrap_or(QUALITY_UNAVAILABLE)
    }
}

#[derive(Debug, Default)]
struct QualityState {
    current: Option<f32>,
    average: f64,
    sample_count: u64,
    last_report: Option<QualityReport>,
}

/// Streaming quality tracker: last rating plus incremental mean
#[derive(Debug, Default)]
pub struct QualityMonitor {
    state: Mutex<QualityState>,
}

impl QualityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sample into the monitor.
    ///
    /// Returns `Ok(true)` when the sample was counted and `Ok(false)` when it
    /// was an unavailable marker and got dropped. Ratings outside 0..=5 are
    /// rejected and leave the monitor unchanged.
    pub fn ingest(&self, sample: impl Into<QualitySample>) -> Result<bool> {
        let value = match sample.into() {
            QualitySample::Unavailable => {
                debug!("Dropping unavailable quality sample");
                return Ok(false);
            }
            QualitySample::Rating(value) => value,
        };

        if !(0.0..=MAX_QUALITY).contains(&value) {
            warn!("Rejecting quality sample {} outside 0..={}", value, MAX_QUALITY);
            return Err(UsageError::QualityOutOfRange(value).into());
        }

        let mut state = self.state.lock();
        let count = state.sample_count as f64;
        state.average += (value as f64 - state.average) / (count + 1.0);
        state.sample_count += 1;
        state.current = Some(value);
        debug!(
            "Quality sample {:.2} folded, average {:.3} over {} samples",
            value, state.average, state.sample_count
        );
        Ok(true)
    }

    /// Derive a rating from transport statistics and ingest it
    ///
    /// The report is kept as the latest transport statistics even when it
    /// yields no rating.
    pub fn ingest_report(&self, report: &QualityReport) -> Result<bool> {
        self.state.lock().last_report = Some(*report);
        self.ingest(rate(report))
    }

    /// Statistics from the most recent report
    pub fn last_report(&self) -> Option<QualityReport> {
        self.state.lock().last_report
    }

    /// Last valid rating, `None` until one arrives
    pub fn current_quality(&self) -> Option<f32> {
        self.state.lock().current
    }

    /// Mean of every valid rating, `None` until one arrives
    pub fn average_quality(&self) -> Option<f32> {
        let state = self.state.lock();
        (state.sample_count > 0).then_some(state.average as f32)
    }

    pub fn sample_count(&self) -> u64 {
        self.state.lock().sample_count
    }

    /// Read current, average and count under one lock
    pub fn snapshot(&self) -> QualitySnapshot {
        let state = self.state.lock();
        QualitySnapshot {
            current: state.current,
            average: (state.sample_count > 0).then_some(state.average as f32),
            sample_count: state.sample_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_monitor() {
        let monitor = QualityMonitor::new();
        assert_eq!(monitor.current_quality(), None);
        assert_eq!(monitor.average_quality(), None);
        assert_eq!(monitor.snapshot().current_or_sentinel(), QUALITY_UNAVAILABLE);
        assert_eq!(monitor.sample_count(), 0);
    }

    #[test]
    fn test_running_mean() {
        let monitor = QualityMonitor::new();
        for s in [4.5f32, 4.0, 3.5] {
            assert!(monitor.ingest(s).unwrap());
        }
        assert_eq!(monitor.current_quality(), Some(3.5));
        let avg = monitor.average_quality().unwrap();
        assert!((avg - 4.0).abs() < 1e-6);
        assert_eq!(monitor.sample_count(), 3);
    }

    #[test]
    fn test_unavailable_samples_are_dropped() {
        let monitor = QualityMonitor::new();
        monitor.ingest(2.0f32).unwrap();
        assert!(!monitor.ingest(QualitySample::Unavailable).unwrap());
        assert!(!monitor.ingest(-1.0f32).unwrap());
        assert_eq!(monitor.current_quality(), Some(2.0));
        assert_eq!(monitor.average_quality(), Some(2.0));
        assert_eq!(monitor.sample_count(), 1);
    }

    #[test]
    fn test_last_report_kept() {
        let monitor = QualityMonitor::new();
        assert_eq!(monitor.last_report(), None);

        let idle = QualityReport::new(0, 0.0, 0.0);
        assert!(!monitor.ingest_report(&idle).unwrap());
        assert_eq!(monitor.last_report(), Some(idle));
        assert_eq!(monitor.sample_count(), 0);

        let busy = QualityReport::new(800, 0.02, 12.0).with_round_trip(90.0);
        assert!(monitor.ingest_report(&busy).unwrap());
        assert_eq!(monitor.last_report(), Some(busy));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let monitor = QualityMonitor::new();
        monitor.ingest(3.0f32).unwrap();
        let err = monitor.ingest(5.5f32).unwrap_err();
        assert!(err.is_usage_error());
        assert_eq!(monitor.current_quality(), Some(3.0));
        assert_eq!(monitor.sample_count(), 1);
    }

    #[test]
    fn test_zero_is_a_valid_rating() {
        let monitor = QualityMonitor::new();
        monitor.ingest(0.0f32).unwrap();
        assert_eq!(monitor.current_quality(), Some(0.0));
        assert_eq!(monitor.average_quality(), Some(0.0));
    }
}
