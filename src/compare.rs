// src/compare.rs
//! Agreement between measured and simulated activity timelines
//!
//! Measured EMG and simulated activations are usually sampled at different
//! rates. Both are mapped onto a common gait-cycle axis by nearest-sample
//! lookup before scoring.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::constants::comparison::DEFAULT_GAIT_POINTS;
use crate::error::{OnOffError, ProcessingStage, Result};
use crate::segmentation::ActivityTimeline;

/// Sample-by-sample confusion counts between two timelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementReport {
    pub samples: usize,
    /// Both ON
    pub true_on: usize,
    /// Both OFF
    pub true_off: usize,
    pub measured_only: usize,
    pub simulated_only: usize,
    /// `(true_on + true_off) / samples`
    pub matching_fraction: f64,
    /// Simulated first onset minus measured first onset, in samples
    pub onset_lag_samples: Option<i64>,
}

/// Pick `points` samples spread evenly from first to last
pub fn resample_nearest(states: &[bool], points: usize) -> Result<Vec<bool>> {
    if states.is_empty() || points == 0 {
        return Err(OnOffError::InsufficientData {
            stage: ProcessingStage::Comparison,
            required: 1,
            actual: states.len().min(points),
        });
    }
    if points == 1 {
        return Ok(vec![states[0]]);
    }

    let last = (states.len() - 1) as f64;
    let step = last / (points - 1) as f64;
    Ok((0..points)
        .map(|k| {
            let index = (k as f64 * step).round() as usize;
            states[index.min(states.len() - 1)]
        })
        .collect())
}

/// Score two equal-length state sequences
pub fn agreement(measured: &[bool], simulated: &[bool]) -> Result<AgreementReport> {
    if measured.len() != simulated.len() {
        return Err(OnOffError::LengthMismatch {
            stage: ProcessingStage::Comparison,
            left: measured.len(),
            right: simulated.len(),
        });
    }
    if measured.is_empty() {
        return Err(OnOffError::InsufficientData {
            stage: ProcessingStage::Comparison,
            required: 1,
            actual: 0,
        });
    }

    let mut report = AgreementReport {
        samples: measured.len(),
        true_on: 0,
        true_off: 0,
        measured_only: 0,
        simulated_only: 0,
        matching_fraction: 0.0,
        onset_lag_samples: None,
    };

    for (&m, &s) in measured.iter().zip(simulated) {
        match (m, s) {
            (true, true) => report.true_on += 1,
            (false, false) => report.true_off += 1,
            (true, false) => report.measured_only += 1,
            (false, true) => report.simulated_only += 1,
        }
    }

    report.matching_fraction = (report.true_on + report.true_off) as f64 / report.samples as f64;

    let measured_onset = measured.iter().position(|&s| s);
    let simulated_onset = simulated.iter().position(|&s| s);
    report.onset_lag_samples = match (measured_onset, simulated_onset) {
        (Some(m), Some(s)) => Some(s as i64 - m as i64),
        _ => None,
    };

    Ok(report)
}

/// Resample both timelines onto `points` gait-cycle samples and score them
pub fn compare_on_gait_cycle(
    measured: &ActivityTimeline,
    simulated: &ActivityTimeline,
    points: usize,
) -> Result<AgreementReport> {
    let measured = resample_nearest(measured, points)?;
    let simulated = resample_nearest(simulated, points)?;
    let report = agreement(&measured, &simulated)?;

    debug!(
        points,
        matching_fraction = report.matching_fraction,
        onset_lag = ?report.onset_lag_samples,
        "compared timelines over gait cycle"
    );
    Ok(report)
}

/// [`compare_on_gait_cycle`] at one point per percent of the cycle
pub fn compare_percent(measured: &ActivityTimeline, simulated: &ActivityTimeline) -> Result<AgreementReport> {
    compare_on_gait_cycle(measured, simulated, DEFAULT_GAIT_POINTS)
}
