//! Time/sample conversions for EMG recordings
//!
//! Durations are converted to sample counts with round-half-to-even so that
//! e.g. 0.5 s at 5 Hz gives 2 frames, not 3.

use crate::config::constants::comparison::GAIT_CYCLE_PERCENT_MAX;
use crate::error::{OnOffError, Result};

/// Reject zero, negative and non-finite sampling frequencies
pub fn validate_sampling_rate(sf: f64) -> Result<()> {
    if !sf.is_finite() || sf <= 0.0 {
        return Err(OnOffError::invalid_parameter(
            "sf",
            sf,
            "sampling frequency must be positive and finite",
        ));
    }
    Ok(())
}

/// Convert a duration in seconds to a whole number of samples
pub fn seconds_to_frames(seconds: f64, sf: f64) -> usize {
    let frames = (seconds * sf).round_ties_even();
    if frames.is_finite() && frames > 0.0 {
        frames as usize
    } else {
        0
    }
}

/// Convert a sample count back to seconds
pub fn frames_to_seconds(frames: usize, sf: f64) -> f64 {
    frames as f64 / sf
}

/// `n` evenly spaced points from 0 to 100 percent of the gait cycle
pub fn gait_cycle_axis(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = GAIT_CYCLE_PERCENT_MAX / (n - 1) as f64;
            (0..n).map(|i| i as f64 * step).collect()
        }
    }
}
