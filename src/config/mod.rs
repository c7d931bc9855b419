// src/config/mod.rs
//! Configuration for EMG conditioning and on/off segmentation
//!
//! All structures deserialize from partial TOML: any missing field falls back
//! to the defaults in [`constants`].

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

use crate::error::{OnOffError, Result};
use crate::utils::conversion::{seconds_to_frames, validate_sampling_rate};

/// Complete on/off pipeline configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct OnOffConfig {
    #[serde(default)]
    pub conditioning: ConditioningConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
}

/// Which side of the cutoff the Butterworth filter passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    High,
    Low,
}

/// Parameters for turning raw EMG into an envelope
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConditioningConfig {
    #[serde(default = "defaults::time4offset_s")]
    pub time4offset_s: f64,

    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    #[serde(default = "defaults::filter_cutoff_hz")]
    pub filter_cutoff_hz: f64,

    #[serde(default = "defaults::filter_kind")]
    pub filter_kind: FilterKind,

    #[serde(default = "defaults::time4smoothing_s")]
    pub time4smoothing_s: f64,
}

/// Parameters for thresholding and run-length correction
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SegmentationConfig {
    #[serde(default = "defaults::thres_sd_factor")]
    pub thres_sd_factor: f64,

    /// Fixed sample count regardless of sampling rate.
    /// See [`SegmentationConfig::with_baseline_duration`] for a rate-scaled window.
    #[serde(default = "defaults::baseline_window_samples")]
    pub baseline_window_samples: usize,

    #[serde(default = "defaults::msd_on_s")]
    pub msd_on_s: f64,

    #[serde(default = "defaults::msd_off_s")]
    pub msd_off_s: f64,
}

mod defaults {
    use super::FilterKind;
    use crate::config::constants::*;

    pub fn time4offset_s() -> f64 { conditioning::DEFAULT_TIME4OFFSET_S }
    pub fn filter_order() -> usize { conditioning::DEFAULT_FILTER_ORDER }
    pub fn filter_cutoff_hz() -> f64 { conditioning::DEFAULT_FILTER_CUTOFF_HZ }
    pub fn filter_kind() -> FilterKind { FilterKind::High }
    pub fn time4smoothing_s() -> f64 { conditioning::DEFAULT_TIME4SMOOTHING_S }

    pub fn thres_sd_factor() -> f64 { segmentation::DEFAULT_THRES_SD_FACTOR }
    pub fn baseline_window_samples() -> usize { segmentation::DEFAULT_BASELINE_WINDOW_SAMPLES }
    pub fn msd_on_s() -> f64 { segmentation::DEFAULT_MSD_ON_S }
    pub fn msd_off_s() -> f64 { segmentation::DEFAULT_MSD_OFF_S }
}

impl Default for ConditioningConfig {
    fn default() -> Self {
        Self {
            time4offset_s: defaults::time4offset_s(),
            filter_order: defaults::filter_order(),
            filter_cutoff_hz: defaults::filter_cutoff_hz(),
            filter_kind: defaults::filter_kind(),
            time4smoothing_s: defaults::time4smoothing_s(),
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            thres_sd_factor: defaults::thres_sd_factor(),
            baseline_window_samples: defaults::baseline_window_samples(),
            msd_on_s: defaults::msd_on_s(),
            msd_off_s: defaults::msd_off_s(),
        }
    }
}

fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(OnOffError::invalid_parameter(
            parameter,
            value,
            "must be a positive finite number",
        ));
    }
    Ok(())
}

impl ConditioningConfig {
    /// Check every parameter against the sampling rate it will be used with
    pub fn validate(&self, sf: f64) -> Result<()> {
        validate_sampling_rate(sf)?;
        require_positive("time4offset_s", self.time4offset_s)?;
        require_positive("time4smoothing_s", self.time4smoothing_s)?;

        if self.offset_frames(sf) == 0 {
            return Err(OnOffError::invalid_parameter(
                "time4offset_s",
                self.time4offset_s,
                format!("rounds to zero samples at {} Hz", sf),
            ));
        }

        if self.filter_order < filters::MIN_FILTER_ORDER
            || self.filter_order > filters::MAX_FILTER_ORDER
        {
            return Err(OnOffError::invalid_filter(format!(
                "order must be {}-{}, got {}",
                filters::MIN_FILTER_ORDER,
                filters::MAX_FILTER_ORDER,
                self.filter_order
            )));
        }

        let wn = self.normalized_cutoff(sf);
        if !(wn > 0.0 && wn < 1.0) {
            return Err(OnOffError::invalid_filter(format!(
                "normalized cutoff 2*{}/{} = {} is outside (0, 1)",
                self.filter_cutoff_hz, sf, wn
            )));
        }

        Ok(())
    }

    /// Samples averaged for the DC offset
    pub fn offset_frames(&self, sf: f64) -> usize {
        seconds_to_frames(self.time4offset_s, sf)
    }

    /// Moving-average width, never below one sample
    pub fn smoothing_frames(&self, sf: f64) -> usize {
        seconds_to_frames(self.time4smoothing_s, sf).max(conditioning::MIN_SMOOTHING_WINDOW)
    }

    /// Cutoff as a fraction of the Nyquist frequency
    pub fn normalized_cutoff(&self, sf: f64) -> f64 {
        2.0 * self.filter_cutoff_hz / sf
    }
}

impl SegmentationConfig {
    /// Resting window expressed as a duration instead of a fixed sample count
    pub fn with_baseline_duration(mut self, seconds: f64, sf: f64) -> Self {
        self.baseline_window_samples = seconds_to_frames(seconds, sf);
        self
    }

    pub fn validate(&self, sf: f64) -> Result<()> {
        validate_sampling_rate(sf)?;
        require_positive("thres_sd_factor", self.thres_sd_factor)?;
        require_positive("msd_on_s", self.msd_on_s)?;
        require_positive("msd_off_s", self.msd_off_s)?;

        if self.baseline_window_samples == 0 {
            return Err(OnOffError::invalid_parameter(
                "baseline_window_samples",
                0.0,
                "resting window must contain at least one sample",
            ));
        }
        Ok(())
    }

    pub fn min_on_frames(&self, sf: f64) -> usize {
        seconds_to_frames(self.msd_on_s, sf)
    }

    pub fn min_off_frames(&self, sf: f64) -> usize {
        seconds_to_frames(self.msd_off_s, sf)
    }
}

impl OnOffConfig {
    /// Validate both stages for a given sampling rate
    pub fn validate(&self, sf: f64) -> Result<()> {
        self.conditioning.validate(sf)?;
        self.segmentation.validate(sf)
    }

    /// Collect every problem instead of stopping at the first one
    pub fn validate_consistency(&self, sf: f64) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.conditioning.validate(sf) {
            errors.push(e.to_string());
        }
        if let Err(e) = self.segmentation.validate(sf) {
            errors.push(e.to_string());
        }

        // The smoothing window should not swallow the shortest burst we keep
        if errors.is_empty()
            && self.conditioning.smoothing_frames(sf) > 2 * self.segmentation.min_on_frames(sf)
        {
            errors.push(format!(
                "smoothing window ({} samples) is more than twice the minimum on-duration ({} samples)",
                self.conditioning.smoothing_frames(sf),
                self.segmentation.min_on_frames(sf)
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
