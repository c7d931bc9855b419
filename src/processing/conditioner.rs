// src/processing/conditioner.rs
//! Raw EMG to envelope conditioning
//!
//! Stages run in a fixed order: offset removal, zero-phase Butterworth
//! filtering, rectification, centered moving-average smoothing.

use tracing::debug;

use super::filters::IirFilter;
use super::smoothing::moving_average;
use crate::config::ConditioningConfig;
use crate::error::{OnOffError, ProcessingStage, Result};
use crate::utils::stats::mean;

/// Stateless transform from a raw EMG channel to its amplitude envelope
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    config: ConditioningConfig,
    sf: f64,
    filter: IirFilter,
}

impl SignalConditioner {
    /// Validate the configuration and design the filter once for `sf`
    pub fn new(config: ConditioningConfig, sf: f64) -> Result<Self> {
        config.validate(sf)?;
        let filter = IirFilter::butterworth(
            config.filter_order,
            config.normalized_cutoff(sf),
            config.filter_kind.into(),
        )?;

        Ok(Self { config, sf, filter })
    }

    pub fn config(&self) -> &ConditioningConfig {
        &self.config
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sf
    }

    pub fn filter(&self) -> &IirFilter {
        &self.filter
    }

    /// Minimum input length accepted by [`SignalConditioner::condition`]
    pub fn min_input_len(&self) -> usize {
        self.config
            .offset_frames(self.sf)
            .max(self.filter.pad_length() + 1)
    }

    /// Produce a non-negative envelope with the same length as `raw`
    pub fn condition(&self, raw: &[f64]) -> Result<Vec<f64>> {
        let offset_frames = self.config.offset_frames(self.sf);
        if raw.len() < offset_frames {
            return Err(OnOffError::InsufficientData {
                stage: ProcessingStage::OffsetRemoval,
                required: offset_frames,
                actual: raw.len(),
            });
        }
        if raw.len() <= self.filter.pad_length() {
            return Err(OnOffError::InsufficientData {
                stage: ProcessingStage::Filtering,
                required: self.filter.pad_length() + 1,
                actual: raw.len(),
            });
        }

        let centered = self.remove_offset(raw, offset_frames);
        let filtered = self.filter.filtfilt(&centered)?;
        let rectified: Vec<f64> = filtered.iter().map(|x| x.abs()).collect();

        let window = self.config.smoothing_frames(self.sf);
        debug!(
            samples = raw.len(),
            offset_frames,
            smoothing_window = window,
            filter_order = self.filter.order(),
            "conditioned EMG channel"
        );
        Ok(moving_average(&rectified, window))
    }

    fn remove_offset(&self, raw: &[f64], offset_frames: usize) -> Vec<f64> {
        let baseline = mean(&raw[..offset_frames]).unwrap_or(0.0);
        raw.iter().map(|x| x - baseline).collect()
    }
}

/// One-shot conditioning with an ad-hoc configuration
pub fn condition(raw: &[f64], sf: f64, config: &ConditioningConfig) -> Result<Vec<f64>> {
    SignalConditioner::new(config.clone(), sf)?.condition(raw)
}
