// src/error.rs
//! Unified error handling for EMG on/off detection
//!
//! Every fallible operation in the crate returns [`OnOffError`]. Errors are
//! raised before any computation starts, so a failed call never produces a
//! partially processed or zero-filled sequence.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, OnOffError>;

/// Processing stages for error tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStage {
    /// Baseline offset removal
    OffsetRemoval,
    /// Zero-phase Butterworth filtering
    Filtering,
    /// Moving-average envelope smoothing
    Smoothing,
    /// Resting-baseline threshold estimation
    Thresholding,
    /// Minimum-duration run correction
    RunCorrection,
    /// Timeline comparison
    Comparison,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStage::OffsetRemoval => "offset removal",
            ProcessingStage::Filtering => "filtering",
            ProcessingStage::Smoothing => "smoothing",
            ProcessingStage::Thresholding => "thresholding",
            ProcessingStage::RunCorrection => "run correction",
            ProcessingStage::Comparison => "comparison",
        };
        f.write_str(name)
    }
}

/// Error type for the whole conditioning and segmentation pipeline
#[derive(Debug, Error)]
pub enum OnOffError {
    /// Sequence shorter than a fixed window the stage needs
    #[error("insufficient data for {stage}: need at least {required} samples, got {actual}")]
    InsufficientData {
        stage: ProcessingStage,
        required: usize,
        actual: usize,
    },

    /// Filter design parameters out of range
    #[error("invalid filter parameter: {reason}")]
    InvalidFilterParameter { reason: String },

    /// Sampling frequency, duration or factor out of range
    #[error("invalid parameter '{parameter}' = {value}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: String,
    },

    /// Two sequences that must align have different lengths
    #[error("length mismatch in {stage}: {left} vs {right}")]
    LengthMismatch {
        stage: ProcessingStage,
        left: usize,
        right: usize,
    },

    /// Configuration loading failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OnOffError {
    pub(crate) fn invalid_parameter(
        parameter: &'static str,
        value: f64,
        reason: impl Into<String>,
    ) -> Self {
        OnOffError::InvalidParameter {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_filter(reason: impl Into<String>) -> Self {
        OnOffError::InvalidFilterParameter {
            reason: reason.into(),
        }
    }

    /// Stage the error was raised in, when it belongs to one
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            OnOffError::InsufficientData { stage, .. } => Some(*stage),
            OnOffError::LengthMismatch { stage, .. } => Some(*stage),
            OnOffError::InvalidFilterParameter { .. } => Some(ProcessingStage::Filtering),
            OnOffError::InvalidParameter { .. } | OnOffError::Config(_) => None,
        }
    }
}
