// src/processing/filters/mod.rs
//! Digital filters for EMG signal conditioning

pub mod iir;

pub use iir::*;

use serde::{Deserialize, Serialize};

use crate::config::FilterKind;

/// Pass band of a Butterworth design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandType {
    Lowpass,
    Highpass,
}

impl From<FilterKind> for BandType {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::High => BandType::Highpass,
            FilterKind::Low => BandType::Lowpass,
        }
    }
}

/// Transfer-function coefficients, normalized so that `a[0] == 1`
#[derive(Debug, Clone, PartialEq)]
pub struct IirCoefficients {
    pub b: Vec<f64>, // Numerator coefficients
    pub a: Vec<f64>, // Denominator coefficients
}

impl IirCoefficients {
    /// Number of taps once `b` and `a` are padded to equal length
    pub fn taps(&self) -> usize {
        self.b.len().max(self.a.len())
    }
}
