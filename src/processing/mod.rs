// src/processing/mod.rs
//! Signal conditioning for EMG envelopes

pub mod conditioner;
pub mod filters;
pub mod smoothing;

pub use conditioner::*;
pub use filters::{BandType, IirCoefficients, IirFilter};
pub use smoothing::moving_average;
