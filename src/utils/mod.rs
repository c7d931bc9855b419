//! Common utility functions shared by conditioning and segmentation
//!
//! - Duration/sample-count conversion with round-half-to-even
//! - Sampling-rate validation
//! - Window statistics (mean, population standard deviation)

pub mod conversion;
pub mod stats;

pub use conversion::{
    frames_to_seconds,
    gait_cycle_axis,
    seconds_to_frames,
    validate_sampling_rate,
};

pub use stats::{mean, population_std};
