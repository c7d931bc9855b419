//! EMG-OnOff: muscle activity timelines from surface EMG
//!
//! This library turns a continuously sampled EMG channel into a binary
//! "muscle active / inactive" timeline, for comparing measured muscle
//! activity with simulated activations over a gait cycle. It features:
//!
//! - Signal conditioning: offset removal, zero-phase Butterworth filtering,
//!   rectification and moving-average smoothing
//! - Adaptive-threshold segmentation with two-pass minimum-duration correction
//! - Activity intervals and gait-cycle agreement scoring
//! - Parallel processing of many channels
//! - Layered TOML configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_onoff::{OnOffConfig, OnOffPipeline};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sf = 1000.0;
//!     let raw: Vec<f64> = vec![0.0; 2000]; // one EMG channel
//!
//!     let pipeline = OnOffPipeline::new(OnOffConfig::default(), sf)?;
//!     let activity = pipeline.process(&raw)?;
//!
//!     for interval in activity.timeline.intervals() {
//!         println!(
//!             "active {:.3}s - {:.3}s",
//!             interval.start_time_s(sf),
//!             interval.end_time_s(sf)
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod batch;
pub mod compare;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod segmentation;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{ConditioningConfig, ConfigLoader, FilterKind, OnOffConfig, SegmentationConfig};
pub use error::{OnOffError, ProcessingStage, Result};
pub use pipeline::{ChannelActivity, OnOffPipeline};
pub use processing::{condition, SignalConditioner};
pub use segmentation::{
    segment, ActivityInterval, ActivitySegmenter, ActivityTimeline, Run, RunLengthView,
    SegmentationTrace,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
