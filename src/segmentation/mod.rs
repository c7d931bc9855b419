// src/segmentation/mod.rs
//! Muscle on/off segmentation of amplitude envelopes

pub mod runs;
pub mod segmenter;
pub mod timeline;

pub use runs::{Run, RunLengthView};
pub use segmenter::*;
pub use timeline::{ActivityInterval, ActivityTimeline};
