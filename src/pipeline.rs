// src/pipeline.rs
//! Single-channel conditioning + segmentation pipeline

use tracing::debug;

use crate::config::OnOffConfig;
use crate::error::Result;
use crate::processing::SignalConditioner;
use crate::segmentation::{ActivitySegmenter, ActivityTimeline};

/// Envelope and on/off timeline of one channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelActivity {
    pub envelope: Vec<f64>,
    pub threshold: f64,
    pub timeline: ActivityTimeline,
}

/// Both processing stages built for one sampling rate
#[derive(Debug, Clone)]
pub struct OnOffPipeline {
    conditioner: SignalConditioner,
    segmenter: ActivitySegmenter,
}

impl OnOffPipeline {
    /// Validate `config` for `sf` and build both stages
    pub fn new(config: OnOffConfig, sf: f64) -> Result<Self> {
        let OnOffConfig {
            conditioning,
            segmentation,
        } = config;

        Ok(Self {
            conditioner: SignalConditioner::new(conditioning, sf)?,
            segmenter: ActivitySegmenter::new(segmentation, sf)?,
        })
    }

    pub fn conditioner(&self) -> &SignalConditioner {
        &self.conditioner
    }

    pub fn segmenter(&self) -> &ActivitySegmenter {
        &self.segmenter
    }

    pub fn sampling_rate(&self) -> f64 {
        self.segmenter.sampling_rate()
    }

    /// Condition a raw EMG channel, then segment its envelope
    pub fn process(&self, raw: &[f64]) -> Result<ChannelActivity> {
        let envelope = self.conditioner.condition(raw)?;
        let trace = self.segmenter.segment_with_trace(&envelope)?;

        debug!(
            samples = raw.len(),
            intervals = trace.timeline.intervals().len(),
            duty_cycle = trace.timeline.duty_cycle(),
            "processed channel"
        );

        Ok(ChannelActivity {
            envelope,
            threshold: trace.threshold,
            timeline: trace.timeline,
        })
    }

    /// Segment an already-conditioned envelope, e.g. a simulated activation
    pub fn process_envelope(&self, envelope: &[f64]) -> Result<ActivityTimeline> {
        self.segmenter.segment(envelope)
    }
}
