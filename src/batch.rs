// src/batch.rs
//! Parallel processing of many EMG channels
//!
//! Channels share one validated [`OnOffPipeline`] and are processed on the
//! rayon global pool. A failure in one channel is reported for that channel
//! only; configuration errors fail the whole batch before any work starts.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::OnOffConfig;
use crate::error::{OnOffError, Result};
use crate::pipeline::{ChannelActivity, OnOffPipeline};
use crate::segmentation::ActivityTimeline;

/// One named channel of raw samples, e.g. a single muscle
#[derive(Debug, Clone, PartialEq)]
pub struct NamedChannel {
    pub name: String,
    pub samples: Vec<f64>,
}

impl NamedChannel {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// Outcome for one channel, in input order
#[derive(Debug)]
pub struct ChannelOutcome<T> {
    pub name: String,
    pub result: std::result::Result<T, OnOffError>,
}

impl<T> ChannelOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Condition and segment every channel in parallel
pub fn process_channels(
    channels: &[NamedChannel],
    sf: f64,
    config: &OnOffConfig,
) -> Result<Vec<ChannelOutcome<ChannelActivity>>> {
    let pipeline = OnOffPipeline::new(config.clone(), sf)?;

    let outcomes: Vec<ChannelOutcome<ChannelActivity>> = channels
        .par_iter()
        .map(|channel| ChannelOutcome {
            name: channel.name.clone(),
            result: pipeline.process(&channel.samples),
        })
        .collect();

    log_summary(&outcomes);
    Ok(outcomes)
}

/// Segment already-conditioned envelopes (e.g. simulated activations) in parallel
pub fn segment_envelopes(
    envelopes: &[NamedChannel],
    sf: f64,
    config: &OnOffConfig,
) -> Result<Vec<ChannelOutcome<ActivityTimeline>>> {
    let pipeline = OnOffPipeline::new(config.clone(), sf)?;

    let outcomes: Vec<ChannelOutcome<ActivityTimeline>> = envelopes
        .par_iter()
        .map(|channel| ChannelOutcome {
            name: channel.name.clone(),
            result: pipeline.process_envelope(&channel.samples),
        })
        .collect();

    log_summary(&outcomes);
    Ok(outcomes)
}

fn log_summary<T>(outcomes: &[ChannelOutcome<T>]) {
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            warn!(channel = %outcome.name, error = %e, "channel failed");
        }
    }
    info!(
        channels = outcomes.len(),
        failed,
        "batch processing finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn channel(name: &str, len: usize, burst: std::ops::Range<usize>) -> NamedChannel {
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / 1000.0;
                if burst.contains(&i) {
                    (2.0 * PI * 90.0 * t).sin()
                } else {
                    0.0
                }
            })
            .collect();
        NamedChannel::new(name, samples)
    }

    #[test]
    fn test_outcomes_keep_input_order() {
        let channels: Vec<NamedChannel> = (0..8)
            .map(|k| channel(&format!("muscle_{}", k), 1200, 20..70))
            .collect();

        let outcomes = process_channels(&channels, 1000.0, &OnOffConfig::default()).unwrap();
        assert_eq!(outcomes.len(), 8);
        for (k, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.name, format!("muscle_{}", k));
            let activity = outcome.result.as_ref().unwrap();
            assert_eq!(activity.timeline.len(), 1200);
        }
    }

    #[test]
    fn test_failing_channel_is_isolated() {
        let channels = vec![
            channel("tibialis_anterior", 1000, 20..70),
            NamedChannel::new("truncated", vec![0.0; 50]),
        ];

        let outcomes = process_channels(&channels, 1000.0, &OnOffConfig::default()).unwrap();
        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(OnOffError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_invalid_config_fails_whole_batch() {
        let channels = vec![channel("vastus_lateralis", 1000, 20..70)];
        assert!(process_channels(&channels, 0.0, &OnOffConfig::default()).is_err());
    }

    #[test]
    fn test_segment_envelopes() {
        let mut activation = vec![0.0; 150];
        activation[0] = 0.05;
        activation[60..110].fill(0.8);
        let envelopes = vec![NamedChannel::new("gastrocnemius", activation)];

        let outcomes = segment_envelopes(&envelopes, 100.0, &OnOffConfig::default()).unwrap();
        let timeline = outcomes[0].result.as_ref().unwrap();
        assert_eq!(timeline.intervals().len(), 1);
    }
}
