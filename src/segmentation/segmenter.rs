// src/segmentation/segmenter.rs
//! Adaptive-threshold on/off segmentation with minimum-duration correction
//!
//! The threshold is a multiple of the standard deviation of a leading resting
//! window. Raw threshold crossings are then corrected in two passes over the
//! run-length view:
//!
//! 1. OFF runs shorter than `min_off_frames` are turned ON (gap closing).
//! 2. On the result of pass 1, ON runs shorter than `min_on_frames` are turned
//!    OFF (burst removal).
//!
//! The passes do not commute. Pass 2 must see the runs produced by pass 1.

use tracing::{debug, warn};

use super::runs::RunLengthView;
use super::timeline::ActivityTimeline;
use crate::config::SegmentationConfig;
use crate::error::{OnOffError, ProcessingStage, Result};
use crate::utils::stats::population_std;

/// Intermediate sequences of one segmentation, for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationTrace {
    pub threshold: f64,
    /// `amplitude > threshold` before any correction
    pub raw: Vec<bool>,
    /// After gap closing, before burst removal
    pub after_gap_closing: Vec<bool>,
    pub gaps_closed: usize,
    pub bursts_discarded: usize,
    pub timeline: ActivityTimeline,
}

/// Converts an amplitude sequence into an [`ActivityTimeline`]
#[derive(Debug, Clone)]
pub struct ActivitySegmenter {
    config: SegmentationConfig,
    sf: f64,
    min_on_frames: usize,
    min_off_frames: usize,
}

impl ActivitySegmenter {
    pub fn new(config: SegmentationConfig, sf: f64) -> Result<Self> {
        config.validate(sf)?;
        Ok(Self {
            min_on_frames: config.min_on_frames(sf),
            min_off_frames: config.min_off_frames(sf),
            config,
            sf,
        })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sf
    }

    pub fn min_on_frames(&self) -> usize {
        self.min_on_frames
    }

    pub fn min_off_frames(&self) -> usize {
        self.min_off_frames
    }

    /// Activation threshold from the resting window at the start of `amplitude`
    pub fn threshold(&self, amplitude: &[f64]) -> Result<f64> {
        self.check_input(amplitude)?;
        Ok(self.baseline_threshold(amplitude))
    }

    /// Segment `amplitude` into a corrected on/off timeline
    pub fn segment(&self, amplitude: &[f64]) -> Result<ActivityTimeline> {
        Ok(self.segment_with_trace(amplitude)?.timeline)
    }

    /// Segment and keep every intermediate sequence
    pub fn segment_with_trace(&self, amplitude: &[f64]) -> Result<SegmentationTrace> {
        self.check_input(amplitude)?;

        let threshold = self.baseline_threshold(amplitude);
        if threshold == 0.0 {
            warn!("resting window has zero variance, any positive sample counts as active");
        }

        let raw: Vec<bool> = amplitude.iter().map(|&x| x > threshold).collect();

        let (closed, gaps_closed) = self.close_short_gaps(&RunLengthView::from_states(&raw));
        let after_gap_closing = closed.to_states();
        let (final_view, bursts_discarded) = self.discard_short_bursts(&closed);

        debug!(
            samples = amplitude.len(),
            threshold,
            min_on_frames = self.min_on_frames,
            min_off_frames = self.min_off_frames,
            gaps_closed,
            bursts_discarded,
            "segmented activity"
        );

        Ok(SegmentationTrace {
            threshold,
            raw,
            after_gap_closing,
            gaps_closed,
            bursts_discarded,
            timeline: ActivityTimeline::new(final_view.to_states(), self.sf),
        })
    }

    /// Pass A: turn OFF runs shorter than `min_off_frames` ON
    pub fn close_short_gaps(&self, view: &RunLengthView) -> (RunLengthView, usize) {
        view.flip_short_runs(false, self.min_off_frames)
    }

    /// Pass B: turn ON runs shorter than `min_on_frames` OFF
    pub fn discard_short_bursts(&self, view: &RunLengthView) -> (RunLengthView, usize) {
        view.flip_short_runs(true, self.min_on_frames)
    }

    /// Both correction passes in their required order
    pub fn apply_passes(&self, states: &[bool]) -> Vec<bool> {
        let (closed, _) = self.close_short_gaps(&RunLengthView::from_states(states));
        let (corrected, _) = self.discard_short_bursts(&closed);
        corrected.to_states()
    }

    /// Burst removal before gap closing. Diagnostic only; this order loses
    /// bursts that gap closing would have joined.
    pub fn apply_passes_reversed(&self, states: &[bool]) -> Vec<bool> {
        let (discarded, _) = self.discard_short_bursts(&RunLengthView::from_states(states));
        let (corrected, _) = self.close_short_gaps(&discarded);
        corrected.to_states()
    }

    fn check_input(&self, amplitude: &[f64]) -> Result<()> {
        let len = amplitude.len();
        if len < self.min_on_frames && len < self.min_off_frames {
            return Err(OnOffError::invalid_parameter(
                "amplitude.len",
                len as f64,
                format!(
                    "sequence is shorter than both minimum durations ({} on, {} off samples)",
                    self.min_on_frames, self.min_off_frames
                ),
            ));
        }

        let window = self.config.baseline_window_samples;
        if len < window {
            return Err(OnOffError::InsufficientData {
                stage: ProcessingStage::Thresholding,
                required: window,
                actual: len,
            });
        }
        Ok(())
    }

    fn baseline_threshold(&self, amplitude: &[f64]) -> f64 {
        let window = &amplitude[..self.config.baseline_window_samples];
        population_std(window).unwrap_or(0.0) * self.config.thres_sd_factor
    }
}

/// One-shot segmentation with an ad-hoc configuration
pub fn segment(amplitude: &[f64], sf: f64, config: &SegmentationConfig) -> Result<ActivityTimeline> {
    ActivitySegmenter::new(config.clone(), sf)?.segment(amplitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter(sf: f64) -> ActivitySegmenter {
        ActivitySegmenter::new(SegmentationConfig::default(), sf).unwrap()
    }

    /// 1.0 inside the listed ranges, 0.0 elsewhere
    fn blocks(len: usize, on: &[std::ops::Range<usize>]) -> Vec<f64> {
        let mut amplitude = vec![0.0; len];
        for range in on {
            amplitude[range.clone()].fill(1.0);
        }
        amplitude
    }

    #[test]
    fn test_frame_counts() {
        let seg = segmenter(1000.0);
        assert_eq!(seg.min_on_frames(), 50);
        assert_eq!(seg.min_off_frames(), 25);
    }

    #[test]
    fn test_threshold_uses_resting_window() {
        let seg = segmenter(1000.0);
        let mut amplitude: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        amplitude.extend(std::iter::repeat(10.0).take(100));

        let threshold = seg.threshold(&amplitude).unwrap();
        assert!((threshold - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_short_gap_closed() {
        let seg = segmenter(1000.0);
        let amplitude = blocks(400, &[0..200, 210..400]);
        let trace = seg.segment_with_trace(&amplitude).unwrap();

        assert_eq!(trace.threshold, 0.0);
        assert_eq!(trace.gaps_closed, 1);
        assert_eq!(trace.bursts_discarded, 0);
        assert!(trace.after_gap_closing.iter().all(|&s| s));
        assert!(trace.timeline.iter().all(|&s| s));
    }

    #[test]
    fn test_short_burst_removed() {
        let seg = segmenter(1000.0);
        let amplitude = blocks(400, &[100..120]);
        let trace = seg.segment_with_trace(&amplitude).unwrap();

        assert_eq!(trace.raw.iter().filter(|&&s| s).count(), 20);
        assert_eq!(trace.gaps_closed, 0);
        assert_eq!(trace.bursts_discarded, 1);
        assert!(trace.timeline.iter().all(|&s| !s));
    }

    #[test]
    fn test_long_burst_kept() {
        let seg = segmenter(1000.0);
        let timeline = seg.segment(&blocks(400, &[150..250])).unwrap();
        assert_eq!(timeline.intervals().len(), 1);
        assert_eq!(timeline.intervals()[0].start, 150);
        assert_eq!(timeline.intervals()[0].end, 250);
    }

    #[test]
    fn test_pass_order_is_not_commutative() {
        let seg = segmenter(1000.0);
        // Two 30-sample bursts separated by a 10-sample gap
        let amplitude = blocks(400, &[100..130, 140..170]);
        let raw: Vec<bool> = amplitude.iter().map(|&x| x > 0.0).collect();

        let forward = seg.apply_passes(&raw);
        let reversed = seg.apply_passes_reversed(&raw);

        assert_eq!(forward.iter().filter(|&&s| s).count(), 70);
        assert!(forward[100..170].iter().all(|&s| s));
        assert!(reversed.iter().all(|&s| !s));
        assert_ne!(forward, reversed);

        assert_eq!(seg.segment(&amplitude).unwrap().states(), forward.as_slice());
    }

    #[test]
    fn test_idle_signal_is_off() {
        let seg = segmenter(1000.0);
        let mut amplitude: Vec<f64> = (0..100).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
        amplitude.extend(std::iter::repeat(0.0).take(900));

        let timeline = seg.segment(&amplitude).unwrap();
        assert_eq!(timeline.len(), 1000);
        assert!(timeline.iter().all(|&s| !s));
    }

    #[test]
    fn test_all_zero_signal_is_off() {
        let seg = segmenter(1000.0);
        let timeline = seg.segment(&[0.0; 500]).unwrap();
        assert!(timeline.iter().all(|&s| !s));
    }

    #[test]
    fn test_insufficient_baseline() {
        let seg = segmenter(1000.0);
        assert!(matches!(
            seg.segment(&[0.0; 99]),
            Err(OnOffError::InsufficientData {
                stage: ProcessingStage::Thresholding,
                required: 100,
                actual: 99
            })
        ));
    }

    #[test]
    fn test_shorter_than_both_windows() {
        let seg = segmenter(1000.0);
        assert!(matches!(
            seg.segment(&[0.0; 20]),
            Err(OnOffError::InvalidParameter { parameter: "amplitude.len", .. })
        ));
        assert!(seg.segment(&[]).is_err());
    }

    #[test]
    fn test_configurable_baseline_window() {
        let config = SegmentationConfig {
            baseline_window_samples: 10,
            ..Default::default()
        };
        // 100 Hz: min on 5, min off 2 (0.025 * 100 = 2.5 rounds to even)
        let seg = ActivitySegmenter::new(config, 100.0).unwrap();
        assert_eq!(seg.min_off_frames(), 2);
        let timeline = seg.segment(&blocks(40, &[20..30])).unwrap();
        assert_eq!(timeline.intervals().len(), 1);
    }

    #[test]
    fn test_invalid_config() {
        let config = SegmentationConfig {
            msd_off_s: 0.0,
            ..Default::default()
        };
        assert!(ActivitySegmenter::new(config, 1000.0).is_err());
        assert!(ActivitySegmenter::new(SegmentationConfig::default(), -5.0).is_err());
    }
}
