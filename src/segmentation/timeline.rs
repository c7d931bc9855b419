// src/segmentation/timeline.rs
//! Final on/off timeline and the activity intervals derived from it

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::runs::RunLengthView;
use crate::utils::conversion::frames_to_seconds;

/// Contiguous window of muscle activity, `[start, end)` in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInterval {
    pub start: usize,
    pub end: usize,
}

impl ActivityInterval {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn start_time_s(&self, sf: f64) -> f64 {
        frames_to_seconds(self.start, sf)
    }

    pub fn end_time_s(&self, sf: f64) -> f64 {
        frames_to_seconds(self.end, sf)
    }

    pub fn duration_s(&self, sf: f64) -> f64 {
        frames_to_seconds(self.len(), sf)
    }
}

/// Muscle on/off state per sample, tagged with its sampling rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTimeline {
    states: Vec<bool>,
    sf: f64,
}

impl ActivityTimeline {
    pub fn new(states: Vec<bool>, sf: f64) -> Self {
        Self { states, sf }
    }

    pub fn states(&self) -> &[bool] {
        &self.states
    }

    pub fn into_states(self) -> Vec<bool> {
        self.states
    }

    pub fn sampling_rate(&self) -> f64 {
        self.sf
    }

    pub fn duration_s(&self) -> f64 {
        frames_to_seconds(self.states.len(), self.sf)
    }

    pub fn runs(&self) -> RunLengthView {
        RunLengthView::from_states(&self.states)
    }

    /// Every ON run as an interval
    pub fn intervals(&self) -> Vec<ActivityInterval> {
        self.runs()
            .runs_of(true)
            .map(|run| ActivityInterval {
                start: run.start,
                end: run.end(),
            })
            .collect()
    }

    /// Rebuild a timeline of `len` samples from intervals
    pub fn from_intervals(intervals: &[ActivityInterval], len: usize, sf: f64) -> Self {
        let mut states = vec![false; len];
        for interval in intervals {
            let end = interval.end.min(len);
            if interval.start < end {
                states[interval.start..end].fill(true);
            }
        }
        Self::new(states, sf)
    }

    /// Copy with the first and last samples forced OFF so that every
    /// activity window has a falling and rising edge inside the sequence
    pub fn with_closed_boundaries(&self) -> Self {
        let mut states = self.states.clone();
        if let Some(first) = states.first_mut() {
            *first = false;
        }
        if let Some(last) = states.last_mut() {
            *last = false;
        }
        Self::new(states, self.sf)
    }

    pub fn on_samples(&self) -> usize {
        self.states.iter().filter(|&&s| s).count()
    }

    /// Fraction of samples that are ON, 0 for an empty timeline
    pub fn duty_cycle(&self) -> f64 {
        if self.states.is_empty() {
            return 0.0;
        }
        self.on_samples() as f64 / self.states.len() as f64
    }

    /// Index of the first ON sample
    pub fn first_onset(&self) -> Option<usize> {
        self.states.iter().position(|&s| s)
    }
}

impl Deref for ActivityTimeline {
    type Target = [bool];

    fn deref(&self) -> &Self::Target {
        &self.states
    }
}

impl AsRef<[bool]> for ActivityTimeline {
    fn as_ref(&self) -> &[bool] {
        &self.states
    }
}
