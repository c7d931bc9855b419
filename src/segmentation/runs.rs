// src/segmentation/runs.rs
//! Run-length view over an on/off state sequence

use serde::{Deserialize, Serialize};

/// Maximal block of samples sharing one state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub state: bool,
    pub start: usize,
    pub len: usize,
}

impl Run {
    /// Exclusive end index
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether the run includes the first or last sample of a sequence of `total`
    pub fn touches_boundary(&self, total: usize) -> bool {
        self.start == 0 || self.end() == total
    }
}

/// Derived partition of a state sequence into runs.
///
/// Runs are always maximal and cover `0..total` without gaps, so adjacent
/// runs alternate state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunLengthView {
    runs: Vec<Run>,
    total: usize,
}

impl RunLengthView {
    pub fn from_states(states: &[bool]) -> Self {
        let mut runs: Vec<Run> = Vec::new();
        for (i, &state) in states.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.state == state => run.len += 1,
                _ => runs.push(Run { state, start: i, len: 1 }),
            }
        }
        Self {
            runs,
            total: states.len(),
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of samples covered
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Runs of one state, in order
    pub fn runs_of(&self, state: bool) -> impl Iterator<Item = &Run> + '_ {
        self.runs.iter().filter(move |run| run.state == state)
    }

    /// Expand back into one state per sample
    pub fn to_states(&self) -> Vec<bool> {
        let mut states = Vec::with_capacity(self.total);
        for run in &self.runs {
            states.extend(std::iter::repeat(run.state).take(run.len));
        }
        states
    }

    /// Flip every `state` run shorter than `min_len` samples.
    ///
    /// All runs are judged on their length in `self`, before any flip, and
    /// the result is re-merged into maximal runs. Returns the new view and
    /// the number of runs flipped.
    pub fn flip_short_runs(&self, state: bool, min_len: usize) -> (Self, usize) {
        let mut flipped = 0;
        let mut runs: Vec<Run> = Vec::with_capacity(self.runs.len());

        for run in &self.runs {
            let new_state = if run.state == state && run.len < min_len {
                flipped += 1;
                !run.state
            } else {
                run.state
            };

            match runs.last_mut() {
                Some(prev) if prev.state == new_state => prev.len += run.len,
                _ => runs.push(Run {
                    state: new_state,
                    start: run.start,
                    len: run.len,
                }),
            }
        }

        (
            Self {
                runs,
                total: self.total,
            },
            flipped,
        )
    }
}
