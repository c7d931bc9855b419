// src/config/constants.rs
//! Default parameters for conditioning and segmentation

/// Signal conditioning defaults
pub mod conditioning {
    /// Leading time used to estimate the DC offset, in seconds
    pub const DEFAULT_TIME4OFFSET_S: f64 = 0.1;
    pub const DEFAULT_FILTER_ORDER: usize = 3;
    /// Human movement artifacts live below this frequency
    pub const DEFAULT_FILTER_CUTOFF_HZ: f64 = 20.0;
    pub const DEFAULT_TIME4SMOOTHING_S: f64 = 0.05;
    pub const MIN_SMOOTHING_WINDOW: usize = 1;
}

/// Butterworth design limits
pub mod filters {
    pub const MIN_FILTER_ORDER: usize = 1;
    /// Higher orders lose precision in transfer-function form
    pub const MAX_FILTER_ORDER: usize = 12;
    /// Edge padding is this multiple of the coefficient vector length
    pub const FILTFILT_PAD_FACTOR: usize = 3;
}

/// Activity segmentation defaults
pub mod segmentation {
    /// Threshold multiplier applied to the resting standard deviation
    pub const DEFAULT_THRES_SD_FACTOR: f64 = 1.2;
    /// Leading samples assumed to be at rest
    pub const DEFAULT_BASELINE_WINDOW_SAMPLES: usize = 100;
    /// Minimum on-duration, in seconds
    pub const DEFAULT_MSD_ON_S: f64 = 0.05;
    /// Minimum off-duration, in seconds
    pub const DEFAULT_MSD_OFF_S: f64 = 0.025;
}

/// Gait-cycle comparison defaults
pub mod comparison {
    pub const GAIT_CYCLE_PERCENT_MAX: f64 = 100.0;
    pub const DEFAULT_GAIT_POINTS: usize = 101;
}
