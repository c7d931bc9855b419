// src/processing/smoothing.rs
//! Centered moving-average smoothing with mirrored edges

/// Mirror an out-of-range index back into `0..len`.
///
/// Half-sample symmetric: `d c b a | a b c d | d c b a`.
fn reflect_index(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let m = index.rem_euclid(period);
    if m >= len {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

/// Centered moving average of width `window`.
///
/// For even widths the window spans `[i - window/2, i + window/2 - 1]`.
/// A width of zero or one returns the input unchanged.
pub fn moving_average(input: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || input.is_empty() {
        return input.to_vec();
    }

    let n = input.len();
    let before = (window / 2) as isize;

    // Prefix sums over the reflected signal
    let start = -before;
    let end = n as isize - before + window as isize - 1;
    let mut prefix = Vec::with_capacity((end - start + 1) as usize);
    prefix.push(0.0);
    let mut acc = 0.0;
    for j in start..end {
        acc += input[reflect_index(j, n)];
        prefix.push(acc);
    }

    let scale = 1.0 / window as f64;
    (0..n)
        .map(|i| (prefix[i + window] - prefix[i]) * scale)
        .collect()
}
