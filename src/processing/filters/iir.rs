// src/processing/filters/iir.rs
//! IIR (Infinite Impulse Response) Butterworth filters with zero-phase application
//!
//! Designs follow the classic analog-prototype route: Butterworth poles on the
//! unit circle, low/high-pass frequency transform of the prewarped cutoff,
//! bilinear transform, then expansion into transfer-function polynomials.
//! Zero-phase filtering runs the filter forward and backward over an
//! odd-extended signal, seeding each direction with steady-state initial
//! conditions so that edges do not ring.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;
use tracing::trace;

use super::{BandType, IirCoefficients};
use crate::config::constants::filters::{FILTFILT_PAD_FACTOR, MAX_FILTER_ORDER, MIN_FILTER_ORDER};
use crate::error::{OnOffError, ProcessingStage, Result};

/// Bilinear transform sampling rate for normalized frequencies (Nyquist = 1)
const NORMALIZED_FS: f64 = 2.0;

/// Butterworth IIR filter in transfer-function form
#[derive(Debug, Clone)]
pub struct IirFilter {
    coefficients: IirCoefficients,
    order: usize,
}

impl IirFilter {
    /// Design a Butterworth filter.
    ///
    /// `normalized_cutoff` is the cutoff divided by the Nyquist frequency and
    /// must lie strictly inside (0, 1).
    pub fn butterworth(order: usize, normalized_cutoff: f64, band_type: BandType) -> Result<Self> {
        if !(MIN_FILTER_ORDER..=MAX_FILTER_ORDER).contains(&order) {
            return Err(OnOffError::invalid_filter(format!(
                "order must be {}-{}, got {}",
                MIN_FILTER_ORDER, MAX_FILTER_ORDER, order
            )));
        }
        if !(normalized_cutoff > 0.0 && normalized_cutoff < 1.0) {
            return Err(OnOffError::invalid_filter(format!(
                "normalized cutoff {} is outside (0, 1)",
                normalized_cutoff
            )));
        }

        let coefficients = Self::calculate_butterworth_coefficients(order, normalized_cutoff, band_type);
        trace!(?band_type, order, normalized_cutoff, b = ?coefficients.b, a = ?coefficients.a, "designed Butterworth filter");
        Ok(Self::new(coefficients))
    }

    /// Create filter from coefficients. `a[0]` is normalized to one.
    pub fn new(coefficients: IirCoefficients) -> Self {
        let IirCoefficients { mut b, mut a } = coefficients;
        let a0 = a[0];
        b.iter_mut().for_each(|c| *c /= a0);
        a.iter_mut().for_each(|c| *c /= a0);

        let taps = b.len().max(a.len());
        b.resize(taps, 0.0);
        a.resize(taps, 0.0);

        Self {
            order: taps - 1,
            coefficients: IirCoefficients { b, a },
        }
    }

    /// Get filter order
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn coefficients(&self) -> &IirCoefficients {
        &self.coefficients
    }

    /// Samples of odd extension added on each side by [`IirFilter::filtfilt`]
    pub fn pad_length(&self) -> usize {
        FILTFILT_PAD_FACTOR * self.coefficients.taps()
    }

    /// Causal filtering using Direct Form II Transposed.
    ///
    /// `zi` holds the initial delay-line state and must have `order()` entries.
    pub fn lfilter(&self, input: &[f64], zi: &[f64]) -> Vec<f64> {
        let IirCoefficients { b, a } = &self.coefficients;
        let n = b.len();
        let mut z = zi.to_vec();
        z.resize(n - 1, 0.0);

        let mut output = Vec::with_capacity(input.len());
        for &x in input {
            let y = b[0] * x + z.first().copied().unwrap_or(0.0);
            for j in 0..n.saturating_sub(2) {
                z[j] = b[j + 1] * x + z[j + 1] - a[j + 1] * y;
            }
            if n >= 2 {
                z[n - 2] = b[n - 1] * x - a[n - 1] * y;
            }
            output.push(y);
        }
        output
    }

    /// Initial state giving the steady-state response to a unit step.
    ///
    /// Scaling it by the first input sample makes a constant signal pass
    /// through without a start-up transient.
    pub fn steady_state_zi(&self) -> Vec<f64> {
        let IirCoefficients { b, a } = &self.coefficients;
        let n = b.len();
        if n < 2 {
            return Vec::new();
        }

        let b_sum: f64 = (1..n).map(|i| b[i] - a[i] * b[0]).sum();
        let a_sum: f64 = a.iter().sum();

        let mut zi = Vec::with_capacity(n - 1);
        let z0 = b_sum / a_sum;
        zi.push(z0);

        let mut asum = 1.0;
        let mut csum = 0.0;
        for k in 1..n - 1 {
            asum += a[k];
            csum += b[k] - a[k] * b[0];
            zi.push(asum * z0 - csum);
        }
        zi
    }

    /// Zero-phase forward-backward filtering.
    ///
    /// The signal must be longer than [`IirFilter::pad_length`].
    pub fn filtfilt(&self, input: &[f64]) -> Result<Vec<f64>> {
        let edge = self.pad_length();
        if input.len() <= edge {
            return Err(OnOffError::InsufficientData {
                stage: ProcessingStage::Filtering,
                required: edge + 1,
                actual: input.len(),
            });
        }

        let extended = odd_extension(input, edge);
        let zi = self.steady_state_zi();

        let x0 = extended[0];
        let zi_forward: Vec<f64> = zi.iter().map(|z| z * x0).collect();
        let mut forward = self.lfilter(&extended, &zi_forward);

        forward.reverse();
        let y0 = forward[0];
        let zi_backward: Vec<f64> = zi.iter().map(|z| z * y0).collect();
        let mut backward = self.lfilter(&forward, &zi_backward);
        backward.reverse();

        Ok(backward[edge..backward.len() - edge].to_vec())
    }

    fn calculate_butterworth_coefficients(
        order: usize,
        normalized_cutoff: f64,
        band_type: BandType,
    ) -> IirCoefficients {
        // Pre-warp frequency for bilinear transform
        let warped = 2.0 * NORMALIZED_FS * (PI * normalized_cutoff / NORMALIZED_FS).tan();
        let prototype = butterworth_prototype_poles(order);

        let (zeros, poles, gain) = match band_type {
            BandType::Lowpass => {
                let poles: Vec<Complex64> = prototype.iter().map(|&p| p * warped).collect();
                (Vec::new(), poles, warped.powi(order as i32))
            }
            BandType::Highpass => {
                let denominator: Complex64 = prototype.iter().map(|&p| -p).product();
                let poles: Vec<Complex64> = prototype
                    .iter()
                    .map(|&p| Complex64::new(warped, 0.0) / p)
                    .collect();
                let zeros = vec![Complex64::new(0.0, 0.0); order];
                (zeros, poles, (Complex64::new(1.0, 0.0) / denominator).re)
            }
        };

        let (zeros, poles, gain) = bilinear_zpk(&zeros, &poles, gain);

        let b = polynomial_from_roots(&zeros)
            .into_iter()
            .map(|c| gain * c.re)
            .collect();
        let a = polynomial_from_roots(&poles)
            .into_iter()
            .map(|c| c.re)
            .collect();

        IirCoefficients { b, a }
    }
}

/// Analog Butterworth prototype poles with unit cutoff
fn butterworth_prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as i64;
    (0..n)
        .map(|k| {
            let m = (-n + 1 + 2 * k) as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect()
}

/// Map analog zeros/poles/gain to the z-plane
fn bilinear_zpk(
    zeros: &[Complex64],
    poles: &[Complex64],
    gain: f64,
) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let fs2 = Complex64::new(2.0 * NORMALIZED_FS, 0.0);

    let mut digital_zeros: Vec<Complex64> = zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    let digital_poles: Vec<Complex64> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    // Zeros at infinity move to Nyquist
    digital_zeros.resize(poles.len().max(zeros.len()), Complex64::new(-1.0, 0.0));

    let numerator: Complex64 = zeros.iter().map(|&z| fs2 - z).product();
    let denominator: Complex64 = poles.iter().map(|&p| fs2 - p).product();
    let digital_gain = gain * (numerator / denominator).re;

    (digital_zeros, digital_poles, digital_gain)
}

/// Expand `prod(x - r)` into descending-power coefficients
fn polynomial_from_roots(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}

/// Point-symmetric extension about both end samples
fn odd_extension(input: &[f64], edge: usize) -> Vec<f64> {
    let n = input.len();
    let first = input[0];
    let last = input[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * edge);
    extended.extend((1..=edge).rev().map(|i| 2.0 * first - input[i]));
    extended.extend_from_slice(input);
    extended.extend((1..=edge).map(|i| 2.0 * last - input[n - 1 - i]));
    extended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "{} vs {} (all: {:?})", a, e, actual);
        }
    }

    #[test]
    fn test_butterworth_lowpass_second_order() {
        let filter = IirFilter::butterworth(2, 0.2, BandType::Lowpass).unwrap();
        assert_eq!(filter.order(), 2);
        assert_close(
            &filter.coefficients().b,
            &[0.067455273889072, 0.134910547778144, 0.067455273889072],
            1e-9,
        );
        assert_close(
            &filter.coefficients().a,
            &[1.0, -1.142980502539901, 0.412801598096189],
            1e-9,
        );
    }

    #[test]
    fn test_butterworth_third_order_at_default_cutoff() {
        // 20 Hz at 1 kHz
        let high = IirFilter::butterworth(3, 0.04, BandType::Highpass).unwrap();
        assert_close(
            &high.coefficients().b,
            &[0.881838198574, -2.645514595723, 2.645514595723, -0.881838198574],
            1e-9,
        );
        assert_close(
            &high.coefficients().a,
            &[1.0, -2.748835809215, 2.528231219143, -0.777638560238],
            1e-9,
        );

        let low = IirFilter::butterworth(3, 0.04, BandType::Lowpass).unwrap();
        assert_close(
            &low.coefficients().b,
            &[0.000219606211, 0.000658818634, 0.000658818634, 0.000219606211],
            1e-9,
        );
        assert_close(&low.coefficients().a, &high.coefficients().a, 1e-12);
    }

    #[test]
    fn test_dc_gain() {
        for order in 1..=6 {
            let low = IirFilter::butterworth(order, 0.1, BandType::Lowpass).unwrap();
            let high = IirFilter::butterworth(order, 0.1, BandType::Highpass).unwrap();

            let gain = |c: &IirCoefficients| c.b.iter().sum::<f64>() / c.a.iter().sum::<f64>();
            assert!((gain(low.coefficients()) - 1.0).abs() < 1e-9, "order {}", order);
            assert!(gain(high.coefficients()).abs() < 1e-9, "order {}", order);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(IirFilter::butterworth(0, 0.1, BandType::Lowpass).is_err());
        assert!(IirFilter::butterworth(3, 0.0, BandType::Lowpass).is_err());
        assert!(IirFilter::butterworth(3, 1.0, BandType::Highpass).is_err());
        assert!(IirFilter::butterworth(3, 1.2, BandType::Highpass).is_err());
        assert!(IirFilter::butterworth(3, f64::NAN, BandType::Highpass).is_err());
    }

    #[test]
    fn test_steady_state_zi_passes_constant() {
        let filter = IirFilter::butterworth(3, 0.04, BandType::Lowpass).unwrap();
        let zi: Vec<f64> = filter.steady_state_zi().iter().map(|z| z * 2.0).collect();
        let output = filter.lfilter(&[2.0; 20], &zi);
        for y in output {
            assert!((y - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lfilter_impulse_response_starts_with_b0() {
        let filter = IirFilter::butterworth(2, 0.2, BandType::Lowpass).unwrap();
        let mut impulse = vec![0.0; 10];
        impulse[0] = 1.0;
        let output = filter.lfilter(&impulse, &[0.0, 0.0]);
        assert!((output[0] - filter.coefficients().b[0]).abs() < 1e-15);
        assert!(output[1] > output[0]);
    }

    #[test]
    fn test_filtfilt_is_zero_phase() {
        let filter = IirFilter::butterworth(3, 0.1, BandType::Lowpass).unwrap();
        let mut signal = vec![0.0; 201];
        for (i, s) in signal.iter_mut().enumerate().take(111).skip(90) {
            *s = 1.0 - ((i as f64 - 100.0) / 10.0).abs();
        }

        let output = filter.filtfilt(&signal).unwrap();
        assert_eq!(output.len(), signal.len());

        let peak = output
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 100);

        // Symmetric input stays symmetric
        for k in 1..50 {
            assert!((output[100 - k] - output[100 + k]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_filtfilt_highpass_removes_offset() {
        let filter = IirFilter::butterworth(3, 0.04, BandType::Highpass).unwrap();
        let output = filter.filtfilt(&vec![5.0; 300]).unwrap();
        assert!(output.iter().all(|y| y.abs() < 1e-9));
    }

    #[test]
    fn test_filtfilt_requires_more_than_pad_length() {
        let filter = IirFilter::butterworth(3, 0.04, BandType::Highpass).unwrap();
        assert_eq!(filter.pad_length(), 12);
        assert!(matches!(
            filter.filtfilt(&[1.0; 12]),
            Err(OnOffError::InsufficientData { stage: ProcessingStage::Filtering, required: 13, actual: 12 })
        ));
        assert_eq!(filter.filtfilt(&[1.0; 13]).unwrap().len(), 13);
    }

    #[test]
    fn test_odd_extension() {
        let extended = odd_extension(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(extended, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }
}
