//! Binarization: fixed threshold, percent-black cut, iterative two-class mean.
//!
//! Every strategy takes a single luma plane and returns a plane holding only
//! 0 and 255. Callers with RGB input reduce it with
//! [`luma_plane`](super::color::luma_plane) first.

use ndarray::{Array2, ArrayView2};

use super::histogram::histogram_u8;
use crate::error::{Error, Result};

/// Result of the iterative mean search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeanThreshold {
    /// Final threshold; pixels at or above it become white.
    pub threshold: f64,
    /// Number of split-and-average rounds performed.
    pub iterations: usize,
}

/// Pixels `>= threshold` become 255, the rest 0.
pub fn fixed_threshold(luma: ArrayView2<u8>, threshold: u8) -> Array2<u8> {
    luma.mapv(|v| if v >= threshold { 255 } else { 0 })
}

/// Histogram index at which the cumulative count first reaches `percent`% of
/// all pixels.
///
/// The returned index is in `0..=256`; 256 means the target was never
/// reached (only possible for `percent > 100`), which makes every pixel black.
pub fn percent_black_index(hist: &[u32; 256], percent: u8) -> usize {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    let target = total as f64 * percent as f64 / 100.0;

    let mut cumulative = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        cumulative += count as u64;
        if cumulative as f64 >= target {
            return i;
        }
    }
    256
}

/// Blacken the darkest `percent`% of pixels.
///
/// # Arguments
/// * `luma` - Single-channel plane
/// * `percent` - Share of pixels to turn black (0-100)
///
/// # Returns
/// Binary plane; values below the cut index are 0, the rest 255
///
/// # Errors
/// `InvalidParameter` if `percent > 100`
pub fn percent_black(luma: ArrayView2<u8>, percent: u8) -> Result<Array2<u8>> {
    if percent > 100 {
        return Err(Error::InvalidParameter {
            name: "percent_black",
            value: percent.to_string(),
            reason: "must be between 0 and 100".into(),
        });
    }

    let hist = histogram_u8(luma);
    let cut = percent_black_index(&hist, percent);
    log::debug!("percent-black {}% cuts at index {}", percent, cut);

    Ok(luma.mapv(|v| if (v as usize) < cut { 0 } else { 255 }))
}

/// Iterate the two-class mean until it moves by at most `epsilon`.
///
/// Starts from a sentinel above every pixel value so the first round always
/// runs. An empty class takes the other class's mean. Stops after
/// `max_iterations` rounds regardless of convergence.
pub fn iterative_mean_threshold(luma: ArrayView2<u8>, epsilon: f64, max_iterations: usize) -> MeanThreshold {
    let hist = histogram_u8(luma);
    let mut old_mean = 256.0f64;
    let mut iterations = 0;

    loop {
        let (mut dark_sum, mut dark_n) = (0.0f64, 0u64);
        let (mut bright_sum, mut bright_n) = (0.0f64, 0u64);
        for (v, &count) in hist.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if (v as f64) < old_mean {
                dark_sum += v as f64 * count as f64;
                dark_n += count as u64;
            } else {
                bright_sum += v as f64 * count as f64;
                bright_n += count as u64;
            }
        }

        let dark_mean = (dark_n > 0).then(|| dark_sum / dark_n as f64);
        let bright_mean = (bright_n > 0).then(|| bright_sum / bright_n as f64);
        let (dark_mean, bright_mean) = match (dark_mean, bright_mean) {
            (Some(d), Some(b)) => (d, b),
            (Some(d), None) => (d, d),
            (None, Some(b)) => (b, b),
            (None, None) => (0.0, 0.0),
        };

        let new_mean = (dark_mean + bright_mean) / 2.0;
        let delta = (new_mean - old_mean).abs();
        old_mean = new_mean;
        iterations += 1;

        if delta <= epsilon {
            break;
        }
        if iterations >= max_iterations {
            log::warn!(
                "iterative mean did not converge after {} rounds (last delta {:.3})",
                iterations,
                delta
            );
            break;
        }
    }

    MeanThreshold {
        threshold: old_mean,
        iterations,
    }
}

/// Binarize with the converged two-class mean.
pub fn iterative_mean(luma: ArrayView2<u8>, epsilon: f64, max_iterations: usize) -> Array2<u8> {
    let result = iterative_mean_threshold(luma, epsilon, max_iterations);
    log::debug!(
        "iterative mean settled at {:.2} after {} rounds",
        result.threshold,
        result.iterations
    );
    luma.mapv(|v| if v as f64 >= result.threshold { 255 } else { 0 })
}
