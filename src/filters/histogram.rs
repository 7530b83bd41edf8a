//! Histogram operations: Stretch, Equalize.
//!
//! Both operations touch brightness only.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - remaps the single channel directly
//! - **RGB**: (height, width, 3) - remaps Y of a BT.601 YCbCr decomposition,
//!   then rebuilds R, G, B from the new Y and the untouched Cb, Cr

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use super::color::{plane_to_image, rgb_to_ycbcr, to_u8, ycbcr_to_rgb};
use crate::config::FlatHistogramPolicy;
use crate::error::{Error, Result};

// ============================================================================
// Histogram Construction
// ============================================================================

/// Count occurrences of every value in a plane.
pub fn histogram_u8(plane: ArrayView2<u8>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in plane.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// 257-entry cumulative histogram: `cumulative[i]` counts values below `i`.
pub fn cumulative(hist: &[u32; 256]) -> [u64; 257] {
    let mut cum = [0u64; 257];
    for (i, &count) in hist.iter().enumerate() {
        cum[i + 1] = cum[i] + count as u64;
    }
    cum
}

/// Equalization lookup table: `lut[v] = floor(cdf(v) * 255 / total)`.
pub fn equalization_lut(hist: &[u32; 256]) -> [u8; 256] {
    let cum = cumulative(hist);
    let total = cum[256];
    let mut lut = [0u8; 256];
    if total == 0 {
        return lut;
    }
    for (v, entry) in lut.iter_mut().enumerate() {
        *entry = (cum[v + 1] * 255 / total) as u8;
    }
    lut
}

// ============================================================================
// Stretch
// ============================================================================

/// Linearly remap a luma plane so its minimum maps to 0 and maximum to 255.
///
/// Returns `None` when every value is equal.
pub fn stretch_plane(luma: ArrayView2<f64>) -> Option<Array2<f64>> {
    let (min, max) = luma
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return None;
    }
    Some(luma.mapv(|v| (v - min) / range * 255.0))
}

/// Apply histogram stretch.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `policy` - What to do when the luma channel is flat
///
/// # Returns
/// Stretched image with same channel count
///
/// # Errors
/// `DegenerateHistogram` for a flat image under [`FlatHistogramPolicy::Reject`]
pub fn stretch(input: ArrayView3<u8>, policy: FlatHistogramPolicy) -> Result<Array3<u8>> {
    let channels = input.dim().2;

    let (luma, chroma) = if channels == 1 {
        (input.index_axis(Axis(2), 0).mapv(f64::from), None)
    } else {
        let planes = rgb_to_ycbcr(input);
        (planes.y, Some((planes.cb, planes.cr)))
    };

    let Some(stretched) = stretch_plane(luma.view()) else {
        return match policy {
            FlatHistogramPolicy::PassThrough => {
                log::debug!("histogram stretch on flat luma, passing source through");
                Ok(input.to_owned())
            }
            FlatHistogramPolicy::Reject => Err(Error::DegenerateHistogram),
        };
    };

    Ok(match chroma {
        None => plane_to_image(stretched.mapv(to_u8)),
        Some((cb, cr)) => ycbcr_to_rgb(stretched.view(), cb.view(), cr.view()),
    })
}

// ============================================================================
// Equalize
// ============================================================================

/// Apply histogram equalization.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
///
/// # Returns
/// Equalized image with same channel count
pub fn equalize(input: ArrayView3<u8>) -> Array3<u8> {
    let channels = input.dim().2;

    if channels == 1 {
        let plane = input.index_axis(Axis(2), 0);
        let lut = equalization_lut(&histogram_u8(plane));
        return plane_to_image(plane.mapv(|v| lut[v as usize]));
    }

    let planes = rgb_to_ycbcr(input);
    let quantized = planes.y.mapv(to_u8);
    let lut = equalization_lut(&histogram_u8(quantized.view()));
    let new_y = quantized.mapv(|v| lut[v as usize] as f64);

    ycbcr_to_rgb(new_y.view(), planes.cb.view(), planes.cr.view())
}
