//! Linear scaling.
//!
//! Pixel-wise multiply that doesn't require spatial context.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - single luminance channel
//! - **RGB**: (height, width, 3) - every channel scaled by the same factor

use ndarray::{Array3, ArrayView3};

/// Multiply every sample by `factor_tenths / 10`.
///
/// Uses integer arithmetic through a lookup table: the product is truncated
/// toward zero, then clamped to 0-255.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `factor_tenths` - Scale in tenths: 10 = unchanged, 25 = x2.5, 0 = black
///
/// # Returns
/// Scaled image with same channel count
pub fn linear_scale_u8(input: ArrayView3<u8>, factor_tenths: i32) -> Array3<u8> {
    let mut lut = [0u8; 256];
    for (v, entry) in lut.iter_mut().enumerate() {
        let scaled = v as i64 * factor_tenths as i64 / 10;
        *entry = scaled.clamp(0, 255) as u8;
    }

    input.mapv(|v| lut[v as usize])
}
