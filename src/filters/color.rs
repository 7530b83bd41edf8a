//! Luma and YCbCr conversions.
//!
//! Uses ITU-R BT.601 coefficients throughout (full-range, JPEG style).
//!
//! - **Luma**: single `u8` plane, rounded weighted sum, consumed by
//!   morphology, binarization and Sobel
//! - **YCbCr**: `f64` planes, consumed by the histogram operations so the
//!   chroma survives a luma-only remap

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

/// ITU-R BT.601 luma coefficients
pub const LUMA_R: f64 = 0.299;
pub const LUMA_G: f64 = 0.587;
pub const LUMA_B: f64 = 0.114;

/// Luma of one RGB sample, unclamped.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Reduce an image to a single luma plane.
///
/// Grayscale input is copied as is. RGB input uses the BT.601 weights,
/// rounded to `u8` so neutral grays keep their value.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
///
/// # Returns
/// Luma plane of shape (height, width)
pub fn luma_plane(input: ArrayView3<u8>) -> Array2<u8> {
    let (height, width, channels) = input.dim();
    if channels == 1 {
        return input.index_axis(ndarray::Axis(2), 0).to_owned();
    }

    let mut output = Array2::<u8>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let v = luma(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]);
            output[[y, x]] = to_u8(v);
        }
    }
    output
}

/// Wrap a plane as a one-channel image.
pub fn plane_to_image(plane: Array2<u8>) -> Array3<u8> {
    plane.insert_axis(ndarray::Axis(2))
}

/// Separated Y, Cb, Cr planes.
#[derive(Clone, Debug)]
pub struct YCbCrPlanes {
    pub y: Array2<f64>,
    pub cb: Array2<f64>,
    pub cr: Array2<f64>,
}

/// Convert an RGB image to YCbCr planes.
pub fn rgb_to_ycbcr(input: ArrayView3<u8>) -> YCbCrPlanes {
    let (height, width, _) = input.dim();
    let mut y_plane = Array2::<f64>::zeros((height, width));
    let mut cb_plane = Array2::<f64>::zeros((height, width));
    let mut cr_plane = Array2::<f64>::zeros((height, width));

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]] as f64;
            let g = input[[y, x, 1]] as f64;
            let b = input[[y, x, 2]] as f64;

            y_plane[[y, x]] = LUMA_R * r + LUMA_G * g + LUMA_B * b;
            cb_plane[[y, x]] = 128.0 - 0.168736 * r - 0.331264 * g + 0.5 * b;
            cr_plane[[y, x]] = 128.0 + 0.5 * r - 0.418688 * g - 0.081312 * b;
        }
    }

    YCbCrPlanes {
        y: y_plane,
        cb: cb_plane,
        cr: cr_plane,
    }
}

/// Rebuild an RGB image from a new Y plane and the original chroma.
///
/// Each channel is rounded and clamped to 0-255.
pub fn ycbcr_to_rgb(y_plane: ArrayView2<f64>, cb: ArrayView2<f64>, cr: ArrayView2<f64>) -> Array3<u8> {
    let (height, width) = y_plane.dim();
    let mut output = Array3::<u8>::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            let l = y_plane[[y, x]];
            let u = cb[[y, x]] - 128.0;
            let v = cr[[y, x]] - 128.0;

            let r = l + 1.402 * v;
            let g = l - 0.344136 * u - 0.714136 * v;
            let b = l + 1.772 * u;

            output[[y, x, 0]] = to_u8(r);
            output[[y, x, 1]] = to_u8(g);
            output[[y, x, 2]] = to_u8(b);
        }
    }

    output
}

/// Round and clamp a sample to the 8-bit range.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_plane_rgb() {
        let mut img = Array3::<u8>::zeros((1, 3, 3));
        img[[0, 0, 0]] = 255; // pure red
        img[[0, 1, 1]] = 255; // pure green
        img[[0, 2, 2]] = 255; // pure blue

        let plane = luma_plane(img.view());

        assert_eq!(plane[[0, 0]], 76); // 0.299 * 255 = 76.2
        assert_eq!(plane[[0, 1]], 150); // 0.587 * 255 = 149.7
        assert_eq!(plane[[0, 2]], 29); // 0.114 * 255 = 29.07
    }

    #[test]
    fn test_luma_plane_neutral_rgb_keeps_value() {
        for v in [0u8, 1, 100, 128, 254, 255] {
            let img = Array3::<u8>::from_elem((1, 1, 3), v);
            assert_eq!(luma_plane(img.view())[[0, 0]], v);
        }
    }

    #[test]
    fn test_luma_plane_gray_passthrough() {
        let mut img = Array3::<u8>::zeros((2, 2, 1));
        img[[1, 0, 0]] = 42;
        let plane = luma_plane(img.view());
        assert_eq!(plane[[1, 0]], 42);
        assert_eq!(plane.dim(), (2, 2));
    }

    #[test]
    fn test_ycbcr_roundtrip_within_one() {
        let samples: [[u8; 3]; 5] = [
            [0, 0, 0],
            [255, 255, 255],
            [200, 30, 90],
            [12, 240, 128],
            [64, 64, 250],
        ];
        let mut img = Array3::<u8>::zeros((1, samples.len(), 3));
        for (x, px) in samples.iter().enumerate() {
            for c in 0..3 {
                img[[0, x, c]] = px[c];
            }
        }

        let planes = rgb_to_ycbcr(img.view());
        let back = ycbcr_to_rgb(planes.y.view(), planes.cb.view(), planes.cr.view());

        for x in 0..samples.len() {
            for c in 0..3 {
                let diff = (back[[0, x, c]] as i32 - img[[0, x, c]] as i32).abs();
                assert!(diff <= 1, "pixel {x} channel {c} drifted by {diff}");
            }
        }
    }

    #[test]
    fn test_gray_rgb_has_neutral_chroma() {
        let img = Array3::<u8>::from_elem((1, 1, 3), 100);
        let planes = rgb_to_ycbcr(img.view());
        assert!((planes.y[[0, 0]] - 100.0).abs() < 1e-9);
        assert!((planes.cb[[0, 0]] - 128.0).abs() < 1e-6);
        assert!((planes.cr[[0, 0]] - 128.0).abs() < 1e-6);
    }
}
