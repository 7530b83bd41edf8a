//! Edge detection: Sobel.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - uses the single channel directly
//! - **RGB**: (height, width, 3) - computes BT.601 luma first
//!
//! Output is always a single-channel gradient magnitude plane.

use ndarray::{Array2, ArrayView3};

use super::color::luma_plane;
use super::kernel::{correlate_plane, Kernel};

/// Sobel gradient magnitude `|Gx| + |Gy|`, clamped to 0-255.
///
/// Borders use edge replication like every other kernel operation, so a
/// flat region touching the image edge yields 0 there.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `parallel` - Split rows across the rayon pool
///
/// # Returns
/// Gradient plane of shape (height, width)
pub fn sobel_u8(input: ArrayView3<u8>, parallel: bool) -> Array2<u8> {
    let luma = luma_plane(input);
    let gx = correlate_plane(luma.view(), &Kernel::sobel_x().offsets(), parallel);
    let gy = correlate_plane(luma.view(), &Kernel::sobel_y().offsets(), parallel);

    ndarray::Zip::from(&gx)
        .and(&gy)
        .map_collect(|&h, &v| (h.abs() + v.abs()).min(255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_sobel_flat_is_zero() {
        let img = Array3::<u8>::from_elem((5, 5, 3), 120);
        let result = sobel_u8(img.view(), false);
        assert!(result.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sobel_vertical_step() {
        let img = Array3::from_shape_fn((4, 6, 1), |(_, x, _)| if x >= 3 { 50u8 } else { 0 });

        let result = sobel_u8(img.view(), false);

        // Columns 2 and 3 straddle the step: 4 * 50
        assert_eq!(result[[1, 2]], 200);
        assert_eq!(result[[1, 3]], 200);
        assert_eq!(result[[1, 0]], 0);
        assert_eq!(result[[1, 5]], 0);
        // Replicated top row sees no vertical change
        assert_eq!(result[[0, 2]], 200);
    }

    #[test]
    fn test_sobel_saturates() {
        let img = Array3::from_shape_fn((3, 3, 1), |(y, x, _)| if x + y >= 2 { 255u8 } else { 0 });
        let result = sobel_u8(img.view(), false);
        assert_eq!(result[[1, 1]], 255);
    }

    #[test]
    fn test_sobel_parallel_matches_sequential() {
        let img = Array3::from_shape_fn((19, 23, 3), |(y, x, c)| ((x * x + y * 3 + c * 40) % 256) as u8);
        assert_eq!(sobel_u8(img.view(), false), sobel_u8(img.view(), true));
    }
}
