//! Noise reduction: Median.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes each channel independently

use ndarray::{Array3, ArrayView3};

use super::core::{clamp_coord, for_each_row};

/// Rank taken from the sorted 3x3 window (the middle of nine).
const MEDIAN_RANK: usize = 4;

/// Apply a 3x3 median filter.
///
/// Each channel is filtered on its own; the window replicates edge pixels.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `parallel` - Split rows across the rayon pool
///
/// # Returns
/// Median-filtered image with same channel count
pub fn median_u8(input: ArrayView3<u8>, parallel: bool) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for_each_row(&mut output, parallel, |y, mut row| {
        let mut window = [0u8; 9];
        for x in 0..width {
            for c in 0..channels {
                let mut i = 0;
                for dy in -1..=1 {
                    let sy = clamp_coord(y, dy, height);
                    for dx in -1..=1 {
                        let sx = clamp_coord(x, dx, width);
                        window[i] = input[[sy, sx, c]];
                        i += 1;
                    }
                }

                window.sort_unstable();
                row[[x, c]] = window[MEDIAN_RANK];
            }
        }
    });

    output
}
