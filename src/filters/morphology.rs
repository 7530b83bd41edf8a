//! Binary morphology: Dilate, Erode, Open, Close, Hit-or-Miss.
//!
//! All operators work on single-channel binary planes holding only 0 and 255.
//! Use [`threshold_above`] to produce one from a luma plane.
//!
//! ## Boundary Handling
//!
//! - **Dilate / Erode**: 3x3 neighborhood with edge replication
//! - **Hit-or-Miss**: no replication; pixels whose kernel footprint leaves the
//!   image are never scanned and stay 0

use ndarray::{Array2, ArrayView2};

use super::core::{clamp_coord, for_each_row};
use super::kernel::OffsetKernel;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Threshold a luma plane: `v > threshold` becomes 255, everything else 0.
pub fn threshold_above(luma: ArrayView2<u8>, threshold: u8) -> Array2<u8> {
    luma.mapv(|v| if v > threshold { FOREGROUND } else { BACKGROUND })
}

/// Output `seek` wherever the 3x3 neighborhood contains it, else the opposite.
fn neighborhood_any(bin: ArrayView2<u8>, seek: u8, parallel: bool) -> Array2<u8> {
    let (height, width) = bin.dim();
    let other = if seek == FOREGROUND { BACKGROUND } else { FOREGROUND };
    let mut output = Array2::<u8>::zeros((height, width));

    for_each_row(&mut output, parallel, |y, mut row| {
        for x in 0..width {
            let mut found = false;
            'window: for dy in -1..=1 {
                let sy = clamp_coord(y, dy, height);
                for dx in -1..=1 {
                    let sx = clamp_coord(x, dx, width);
                    if bin[[sy, sx]] == seek {
                        found = true;
                        break 'window;
                    }
                }
            }
            row[x] = if found { seek } else { other };
        }
    });

    output
}

/// Grow foreground: 255 if any 3x3 neighbor is 255.
pub fn dilate(bin: ArrayView2<u8>, parallel: bool) -> Array2<u8> {
    neighborhood_any(bin, FOREGROUND, parallel)
}

/// Shrink foreground: 0 if any 3x3 neighbor is 0.
pub fn erode(bin: ArrayView2<u8>, parallel: bool) -> Array2<u8> {
    neighborhood_any(bin, BACKGROUND, parallel)
}

/// Dilate then erode. Fills small holes.
pub fn close(bin: ArrayView2<u8>, parallel: bool) -> Array2<u8> {
    let dilated = dilate(bin, parallel);
    erode(dilated.view(), parallel)
}

/// Erode then dilate. Removes small specks.
pub fn open(bin: ArrayView2<u8>, parallel: bool) -> Array2<u8> {
    let eroded = erode(bin, parallel);
    dilate(eroded.view(), parallel)
}

/// Value a kernel coefficient demands at its position.
///
/// 0 expects background, 1 or 255 expect foreground; any other coefficient
/// can never match.
fn expected_value(coeff: f64) -> Option<u8> {
    if coeff == 0.0 {
        Some(BACKGROUND)
    } else if coeff == 1.0 || coeff == 255.0 {
        Some(FOREGROUND)
    } else {
        None
    }
}

/// Exact structural match of every neighborhood against `kernel`.
///
/// Returns 255 where all taps match, 0 elsewhere, including the border band
/// the kernel footprint cannot cover.
pub fn hit_or_miss(bin: ArrayView2<u8>, kernel: &OffsetKernel, parallel: bool) -> Array2<u8> {
    let (height, width) = bin.dim();
    let mut output = Array2::<u8>::zeros((height, width));

    let pattern: Option<Vec<(u8, isize, isize)>> = kernel
        .taps()
        .iter()
        .map(|t| expected_value(t.coeff).map(|v| (v, t.dx, t.dy)))
        .collect();
    let Some(pattern) = pattern else {
        log::debug!("hit-or-miss kernel has coefficients outside {{0, 1, 255}}, nothing can match");
        return output;
    };

    let extent = kernel.extent();
    let x_start = (-extent.min_dx) as usize;
    let y_start = (-extent.min_dy) as usize;
    let x_end = width as isize - extent.max_dx;
    let y_end = height as isize - extent.max_dy;
    if x_end <= x_start as isize || y_end <= y_start as isize {
        return output;
    }
    let (x_end, y_end) = (x_end as usize, y_end as usize);

    for_each_row(&mut output, parallel, |y, mut row| {
        if y < y_start || y >= y_end {
            return;
        }
        for x in x_start..x_end {
            let hit = pattern.iter().all(|&(expected, dx, dy)| {
                let sx = (x as isize + dx) as usize;
                let sy = (y as isize + dy) as usize;
                bin[[sy, sx]] == expected
            });
            if hit {
                row[x] = FOREGROUND;
            }
        }
    });

    output
}

/// Remove matched pixels: `clamp(bin - hit_or_miss(bin), 0, 255)`.
pub fn thin(bin: ArrayView2<u8>, kernel: &OffsetKernel, parallel: bool) -> Array2<u8> {
    let matched = hit_or_miss(bin, kernel, parallel);
    ndarray::Zip::from(&bin)
        .and(&matched)
        .map_collect(|&b, &m| b.saturating_sub(m))
}

/// Add matched pixels: `clamp(bin + hit_or_miss(bin), 0, 255)`.
pub fn thicken(bin: ArrayView2<u8>, kernel: &OffsetKernel, parallel: bool) -> Array2<u8> {
    let matched = hit_or_miss(bin, kernel, parallel);
    ndarray::Zip::from(&bin)
        .and(&matched)
        .map_collect(|&b, &m| b.saturating_add(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::kernel::Kernel;

    fn foreground_area(bin: &Array2<u8>) -> usize {
        bin.iter().filter(|&&v| v == FOREGROUND).count()
    }

    fn speckled(height: usize, width: usize) -> Array2<u8> {
        Array2::from_shape_fn((height, width), |(y, x)| {
            let blob = (3..9).contains(&y) && (4..12).contains(&x);
            let speck = (y * 7 + x * 13) % 11 == 0;
            let hole = y == 5 && x == 7;
            if (blob && !hole) || speck {
                FOREGROUND
            } else {
                BACKGROUND
            }
        })
    }

    #[test]
    fn test_threshold_above_is_strict() {
        let luma = ndarray::arr2(&[[100u8, 101], [99, 255]]);
        let bin = threshold_above(luma.view(), 100);
        assert_eq!(bin, ndarray::arr2(&[[0u8, 255], [0, 255]]));
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut bin = Array2::<u8>::zeros((5, 5));
        bin[[2, 2]] = FOREGROUND;

        let result = dilate(bin.view(), false);

        assert_eq!(foreground_area(&result), 9);
        assert_eq!(result[[1, 1]], FOREGROUND);
        assert_eq!(result[[3, 3]], FOREGROUND);
        assert_eq!(result[[0, 0]], BACKGROUND);
    }

    #[test]
    fn test_erode_shrinks_around_hole() {
        let mut bin = Array2::from_elem((5, 5), FOREGROUND);
        bin[[2, 2]] = BACKGROUND;

        let result = erode(bin.view(), false);

        assert_eq!(foreground_area(&result), 16);
        assert_eq!(result[[1, 2]], BACKGROUND);
    }

    #[test]
    fn test_erode_replicates_edges() {
        let bin = Array2::from_elem((4, 4), FOREGROUND);
        let result = erode(bin.view(), false);
        // Zero padding would eat the border
        assert_eq!(result, bin);
    }

    #[test]
    fn test_close_never_decreases_area() {
        let bin = speckled(12, 16);
        let closed = close(bin.view(), false);

        assert!(foreground_area(&closed) >= foreground_area(&bin));
        // The one-pixel hole gets filled
        assert_eq!(closed[[5, 7]], FOREGROUND);
    }

    #[test]
    fn test_open_never_increases_area() {
        let bin = speckled(12, 16);
        let opened = open(bin.view(), false);

        assert!(foreground_area(&opened) <= foreground_area(&bin));
        for (&o, &b) in opened.iter().zip(bin.iter()) {
            assert!(o <= b);
        }
    }

    #[test]
    fn test_morphology_parallel_matches_sequential() {
        let bin = speckled(31, 29);
        assert_eq!(close(bin.view(), false), close(bin.view(), true));
        assert_eq!(open(bin.view(), false), open(bin.view(), true));
    }

    fn isolated_point_kernel() -> OffsetKernel {
        Kernel::parse("0,0,0\n0,1,0\n0,0,0").unwrap().offsets()
    }

    #[test]
    fn test_hit_or_miss_finds_isolated_point() {
        let mut bin = Array2::<u8>::zeros((5, 5));
        bin[[2, 2]] = FOREGROUND;
        bin[[0, 4]] = FOREGROUND; // on the border, never scanned

        let matched = hit_or_miss(bin.view(), &isolated_point_kernel(), false);

        assert_eq!(matched[[2, 2]], FOREGROUND);
        assert_eq!(matched[[0, 4]], BACKGROUND);
        assert_eq!(foreground_area(&matched), 1);
    }

    #[test]
    fn test_hit_or_miss_accepts_255_entries() {
        let k = Kernel::parse("0,0,0\n0,255,0\n0,0,0").unwrap().offsets();
        let mut bin = Array2::<u8>::zeros((3, 3));
        bin[[1, 1]] = FOREGROUND;
        assert_eq!(hit_or_miss(bin.view(), &k, false)[[1, 1]], FOREGROUND);
    }

    #[test]
    fn test_hit_or_miss_border_band_follows_even_kernel() {
        // 2x2 kernel has offsets -1..=0, so only row/column 0 are excluded
        let k = Kernel::parse("1,1\n1,1").unwrap().offsets();
        let bin = Array2::from_elem((3, 3), FOREGROUND);

        let matched = hit_or_miss(bin.view(), &k, false);

        assert_eq!(matched, ndarray::arr2(&[[0u8, 0, 0], [0, 255, 255], [0, 255, 255]]));
    }

    #[test]
    fn test_hit_or_miss_kernel_larger_than_image() {
        let k = Kernel::parse("1,1,1\n1,1,1\n1,1,1").unwrap().offsets();
        let bin = Array2::from_elem((2, 2), FOREGROUND);
        assert_eq!(foreground_area(&hit_or_miss(bin.view(), &k, false)), 0);
    }

    #[test]
    fn test_thin_removes_and_thicken_keeps() {
        let mut bin = Array2::<u8>::zeros((5, 5));
        bin[[2, 2]] = FOREGROUND;
        let k = isolated_point_kernel();

        let thinned = thin(bin.view(), &k, false);
        let thickened = thicken(bin.view(), &k, false);

        assert_eq!(foreground_area(&thinned), 0);
        assert_eq!(thickened, bin);
    }

    #[test]
    fn test_thicken_fills_matched_background() {
        // Matches a background pixel with foreground left and right
        let k = Kernel::parse("1,0,1").unwrap().offsets();
        let bin = ndarray::arr2(&[[255u8, 0, 255, 0]]);

        let thickened = thicken(bin.view(), &k, false);

        assert_eq!(thickened, ndarray::arr2(&[[255u8, 255, 255, 0]]));
    }
}
