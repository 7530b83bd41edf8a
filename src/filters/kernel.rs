//! Convolution kernels: parsing, offset derivation, dense convolution.
//!
//! A [`Kernel`] is a 2D coefficient matrix with an implicit center. It is
//! flattened once into an [`OffsetKernel`] of `(coeff, dx, dy)` taps, which
//! convolution, hit-or-miss matching and the Sobel operator all consume.
//!
//! ## Center Derivation
//!
//! For a dimension of length `L` the offset of index `i` is `i - L / 2`:
//! - odd `L = 3`: offsets `-1..=1`
//! - even `L = 4`: offsets `-2..=1` (asymmetric)
//!
//! ## Boundary Policy
//!
//! Convolution always replicates the nearest edge pixel. There is no zero
//! padding anywhere in this module.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use super::color::to_u8;
use super::core::{clamp_coord, for_each_row};
use crate::error::{Error, Result};

/// 2D matrix of real-valued coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    coeffs: Array2<f64>,
}

/// One kernel coefficient and its displacement from the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelTap {
    pub coeff: f64,
    pub dx: isize,
    pub dy: isize,
}

/// Kernel flattened into row-major ordered taps.
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetKernel {
    taps: Vec<KernelTap>,
}

/// Bounding box of an offset kernel's displacements (inclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelExtent {
    pub min_dx: isize,
    pub max_dx: isize,
    pub min_dy: isize,
    pub max_dy: isize,
}

/// Offset of position `index` along an axis of length `len`.
#[inline]
pub fn axis_offset(index: usize, len: usize) -> isize {
    index as isize - (len / 2) as isize
}

impl Kernel {
    /// Build a kernel from equal-length rows.
    ///
    /// # Errors
    /// `InvalidKernel` for empty input, ragged rows or non-finite values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::InvalidKernel("kernel is empty".into()));
        }
        if let Some(i) = rows.iter().position(|r| r.len() != width) {
            return Err(Error::InvalidKernel(format!(
                "row {} has {} values, expected {}",
                i + 1,
                rows[i].len(),
                width
            )));
        }

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let coeffs = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| Error::InvalidKernel(e.to_string()))?;
        Self::from_array(coeffs)
    }

    /// Wrap a coefficient matrix.
    pub fn from_array(coeffs: Array2<f64>) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(Error::InvalidKernel("kernel is empty".into()));
        }
        if coeffs.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidKernel("coefficients must be finite".into()));
        }
        Ok(Self { coeffs })
    }

    /// Parse kernel text: comma-separated numbers per row, one row per line.
    ///
    /// Blank lines are skipped and trailing commas on a row are tolerated.
    ///
    /// ```
    /// use rasterstag::Kernel;
    ///
    /// let k = Kernel::parse("0, -1, 0\n-1, 5, -1,\n0, -1, 0").unwrap();
    /// assert_eq!((k.rows(), k.cols()), (3, 3));
    /// assert!(Kernel::parse("1, 2\n3").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut tokens: Vec<&str> = line.split(',').map(str::trim).collect();
            while tokens.last().is_some_and(|t| t.is_empty()) {
                tokens.pop();
            }

            let row = tokens
                .iter()
                .map(|t| {
                    t.parse::<f64>().map_err(|_| {
                        Error::InvalidKernel(format!("line {}: '{}' is not a number", line_no + 1, t))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Box filter, 3x3 of 1/9.
    pub fn mean() -> Self {
        Self {
            coeffs: Array2::from_elem((3, 3), 1.0 / 9.0),
        }
    }

    /// Laplacian-style sharpening kernel.
    pub fn sharpen() -> Self {
        Self {
            coeffs: ndarray::arr2(&[[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]]),
        }
    }

    /// Integer-weighted 5x5 Gaussian normalized by 273.
    pub fn gaussian() -> Self {
        let weights = ndarray::arr2(&[
            [1.0, 4.0, 7.0, 4.0, 1.0],
            [4.0, 16.0, 26.0, 16.0, 4.0],
            [7.0, 26.0, 41.0, 26.0, 7.0],
            [4.0, 16.0, 26.0, 16.0, 4.0],
            [1.0, 4.0, 7.0, 4.0, 1.0],
        ]);
        Self {
            coeffs: weights / 273.0,
        }
    }

    /// Horizontal Sobel gradient.
    pub fn sobel_x() -> Self {
        Self {
            coeffs: ndarray::arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
        }
    }

    /// Vertical Sobel gradient.
    pub fn sobel_y() -> Self {
        Self {
            coeffs: ndarray::arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
        }
    }

    pub fn rows(&self) -> usize {
        self.coeffs.nrows()
    }

    pub fn cols(&self) -> usize {
        self.coeffs.ncols()
    }

    pub fn coeffs(&self) -> ArrayView2<'_, f64> {
        self.coeffs.view()
    }

    /// Flatten into row-major `(coeff, dx, dy)` taps.
    pub fn offsets(&self) -> OffsetKernel {
        let (rows, cols) = self.coeffs.dim();
        let taps = self
            .coeffs
            .indexed_iter()
            .map(|((ky, kx), &coeff)| KernelTap {
                coeff,
                dx: axis_offset(kx, cols),
                dy: axis_offset(ky, rows),
            })
            .collect();
        OffsetKernel { taps }
    }
}

impl OffsetKernel {
    pub fn taps(&self) -> &[KernelTap] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// Displacement bounds over all taps.
    pub fn extent(&self) -> KernelExtent {
        let mut extent = KernelExtent {
            min_dx: 0,
            max_dx: 0,
            min_dy: 0,
            max_dy: 0,
        };
        for tap in &self.taps {
            extent.min_dx = extent.min_dx.min(tap.dx);
            extent.max_dx = extent.max_dx.max(tap.dx);
            extent.min_dy = extent.min_dy.min(tap.dy);
            extent.max_dy = extent.max_dy.max(tap.dy);
        }
        extent
    }
}

/// Convolve every channel with an offset kernel.
///
/// Sums are accumulated in `f64`, then rounded and clamped to 0-255.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `kernel` - Offset kernel
/// * `parallel` - Split rows across the rayon pool
///
/// # Returns
/// Convolved image with same dimensions and channel count
pub fn convolve(input: ArrayView3<u8>, kernel: &OffsetKernel, parallel: bool) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for_each_row(&mut output, parallel, |y, mut row| {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f64;
                for tap in kernel.taps() {
                    let sx = clamp_coord(x, tap.dx, width);
                    let sy = clamp_coord(y, tap.dy, height);
                    sum += tap.coeff * input[[sy, sx, c]] as f64;
                }
                row[[x, c]] = to_u8(sum);
            }
        }
    });

    output
}

/// Correlate a single plane without clamping the result.
///
/// Used by gradient operators that combine several responses before
/// quantizing.
pub fn correlate_plane(plane: ArrayView2<u8>, kernel: &OffsetKernel, parallel: bool) -> Array2<f64> {
    let (height, width) = plane.dim();
    let mut output = Array2::<f64>::zeros((height, width));

    for_each_row(&mut output, parallel, |y, mut row| {
        for x in 0..width {
            let mut sum = 0.0f64;
            for tap in kernel.taps() {
                let sx = clamp_coord(x, tap.dx, width);
                let sy = clamp_coord(y, tap.dy, height);
                sum += tap.coeff * plane[[sy, sx]] as f64;
            }
            row[x] = sum;
        }
    });

    output
}
