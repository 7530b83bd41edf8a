//! Normalized pixel buffers.
//!
//! A [`PixelBuffer`] is the only image type the filters see. It always holds
//! 8-bit samples in one of two layouts:
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale8 | (H, W, 1) | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | Red, green, blue, 0-255 |
//!
//! Decoded images in other layouts (BGR, alpha-carrying, padded rows) are
//! normalized once by [`PixelBuffer::extract`]. Owned buffers are packed, so
//! their stride is always `width * channels`.

use ndarray::{Array3, ArrayView3};

use crate::error::{Error, Result};

/// Channel layout of a decoded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Gray8,
    GrayAlpha8,
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    Argb8,
    /// Unknown layout, passed through if the channel count is 1 or 3.
    Other { channels: usize },
}

impl SourceFormat {
    /// Bytes per pixel in the source data.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            SourceFormat::Gray8 => 1,
            SourceFormat::GrayAlpha8 => 2,
            SourceFormat::Rgb8 | SourceFormat::Bgr8 => 3,
            SourceFormat::Rgba8 | SourceFormat::Bgra8 | SourceFormat::Argb8 => 4,
            SourceFormat::Other { channels } => channels,
        }
    }

    /// Output channel count plus the source byte index of each output channel.
    fn channel_map(self) -> Result<&'static [usize]> {
        Ok(match self {
            SourceFormat::Gray8 | SourceFormat::GrayAlpha8 => &[0],
            SourceFormat::Rgb8 | SourceFormat::Rgba8 => &[0, 1, 2],
            SourceFormat::Bgr8 | SourceFormat::Bgra8 => &[2, 1, 0],
            SourceFormat::Argb8 => &[1, 2, 3],
            SourceFormat::Other { channels: 1 } => &[0],
            SourceFormat::Other { channels: 3 } => &[0, 1, 2],
            SourceFormat::Other { channels } => return Err(Error::UnsupportedFormat { channels }),
        })
    }
}

/// Borrowed view of a decoded image as handed over by the caller.
#[derive(Clone, Copy, Debug)]
pub struct RawImage<'a> {
    pub width: usize,
    pub height: usize,
    /// Bytes per row, at least `width * format.bytes_per_pixel()`.
    pub stride: usize,
    pub format: SourceFormat,
    pub data: &'a [u8],
}

/// Immutable 8-bit image with 1 (gray) or 3 (RGB) channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
}

impl PixelBuffer {
    /// Build a buffer from possibly padded rows.
    ///
    /// Only the first `width * channels` bytes of each row are kept.
    ///
    /// # Errors
    /// * `UnsupportedFormat` if `channels` is not 1 or 3
    /// * `InvalidDimensions` if the size is empty, the stride is shorter than
    ///   a row, or `data` is shorter than `stride * height`
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
        data: &[u8],
    ) -> Result<Self> {
        Self::extract(RawImage {
            width,
            height,
            stride,
            format: SourceFormat::Other { channels },
            data,
        })
    }

    /// Build a buffer from tightly packed row-major bytes.
    pub fn from_packed(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_channels(channels)?;
        let stride = width.checked_mul(channels);
        let invalid = Error::InvalidDimensions {
            width,
            height,
            stride: stride.unwrap_or(usize::MAX),
            len: data.len(),
        };
        let expected = stride.and_then(|s| s.checked_mul(height));
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(invalid);
        }
        let pixels = Array3::from_shape_vec((height, width, channels), data).map_err(|_| invalid)?;
        Ok(Self { pixels })
    }

    /// Wrap an `(height, width, channels)` array.
    pub fn from_array(pixels: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = pixels.dim();
        check_channels(channels)?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width,
                height,
                stride: width * channels,
                len: pixels.len(),
            });
        }
        // Backing storage must hold exactly the image, row-major, from index 0.
        let dim = pixels.raw_dim();
        let len = pixels.len();
        let data = if pixels.is_standard_layout() {
            let (mut data, offset) = pixels.into_raw_vec_and_offset();
            data.drain(..offset.unwrap_or(0));
            data.truncate(len);
            data
        } else {
            pixels.iter().copied().collect()
        };
        let pixels = Array3::from_shape_vec(dim, data).map_err(|_| Error::InvalidDimensions {
            width,
            height,
            stride: width * channels,
            len,
        })?;
        Ok(Self { pixels })
    }

    /// Normalize a decoded image: drop alpha, reorder to R,G,B, strip padding.
    pub fn extract(raw: RawImage<'_>) -> Result<Self> {
        let map = raw.format.channel_map()?;
        let bpp = raw.format.bytes_per_pixel();
        let invalid = Error::InvalidDimensions {
            width: raw.width,
            height: raw.height,
            stride: raw.stride,
            len: raw.data.len(),
        };

        let row_bytes = raw.width.checked_mul(bpp).ok_or_else(|| invalid.clone())?;
        let total = raw.stride.checked_mul(raw.height).ok_or_else(|| invalid.clone())?;
        if raw.width == 0 || raw.height == 0 || raw.stride < row_bytes || raw.data.len() < total {
            return Err(invalid);
        }

        let channels = map.len();
        let mut pixels = Array3::<u8>::zeros((raw.height, raw.width, channels));
        for y in 0..raw.height {
            let row = &raw.data[y * raw.stride..y * raw.stride + row_bytes];
            for (x, px) in row.chunks_exact(bpp).enumerate() {
                for (c, &src) in map.iter().enumerate() {
                    pixels[[y, x, c]] = px[src];
                }
            }
        }

        Ok(Self { pixels })
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }

    /// Bytes per row. Owned buffers are never padded.
    pub fn stride(&self) -> usize {
        self.width() * self.channels()
    }

    pub fn is_gray(&self) -> bool {
        self.channels() == 1
    }

    /// Sample at column `x`, row `y`, channel `c`.
    pub fn pixel(&self, x: usize, y: usize, c: usize) -> u8 {
        self.pixels[[y, x, c]]
    }

    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Row-major interleaved bytes without padding.
    pub fn as_bytes(&self) -> &[u8] {
        // Standard layout is guaranteed by every constructor.
        self.pixels.as_slice().unwrap_or_default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels.into_raw_vec_and_offset().0
    }

    pub fn into_array(self) -> Array3<u8> {
        self.pixels
    }
}

fn check_channels(channels: usize) -> Result<()> {
    if channels == 1 || channels == 3 {
        Ok(())
    } else {
        Err(Error::UnsupportedFormat { channels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_strips_padding() {
        // 2x2 gray with 2 bytes of padding per row
        let data = [10, 20, 0xEE, 0xEE, 30, 40, 0xEE, 0xEE];
        let buf = PixelBuffer::from_raw(2, 2, 1, 4, &data).unwrap();

        assert_eq!(buf.stride(), 2);
        assert_eq!(buf.as_bytes(), &[10, 20, 30, 40]);
        assert_eq!(buf.pixel(1, 1, 0), 40);
    }

    #[test]
    fn test_extract_bgra_reorders_and_drops_alpha() {
        let data = [1, 2, 3, 255, 4, 5, 6, 128];
        let raw = RawImage {
            width: 2,
            height: 1,
            stride: 8,
            format: SourceFormat::Bgra8,
            data: &data,
        };
        let buf = PixelBuffer::extract(raw).unwrap();

        assert_eq!(buf.channels(), 3);
        assert_eq!(buf.as_bytes(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_extract_argb() {
        let data = [9, 10, 20, 30];
        let raw = RawImage {
            width: 1,
            height: 1,
            stride: 4,
            format: SourceFormat::Argb8,
            data: &data,
        };
        let buf = PixelBuffer::extract(raw).unwrap();
        assert_eq!(buf.as_bytes(), &[10, 20, 30]);
    }

    #[test]
    fn test_extract_gray_alpha_becomes_gray() {
        let data = [50, 255, 60, 0];
        let raw = RawImage {
            width: 2,
            height: 1,
            stride: 4,
            format: SourceFormat::GrayAlpha8,
            data: &data,
        };
        let buf = PixelBuffer::extract(raw).unwrap();
        assert!(buf.is_gray());
        assert_eq!(buf.as_bytes(), &[50, 60]);
    }

    #[test]
    fn test_unsupported_channel_count() {
        let err = PixelBuffer::from_raw(1, 1, 2, 2, &[0, 0]).unwrap_err();
        assert_eq!(err, Error::UnsupportedFormat { channels: 2 });

        let err = PixelBuffer::from_packed(1, 1, 4, vec![0; 4]).unwrap_err();
        assert_eq!(err, Error::UnsupportedFormat { channels: 4 });
    }

    #[test]
    fn test_short_data_rejected() {
        let err = PixelBuffer::from_raw(2, 2, 3, 8, &[0; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_stride_shorter_than_row_rejected() {
        let err = PixelBuffer::from_raw(4, 1, 3, 6, &[0; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_empty_rejected() {
        let err = PixelBuffer::from_packed(0, 3, 1, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_offset_layout_matches_bytes() {
        let data: Vec<u8> = (0..18).collect();
        let buf = PixelBuffer::from_packed(3, 2, 3, data.clone()).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                for c in 0..3 {
                    assert_eq!(buf.pixel(x, y, c), data[y * buf.stride() + x * 3 + c]);
                }
            }
        }
    }

    #[test]
    fn test_from_array_non_standard_layout() {
        let mut arr = Array3::<u8>::zeros((3, 2, 1));
        arr[[2, 0, 0]] = 7;
        // Transposed (2, 3, 1) view with column-major strides
        let transposed = arr.permuted_axes([1, 0, 2]);
        assert!(!transposed.is_standard_layout());
        let buf = PixelBuffer::from_array(transposed).unwrap();
        assert_eq!(buf.as_bytes(), &[0, 0, 7, 0, 0, 0]);
    }

    #[test]
    fn test_from_array_sliced_rows_drop_hidden_data() {
        let arr = Array3::from_shape_vec((3, 2, 1), vec![0u8, 1, 10, 11, 20, 21]).unwrap();
        let sliced = arr.slice_move(ndarray::s![1.., .., ..]);
        assert!(sliced.is_standard_layout());

        let buf = PixelBuffer::from_array(sliced).unwrap();

        assert_eq!((buf.width(), buf.height()), (2, 2));
        assert_eq!(buf.as_bytes(), &[10, 11, 20, 21]);
        assert_eq!(buf.into_bytes(), vec![10, 11, 20, 21]);
    }

    #[test]
    fn test_extract_oversized_stride_rejected() {
        let data = [0u8; 4];
        let raw = RawImage {
            width: 1,
            height: 2,
            stride: usize::MAX / 2 + 1,
            format: SourceFormat::Gray8,
            data: &data,
        };
        let err = PixelBuffer::extract(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { height: 2, .. }));
    }

    #[test]
    fn test_extract_oversized_width_rejected() {
        let data = [0u8; 4];
        let raw = RawImage {
            width: usize::MAX / 2,
            height: 1,
            stride: 4,
            format: SourceFormat::Rgba8,
            data: &data,
        };
        let err = PixelBuffer::extract(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_from_packed_oversized_rejected() {
        let err = PixelBuffer::from_packed(usize::MAX / 2, 3, 3, vec![0; 9]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }
}
