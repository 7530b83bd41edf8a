//! WebAssembly exports for RasterStag filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images travel
//! as flat, row-major, interleaved bytes with 1 (gray) or 3 (RGB) channels.
//!
//! Errors surface as JavaScript exceptions carrying the error message.

use wasm_bindgen::prelude::*;

use crate::filters::adjust::linear_scale_u8;
use crate::{EngineConfig, Error, Filter, Kernel, PixelBuffer};

fn js_error(err: Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode a canvas `ImageData` RGBA buffer into an RGB pixel buffer.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes (length = width * height * 4)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of RGB bytes (length = width * height * 3)
#[wasm_bindgen]
pub fn rgba_to_rgb_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let stride = width.checked_mul(4).ok_or_else(|| {
        js_error(Error::InvalidDimensions {
            width,
            height,
            stride: usize::MAX,
            len: data.len(),
        })
    })?;
    let raw = crate::RawImage {
        width,
        height,
        stride,
        format: crate::SourceFormat::Rgba8,
        data,
    };
    Ok(PixelBuffer::extract(raw).map_err(js_error)?.into_bytes())
}

/// Apply a named filter.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 or 3
/// * `name` - Filter name, e.g. "gaussian" or "binarize-mean"
/// * `kernel` - Kernel text for "conv" and "hom-*" filters
/// * `threshold` - Threshold for morphology and fixed binarization
/// * `percent_black` - Percentage for "binarize-percent"
///
/// # Returns
/// Flat array of bytes. Morphology, binarize and sobel return 1 channel.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    name: &str,
    kernel: Option<String>,
    threshold: Option<u8>,
    percent_black: Option<u8>,
) -> Result<Vec<u8>, JsValue> {
    let kernel = kernel
        .as_deref()
        .map(Kernel::parse)
        .transpose()
        .map_err(js_error)?;
    let filter = Filter::from_request(name, kernel, threshold, percent_black).map_err(js_error)?;
    let source = PixelBuffer::from_packed(width, height, channels, data.to_vec()).map_err(js_error)?;

    // No rayon pool in a plain wasm32 target.
    let result = filter
        .apply(&source, &EngineConfig::sequential())
        .map_err(js_error)?;
    Ok(result.into_bytes())
}

/// Multiply every sample by `factor_tenths / 10`, clamped to 0-255.
///
/// # Returns
/// Flat array of bytes with the same channel count
#[wasm_bindgen]
pub fn linear_scale_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    factor_tenths: i32,
) -> Result<Vec<u8>, JsValue> {
    let source = PixelBuffer::from_packed(width, height, channels, data.to_vec()).map_err(js_error)?;
    let result = linear_scale_u8(source.view(), factor_tenths);
    Ok(result.into_raw_vec_and_offset().0)
}
