//! Filter modules for image processing.
//!
//! ## Supported Formats
//!
//! Every filter works on normalized pixel arrays:
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | Plane | (H, W) | u8 / f64 | Luma, binary mask or gradient |
//!
//! Channel count is inferred from input array dimensions. Color-dependent
//! steps (luma, YCbCr) read R, G, B directly and are skipped for grayscale.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Take a view, return a freshly allocated array
//! - **Edge replication** - Neighborhood reads outside the image clamp to the border
//! - **Row parallel** - Output rows are independent and may run on rayon
//!
//! ## Filter Categories
//!
//! - **Kernel**: mean, sharpen, gaussian, custom convolution
//! - **Morphology**: dilate, erode, open, close, hit-or-miss thin/thicken
//! - **Noise**: median
//! - **Edge detection**: sobel
//! - **Binarize**: fixed, percent black, iterative mean
//! - **Histogram**: stretch, equalize
//! - **Pixel-wise**: linear scale

pub mod core;
pub mod color;
pub mod kernel;

pub mod adjust;
pub mod binarize;
pub mod edge;
pub mod histogram;
pub mod morphology;
pub mod noise;
