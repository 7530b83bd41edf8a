//! RasterStag Rust Engine
//!
//! Raster image processing: an original image, a derived ("modified") image,
//! and a library of pixel and neighborhood transforms that always recompute
//! the derived image from the untouched original. Python bindings via PyO3 and
//! WASM bindings for JavaScript are available behind cargo features.
//!
//! ## Image Format
//! Images are normalized on load to one of two layouts:
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels, R,G,B order
//!
//! Alpha, BGR/ARGB byte orders and row padding are dealt with once, in
//! [`PixelBuffer::extract`], so every filter sees the same shape.
//!
//! ## Filter Architecture
//! Filters are named by the closed [`Filter`] enum. Some produce a different
//! channel count than their input: morphology, binarization and Sobel always
//! return a single-channel image.
//!
//! ```
//! use rasterstag::{Filter, ImageSession, PixelBuffer};
//!
//! let mut session = ImageSession::new();
//! session.load(PixelBuffer::from_packed(2, 1, 1, vec![40, 200]).unwrap());
//! let out = session.apply_filter(&Filter::BinarizeFixed { threshold: 128 }).unwrap();
//! assert_eq!(out.as_bytes(), &[0, 255]);
//! ```

pub mod buffer;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filters;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::{PixelBuffer, RawImage, SourceFormat};
pub use config::{EngineConfig, FlatHistogramPolicy};
pub use dispatch::Filter;
pub use error::{Error, Result};
pub use filters::kernel::Kernel;
pub use session::ImageSession;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::adjust::linear_scale_u8;
    use crate::{EngineConfig, Filter, Kernel, PixelBuffer};

    fn value_error(err: crate::Error) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Apply a named filter to a (H, W, 1) or (H, W, 3) u8 image.
    ///
    /// `kernel` is kernel text: comma-separated rows, one per line.
    /// Morphology, binarize and sobel return a (H, W, 1) image.
    #[pyfunction]
    #[pyo3(signature = (image, name, kernel=None, threshold=None, percent_black=None, parallel=true))]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        name: &str,
        kernel: Option<&str>,
        threshold: Option<u8>,
        percent_black: Option<u8>,
        parallel: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let kernel = kernel.map(Kernel::parse).transpose().map_err(value_error)?;
        let filter = Filter::from_request(name, kernel, threshold, percent_black).map_err(value_error)?;
        let source = PixelBuffer::from_array(image.as_array().to_owned()).map_err(value_error)?;
        let config = EngineConfig {
            parallel,
            ..Default::default()
        };

        let result = py
            .allow_threads(|| filter.apply(&source, &config))
            .map_err(value_error)?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Linear Scale
    // ========================================================================

    /// Multiply every sample by `factor_tenths / 10`, clamped to 0-255.
    #[pyfunction]
    pub fn linear_scale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        factor_tenths: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let source = PixelBuffer::from_array(image.as_array().to_owned()).map_err(value_error)?;
        let result = linear_scale_u8(source.view(), factor_tenths);
        Ok(result.into_pyarray(py))
    }

    /// RasterStag Rust extension module
    #[pymodule]
    pub fn rasterstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(linear_scale, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::rasterstag;
