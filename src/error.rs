//! Error types for rasterstag operations.

use thiserror::Error;

/// Main error type for buffer construction and filter dispatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unsupported format: {channels} channels (expected 1 or 3)")]
    UnsupportedFormat { channels: usize },

    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("Degenerate histogram: all luma values are equal")]
    DegenerateHistogram,

    #[error("Invalid buffer dimensions: {width}x{height}, stride {stride}, {len} bytes")]
    InvalidDimensions {
        width: usize,
        height: usize,
        stride: usize,
        len: usize,
    },

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Filter '{filter}' requires parameter '{parameter}'")]
    MissingParameter {
        filter: &'static str,
        parameter: &'static str,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for rasterstag operations
pub type Result<T> = std::result::Result<T, Error>;
