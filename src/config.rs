//! Engine configuration.
//!
//! Knobs shared by every filter invocation. Defaults reproduce the reference
//! behaviour; only `parallel` changes performance, never the computed bytes.

/// What histogram stretch does when every luma value is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FlatHistogramPolicy {
    /// Return the source unchanged.
    #[default]
    PassThrough,
    /// Fail with [`crate::Error::DegenerateHistogram`].
    Reject,
}

/// Engine-wide parameters.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Process output rows on the rayon thread pool.
    pub parallel: bool,
    /// Behaviour of histogram stretch on a flat luma channel.
    pub flat_histogram: FlatHistogramPolicy,
    /// Convergence tolerance of the iterative two-class mean threshold.
    pub mean_epsilon: f64,
    /// Upper bound on iterative-mean rounds.
    pub mean_max_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            flat_histogram: FlatHistogramPolicy::PassThrough,
            mean_epsilon: 2.0,
            mean_max_iterations: 256,
        }
    }
}

impl EngineConfig {
    /// Configuration that keeps every loop on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }
}
