//! Filter dispatch.
//!
//! [`Filter`] is the closed set of operations the engine can run, each
//! variant carrying the parameters it needs. String requests from a UI layer
//! are mapped onto it once by [`Filter::from_request`]; after that, routing is
//! an exhaustive `match`.
//!
//! ## Output Formats
//!
//! | Filters | Output channels |
//! |---------|-----------------|
//! | Mean, Sharpen, Gaussian, Convolve, Median | same as source |
//! | HistogramStretch, HistogramEqualize | same as source |
//! | Morphology, Hit-or-Miss, Binarize*, Sobel | 1 |

use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::filters::color::{luma_plane, plane_to_image};
use crate::filters::kernel::{convolve, Kernel};
use crate::filters::{binarize, edge, histogram, morphology, noise};

/// One image operation with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Mean,
    Sharpen,
    Gaussian,
    Convolve(Kernel),
    Dilate { threshold: u8 },
    Erode { threshold: u8 },
    Open { threshold: u8 },
    Close { threshold: u8 },
    HitOrMissThin { kernel: Kernel, threshold: u8 },
    HitOrMissThicken { kernel: Kernel, threshold: u8 },
    Median,
    Sobel,
    BinarizeFixed { threshold: u8 },
    BinarizePercentBlack { percent: u8 },
    BinarizeIterativeMean,
    HistogramStretch,
    HistogramEqualize,
}

impl Filter {
    /// Build a filter from a name and optional parameters.
    ///
    /// Names are matched case-insensitively: `mean`, `sharpening`,
    /// `gaussian`, `conv`, `dilation`, `erosion`, `open`, `close`,
    /// `hom-thin`, `hom-thicken`, `median`, `sobel`, `binarize-fixed`,
    /// `binarize-percent`, `binarize-mean`, `histo-stretch`,
    /// `histo-equalize`. Parameters a filter does not use are ignored.
    ///
    /// # Errors
    /// * `UnknownFilter` for any other name
    /// * `InvalidKernel` if a kernel filter gets no kernel
    /// * `MissingParameter` if a threshold or percent is required but absent
    /// * `InvalidParameter` if `percent_black` exceeds 100
    pub fn from_request(
        name: &str,
        kernel: Option<Kernel>,
        threshold: Option<u8>,
        percent_black: Option<u8>,
    ) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();

        let need_kernel = |kernel: Option<Kernel>| {
            kernel.ok_or_else(|| Error::InvalidKernel(format!("filter '{}' requires a kernel", key)))
        };
        let need_threshold = |filter: &'static str| {
            threshold.ok_or(Error::MissingParameter {
                filter,
                parameter: "threshold",
            })
        };

        let filter = match key.as_str() {
            "mean" => Filter::Mean,
            "sharpening" | "sharpen" => Filter::Sharpen,
            "gaussian" => Filter::Gaussian,
            "conv" | "convolve" => Filter::Convolve(need_kernel(kernel)?),
            "dilation" | "dilate" => Filter::Dilate {
                threshold: need_threshold("dilation")?,
            },
            "erosion" | "erode" => Filter::Erode {
                threshold: need_threshold("erosion")?,
            },
            "open" => Filter::Open {
                threshold: need_threshold("open")?,
            },
            "close" => Filter::Close {
                threshold: need_threshold("close")?,
            },
            "hom-thin" => Filter::HitOrMissThin {
                kernel: need_kernel(kernel)?,
                threshold: need_threshold("hom-thin")?,
            },
            "hom-thicken" => Filter::HitOrMissThicken {
                kernel: need_kernel(kernel)?,
                threshold: need_threshold("hom-thicken")?,
            },
            "median" => Filter::Median,
            "sobel" => Filter::Sobel,
            "binarize-fixed" => Filter::BinarizeFixed {
                threshold: need_threshold("binarize-fixed")?,
            },
            "binarize-percent" => {
                let percent = percent_black.ok_or(Error::MissingParameter {
                    filter: "binarize-percent",
                    parameter: "percent_black",
                })?;
                if percent > 100 {
                    return Err(Error::InvalidParameter {
                        name: "percent_black",
                        value: percent.to_string(),
                        reason: "must be between 0 and 100".into(),
                    });
                }
                Filter::BinarizePercentBlack { percent }
            }
            "binarize-mean" => Filter::BinarizeIterativeMean,
            "histo-stretch" => Filter::HistogramStretch,
            "histo-equalize" => Filter::HistogramEqualize,
            _ => return Err(Error::UnknownFilter(name.to_string())),
        };

        Ok(filter)
    }

    /// Canonical request name of this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Mean => "mean",
            Filter::Sharpen => "sharpening",
            Filter::Gaussian => "gaussian",
            Filter::Convolve(_) => "conv",
            Filter::Dilate { .. } => "dilation",
            Filter::Erode { .. } => "erosion",
            Filter::Open { .. } => "open",
            Filter::Close { .. } => "close",
            Filter::HitOrMissThin { .. } => "hom-thin",
            Filter::HitOrMissThicken { .. } => "hom-thicken",
            Filter::Median => "median",
            Filter::Sobel => "sobel",
            Filter::BinarizeFixed { .. } => "binarize-fixed",
            Filter::BinarizePercentBlack { .. } => "binarize-percent",
            Filter::BinarizeIterativeMean => "binarize-mean",
            Filter::HistogramStretch => "histo-stretch",
            Filter::HistogramEqualize => "histo-equalize",
        }
    }

    /// Run the filter on `source`, producing a new buffer.
    pub fn apply(&self, source: &PixelBuffer, config: &EngineConfig) -> Result<PixelBuffer> {
        log::debug!(
            "applying {} to {}x{}x{} buffer",
            self.name(),
            source.width(),
            source.height(),
            source.channels()
        );

        let input = source.view();
        let parallel = config.parallel;

        let output = match self {
            Filter::Mean => convolve(input, &Kernel::mean().offsets(), parallel),
            Filter::Sharpen => convolve(input, &Kernel::sharpen().offsets(), parallel),
            Filter::Gaussian => convolve(input, &Kernel::gaussian().offsets(), parallel),
            Filter::Convolve(kernel) => convolve(input, &kernel.offsets(), parallel),

            Filter::Dilate { threshold }
            | Filter::Erode { threshold }
            | Filter::Open { threshold }
            | Filter::Close { threshold } => {
                let bin = morphology::threshold_above(luma_plane(input).view(), *threshold);
                let result = match self {
                    Filter::Dilate { .. } => morphology::dilate(bin.view(), parallel),
                    Filter::Erode { .. } => morphology::erode(bin.view(), parallel),
                    Filter::Open { .. } => morphology::open(bin.view(), parallel),
                    _ => morphology::close(bin.view(), parallel),
                };
                plane_to_image(result)
            }

            Filter::HitOrMissThin { kernel, threshold } => {
                let bin = morphology::threshold_above(luma_plane(input).view(), *threshold);
                plane_to_image(morphology::thin(bin.view(), &kernel.offsets(), parallel))
            }
            Filter::HitOrMissThicken { kernel, threshold } => {
                let bin = morphology::threshold_above(luma_plane(input).view(), *threshold);
                plane_to_image(morphology::thicken(bin.view(), &kernel.offsets(), parallel))
            }

            Filter::Median => noise::median_u8(input, parallel),
            Filter::Sobel => plane_to_image(edge::sobel_u8(input, parallel)),

            Filter::BinarizeFixed { threshold } => {
                plane_to_image(binarize::fixed_threshold(luma_plane(input).view(), *threshold))
            }
            Filter::BinarizePercentBlack { percent } => {
                plane_to_image(binarize::percent_black(luma_plane(input).view(), *percent)?)
            }
            Filter::BinarizeIterativeMean => plane_to_image(binarize::iterative_mean(
                luma_plane(input).view(),
                config.mean_epsilon,
                config.mean_max_iterations,
            )),

            Filter::HistogramStretch => histogram::stretch(input, config.flat_histogram)?,
            Filter::HistogramEqualize => histogram::equalize(input),
        };

        PixelBuffer::from_array(output)
    }
}
