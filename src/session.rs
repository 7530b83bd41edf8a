//! Original/modified image pair.
//!
//! An [`ImageSession`] holds the loaded image untouched and a derived buffer
//! produced by the last successful operation. Every operation starts again
//! from the original, so results never chain.

use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::dispatch::Filter;
use crate::error::{Error, Result};
use crate::filters::adjust::linear_scale_u8;
use crate::filters::kernel::Kernel;

#[derive(Clone, Debug, Default)]
pub struct ImageSession {
    config: EngineConfig,
    original: Option<PixelBuffer>,
    modified: Option<PixelBuffer>,
}

impl ImageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the original image and discard any derived result.
    pub fn load(&mut self, buffer: PixelBuffer) {
        log::debug!(
            "loaded {}x{} image with {} channel(s)",
            buffer.width(),
            buffer.height(),
            buffer.channels()
        );
        self.original = Some(buffer);
        self.modified = None;
    }

    /// Run `filter` on the original and store the result as the modified image.
    ///
    /// On error the session is left exactly as it was.
    pub fn apply_filter(&mut self, filter: &Filter) -> Result<&PixelBuffer> {
        let original = self.original.as_ref().ok_or(Error::NoImageLoaded)?;
        let result = filter.apply(original, &self.config)?;
        Ok(&*self.modified.insert(result))
    }

    /// String form of [`apply_filter`](Self::apply_filter).
    pub fn apply_request(
        &mut self,
        name: &str,
        kernel: Option<Kernel>,
        threshold: Option<u8>,
        percent_black: Option<u8>,
    ) -> Result<&PixelBuffer> {
        let filter = Filter::from_request(name, kernel, threshold, percent_black)?;
        self.apply_filter(&filter)
    }

    /// Multiply the original by `factor_tenths / 10` into the modified image.
    pub fn apply_linear_scale(&mut self, factor_tenths: i32) -> Result<&PixelBuffer> {
        let original = self.original.as_ref().ok_or(Error::NoImageLoaded)?;
        log::debug!("linear scale by {}/10", factor_tenths);
        let scaled = PixelBuffer::from_array(linear_scale_u8(original.view(), factor_tenths))?;
        Ok(&*self.modified.insert(scaled))
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn modified(&self) -> Option<&PixelBuffer> {
        self.modified.as_ref()
    }

    /// The modified image if one exists, otherwise the original.
    pub fn displayed(&self) -> Option<&PixelBuffer> {
        self.modified.as_ref().or(self.original.as_ref())
    }
}
