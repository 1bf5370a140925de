use crate::error::{FilterError, Result, check_range};

/// Largest accepted blur radius.
pub const MAX_BLUR_RADIUS: u32 = 5;
/// Largest accepted Gaussian sigma.
pub const MAX_SIGMA: f64 = 25.0;

/// Configuration for pixelation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelateConfig {
    pub divs: u32, // chunks along the longest side, default 100
}

impl Default for PixelateConfig {
    fn default() -> Self {
        Self { divs: 100 }
    }
}

impl PixelateConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("divs", self.divs as f64, 1.0, u32::MAX as f64)
    }
}

/// Configuration for ASCII art rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsciiConfig {
    pub cols: u32,  // characters per line, default 80
    pub ratio: f64, // glyph height/width compensation, default 2.0
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            cols: 80,
            ratio: 2.0,
        }
    }
}

impl AsciiConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("cols", self.cols as f64, 1.0, u32::MAX as f64)?;
        if !(self.ratio > 0.0 && self.ratio.is_finite()) {
            return Err(FilterError::OutOfRangeParameter {
                name: "ratio",
                value: self.ratio,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        Ok(())
    }
}

/// Configuration for the blur kernels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurConfig {
    pub radius: u32, // 1-5, default 1
    pub sigma: f64,  // Gaussian only, (0.0, 25.0], default 0.3
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            sigma: 0.3,
        }
    }
}

impl BlurConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("radius", self.radius as f64, 1.0, MAX_BLUR_RADIUS as f64)?;
        check_range("sigma", self.sigma, 0.0, MAX_SIGMA)?;
        if self.sigma == 0.0 {
            return Err(FilterError::OutOfRangeParameter {
                name: "sigma",
                value: self.sigma,
                min: 0.0,
                max: MAX_SIGMA,
            });
        }
        Ok(())
    }
}

/// Configuration for writing image files
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeConfig {
    pub jpeg_quality: u8, // 1-100, default 50
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self { jpeg_quality: 50 }
    }
}

impl EncodeConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("jpeg_quality", self.jpeg_quality as f64, 1.0, 100.0)
    }
}
