//! Bound filter invocations.
//!
//! A [`Filter`] is one named preset with its parameters already validated and
//! bound. Applying it runs exactly one engine call.

use crate::ascii::render_ascii;
use crate::buffer::PixelBuffer;
use crate::color::{ColorMatrix, Rgb};
use crate::config::{AsciiConfig, BlurConfig, MAX_BLUR_RADIUS, PixelateConfig};
use crate::convolution::{Kernel, convolve};
use crate::error::{Result, check_range};
use crate::resample::pixelate;

/// Result of applying a filter: a new image, or text for ASCII output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterOutput {
    Image(PixelBuffer),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Pixelate(PixelateConfig),
    Ascii(AsciiConfig),
    Outline,
    Sharpen,
    Contrast(i32),
    BoxBlur { radius: u32 },
    GaussianBlur(BlurConfig),
    Grayscale,
    Invert,
    Sepia,
    Color(Rgb),
    EnableChannels { red: bool, green: bool, blue: bool },
    OctopusDragon,
}

impl Filter {
    /// Catalog name of this filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Pixelate(_) => "pixelate",
            Filter::Ascii(_) => "ascii",
            Filter::Outline => "outline",
            Filter::Sharpen => "sharpen",
            Filter::Contrast(_) => "contrast",
            Filter::BoxBlur { .. } => "box-blur",
            Filter::GaussianBlur(_) => "gaussian-blur",
            Filter::Grayscale => "grayscale",
            Filter::Invert => "invert",
            Filter::Sepia => "sepia",
            Filter::Color(_) => "color",
            Filter::EnableChannels { .. } => "enable-channels",
            Filter::OctopusDragon => "octopus-dragon",
        }
    }

    /// Whether the filter yields text instead of an image.
    pub fn produces_text(&self) -> bool {
        matches!(self, Filter::Ascii(_))
    }

    /// Resolves the engine call this filter stands for.
    pub fn engine(&self) -> Result<Engine> {
        let engine = match self {
            Filter::Grayscale => Engine::Matrix(ColorMatrix::grayscale()),
            Filter::Invert => Engine::Matrix(ColorMatrix::invert()),
            Filter::Sepia => Engine::Matrix(ColorMatrix::sepia()),
            Filter::OctopusDragon => Engine::Matrix(ColorMatrix::octopus_dragon()),
            Filter::Contrast(value) => Engine::Matrix(ColorMatrix::contrast(*value)?),
            Filter::Color(rgb) => Engine::Matrix(ColorMatrix::tint(*rgb)),
            Filter::EnableChannels { red, green, blue } => {
                Engine::Matrix(ColorMatrix::enable_channels(*red, *green, *blue))
            }
            Filter::Outline => Engine::Kernel(Kernel::outline()),
            Filter::Sharpen => Engine::Kernel(Kernel::sharpen()),
            Filter::BoxBlur { radius } => {
                check_range("radius", *radius as f64, 1.0, MAX_BLUR_RADIUS as f64)?;
                Engine::Kernel(Kernel::box_blur(*radius as usize))
            }
            Filter::GaussianBlur(config) => {
                config.validate()?;
                Engine::Kernel(Kernel::gaussian(config.radius as usize, config.sigma)?)
            }
            Filter::Pixelate(config) => Engine::Pixelate(*config),
            Filter::Ascii(config) => Engine::Ascii(*config),
        };
        Ok(engine)
    }

    /// Runs the filter on `image`.
    pub fn apply(&self, image: &PixelBuffer) -> Result<FilterOutput> {
        match self.engine()? {
            Engine::Matrix(matrix) => Ok(FilterOutput::Image(matrix.apply(image))),
            Engine::Kernel(kernel) => Ok(FilterOutput::Image(convolve(image, &kernel))),
            Engine::Pixelate(config) => pixelate(image, &config).map(FilterOutput::Image),
            Engine::Ascii(config) => render_ascii(image, &config).map(FilterOutput::Text),
        }
    }
}

/// The engine call a filter resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Engine {
    Matrix(ColorMatrix),
    Kernel(Kernel),
    Pixelate(PixelateConfig),
    Ascii(AsciiConfig),
}
