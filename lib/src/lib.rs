//! Image Manipulator - CPU image filtering pipeline
//!
//! This library applies chains of named filters to raster images. Every
//! filter is built on one of three engines:
//! - a 3×4 color matrix applied to each pixel independently
//! - a square kernel convolution with out-of-bounds taps skipped
//! - an area-averaging resampler used for pixelation and ASCII art
//!
//! # Example
//! ```no_run
//! use image_manipulator::{catalog, codec, processor, EncodeConfig, FilterOutput};
//! use std::path::Path;
//!
//! let filters = vec![
//!     catalog().parse_invocation("grayscale").unwrap(),
//!     catalog().parse_invocation("contrast:value=60").unwrap(),
//! ];
//! let image = codec::decode(Path::new("photo.jpg")).unwrap();
//! if let FilterOutput::Image(out) = processor::apply_chain(image, &filters).unwrap() {
//!     codec::encode(Path::new("out.png"), &out, &EncodeConfig::default()).unwrap();
//! }
//! ```

pub mod ascii;
pub mod buffer;
pub mod catalog;
pub mod codec;
pub mod color;
pub mod config;
pub mod convolution;
pub mod error;
pub mod filters;
pub mod lut;
pub mod processor;
pub mod resample;

// Re-export main types for convenience
pub use buffer::{Pixel, PixelBuffer};
pub use catalog::catalog;
pub use color::{ColorMatrix, Rgb};
pub use config::{AsciiConfig, BlurConfig, EncodeConfig, PixelateConfig};
pub use convolution::{Kernel, convolve};
pub use error::{CodecError, Error, FilterError};
pub use filters::{Filter, FilterOutput};
pub use processor::{apply_chain, process_file};
