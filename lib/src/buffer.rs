//! Owned 8-bit raster storage shared by every engine.
//!
//! Samples are row-major with interleaved channels. Engines never mutate their
//! input: each transform reads one `PixelBuffer` and allocates a fresh one.

use crate::error::{FilterError, Result};
use image::{GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use rayon::prelude::*;

/// Transient RGB view of one pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rounded mean of the three channels.
    pub fn mean(self) -> u8 {
        let sum = self.r as u32 + self.g as u32 + self.b as u32;
        (sum as f64 / 3.0).round() as u8
    }
}

/// Raster image with 1 to 4 interleaved 8-bit channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a zero-filled (black) buffer.
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = checked_len(width, height, channels)?;
        Ok(Self {
            width,
            height,
            channels,
            samples: vec![0; len],
        })
    }

    /// Wraps existing samples, rejecting any length mismatch.
    pub fn from_raw(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self> {
        let len = checked_len(width, height, channels)?;
        if samples.len() != len {
            return Err(FilterError::InvalidDimensions(format!(
                "{width}x{height}x{channels} needs {len} samples, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Builds a buffer by evaluating `f(row, col)` for every pixel.
    ///
    /// Only the first `channels` entries of the returned array are used.
    pub fn from_fn<F>(width: u32, height: u32, channels: u8, f: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> [u8; 4],
    {
        let mut buffer = Self::new(width, height, channels)?;
        let ch = channels as usize;
        for (idx, px) in buffer.samples.chunks_exact_mut(ch).enumerate() {
            let row = (idx / width as usize) as u32;
            let col = (idx % width as usize) as u32;
            px.copy_from_slice(&f(row, col)[..ch]);
        }
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Number of leading channels that carry color (3 for RGB/RGBA, 1 for gray).
    ///
    /// Any remaining channel is alpha and is passed through untouched by the
    /// color and convolution engines.
    pub fn color_channels(&self) -> usize {
        if self.channels >= 3 { 3 } else { 1 }
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    /// Number of samples in one row.
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    pub(crate) fn index(&self, row: u32, col: u32) -> usize {
        (row as usize * self.width as usize + col as usize) * self.channels as usize
    }

    /// Reads the pixel at (`row`, `col`), or `None` outside the image.
    ///
    /// Gray images report their single channel as r, g and b.
    pub fn get(&self, row: u32, col: u32) -> Option<Pixel> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let i = self.index(row, col);
        Some(read_pixel(&self.samples[i..i + self.channels as usize]))
    }

    /// Writes the pixel at (`row`, `col`); alpha is left unchanged.
    ///
    /// Gray images store the rounded mean of r, g and b.
    pub fn set(&mut self, row: u32, col: u32, pixel: Pixel) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(FilterError::InvalidDimensions(format!(
                "pixel ({row}, {col}) outside {}x{} image",
                self.width, self.height
            )));
        }
        let i = self.index(row, col);
        let ch = self.channels as usize;
        write_pixel(&mut self.samples[i..i + ch], pixel);
        Ok(())
    }

    /// Applies `f` to every pixel independently, producing a new buffer.
    pub fn map_pixels<F>(&self, f: F) -> PixelBuffer
    where
        F: Fn(Pixel) -> Pixel + Sync,
    {
        let ch = self.channels as usize;
        let row_len = self.row_len();
        let mut samples = self.samples.clone();

        samples
            .par_chunks_mut(row_len)
            .for_each(|row| {
                for px in row.chunks_exact_mut(ch) {
                    let mapped = f(read_pixel(px));
                    write_pixel(px, mapped);
                }
            });

        self.with_samples(samples)
    }

    /// Buffer with this geometry holding `samples`.
    pub(crate) fn with_samples(&self, samples: Vec<u8>) -> PixelBuffer {
        debug_assert_eq!(samples.len(), self.samples.len());
        PixelBuffer {
            width: self.width,
            height: self.height,
            channels: self.channels,
            samples,
        }
    }
}

fn checked_len(width: u32, height: u32, channels: u8) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidDimensions(format!(
            "image must be non-empty, got {width}x{height}"
        )));
    }
    if !(1..=4).contains(&channels) {
        return Err(FilterError::InvalidDimensions(format!(
            "channel count must be 1-4, got {channels}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or_else(|| {
            FilterError::InvalidDimensions(format!("{width}x{height}x{channels} overflows"))
        })
}

fn read_pixel(px: &[u8]) -> Pixel {
    if px.len() >= 3 {
        Pixel::new(px[0], px[1], px[2])
    } else {
        Pixel::new(px[0], px[0], px[0])
    }
}

fn write_pixel(px: &mut [u8], pixel: Pixel) {
    if px.len() >= 3 {
        px[0] = pixel.r;
        px[1] = pixel.g;
        px[2] = pixel.b;
    } else {
        px[0] = pixel.mean();
    }
}

/// Conversions from `image` buffers. Empty images are rejected like in
/// [`PixelBuffer::new`].
macro_rules! impl_try_from_image {
    ($($ty:ty => $channels:expr),* $(,)?) => {
        $(
            impl TryFrom<$ty> for PixelBuffer {
                type Error = FilterError;

                fn try_from(img: $ty) -> Result<Self> {
                    let (width, height) = img.dimensions();
                    PixelBuffer::from_raw(width, height, $channels, img.into_raw())
                }
            }
        )*
    };
}

impl_try_from_image! {
    GrayImage => 1,
    GrayAlphaImage => 2,
    RgbImage => 3,
    RgbaImage => 4,
}
