//! Per-pixel affine color transforms.
//!
//! A [`ColorMatrix`] maps input RGB to output RGB with three weights and one
//! bias per output channel. Every pointwise preset (grayscale, sepia, invert,
//! contrast, channel masks, hex tints) is one of these matrices.

use crate::buffer::{Pixel, PixelBuffer};
use crate::error::{FilterError, Result, check_range};
use imageproc::definitions::Clamp;

/// Rounds half away from zero and saturates to [0, 255].
pub(crate) fn saturate(value: f64) -> u8 {
    <u8 as Clamp<i32>>::clamp(value.round() as i32)
}

/// 3×4 affine color transform, one row `[w_r, w_g, w_b, bias]` per output channel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 4]; 3],
}

impl ColorMatrix {
    pub const fn new(rows: [[f64; 4]; 3]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[[f64; 4]; 3] {
        &self.rows
    }

    /// Transforms a single pixel.
    pub fn transform(&self, pixel: Pixel) -> Pixel {
        let input = [pixel.r as f64, pixel.g as f64, pixel.b as f64];
        let [r, g, b] = self.rows.map(|[wr, wg, wb, bias]| {
            saturate(wr * input[0] + wg * input[1] + wb * input[2] + bias)
        });
        Pixel::new(r, g, b)
    }

    /// Applies the matrix to every pixel of `image`.
    pub fn apply(&self, image: &PixelBuffer) -> PixelBuffer {
        log::debug!(
            "color matrix over {}x{} image ({} channels)",
            image.width(),
            image.height(),
            image.channels()
        );
        image.map_pixels(|p| self.transform(p))
    }

    /// Averages the three channels.
    pub const fn grayscale() -> Self {
        const T: f64 = 1.0 / 3.0;
        Self::new([[T, T, T, 0.0], [T, T, T, 0.0], [T, T, T, 0.0]])
    }

    pub const fn invert() -> Self {
        Self::new([
            [-1.0, 0.0, 0.0, 255.0],
            [0.0, -1.0, 0.0, 255.0],
            [0.0, 0.0, -1.0, 255.0],
        ])
    }

    /// Warm brown tone.
    pub const fn sepia() -> Self {
        Self::new([
            [0.393, 0.769, 0.189, 0.0],
            [0.349, 0.686, 0.168, 0.0],
            [0.272, 0.534, 0.131, 0.0],
        ])
    }

    /// Shifts colors toward a mix of blue and orange tones.
    pub const fn octopus_dragon() -> Self {
        Self::new([
            [0.807, 0.162, 0.039, 0.0],
            [0.119, 0.194, 0.633, 0.0],
            [0.0, 0.050, 0.900, 0.0],
        ])
    }

    /// Keeps the enabled channels and zeroes the rest.
    pub fn enable_channels(red: bool, green: bool, blue: bool) -> Self {
        let bit = |on: bool| if on { 1.0 } else { 0.0 };
        Self::new([
            [bit(red), 0.0, 0.0, 0.0],
            [0.0, bit(green), 0.0, 0.0],
            [0.0, 0.0, bit(blue), 0.0],
        ])
    }

    /// Contrast adjustment for `value` in [-255, 255].
    pub fn contrast(value: i32) -> Result<Self> {
        check_range("contrast value", value as f64, -255.0, 255.0)?;
        let v = value as f64;
        let factor = 259.0 * (v + 255.0) / (255.0 * (259.0 - v));
        let bias = 128.0 * (1.0 - factor);
        Ok(Self::new([
            [factor, 0.0, 0.0, bias],
            [0.0, factor, 0.0, bias],
            [0.0, 0.0, factor, bias],
        ]))
    }

    /// Replaces all color with shades of `color`, scaled by each pixel's average.
    pub fn tint(color: Rgb) -> Self {
        let row = |c: u8| {
            let w = c as f64 / 255.0 / 3.0;
            [w, w, w, 0.0]
        };
        Self::new([row(color.r), row(color.g), row(color.b)])
    }
}

/// An 8-bit RGB color, usually parsed from a hex string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(FilterError::InvalidHexColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| FilterError::InvalidHexColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> PixelBuffer {
        PixelBuffer::from_fn(5, 4, 3, |row, col| {
            [
                (row * 60 + col * 7) as u8,
                (255 - col * 40) as u8,
                (row * 13 + 100) as u8,
                0,
            ]
        })
        .unwrap()
    }

    #[test]
    fn test_saturate_rounds_half_away_from_zero() {
        assert_eq!(saturate(2.5), 3);
        assert_eq!(saturate(2.4999), 2);
        assert_eq!(saturate(-0.4), 0);
        assert_eq!(saturate(-12.0), 0);
        assert_eq!(saturate(255.49), 255);
        assert_eq!(saturate(1000.0), 255);
    }

    #[test]
    fn test_zero_matrix_is_black() {
        let out = ColorMatrix::new([[0.0; 4]; 3]).apply(&sample_image());
        assert!(out.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let gray = ColorMatrix::grayscale();
        let once = gray.apply(&sample_image());
        let twice = gray.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invert_is_involution() {
        let img = PixelBuffer::from_fn(16, 16, 3, |row, col| {
            let v = (row * 16 + col) as u8;
            [v, 255 - v, v / 2, 0]
        })
        .unwrap();
        let inv = ColorMatrix::invert();
        assert_eq!(inv.apply(&inv.apply(&img)), img);
    }

    #[test]
    fn test_alpha_passes_through() {
        let img = PixelBuffer::from_raw(1, 1, 4, vec![10, 20, 30, 42]).unwrap();
        let out = ColorMatrix::invert().apply(&img);
        assert_eq!(out.samples(), &[245, 235, 225, 42]);
    }

    #[test]
    fn test_enable_channels_masks() {
        let img = PixelBuffer::from_raw(1, 1, 3, vec![10, 20, 30]).unwrap();
        let out = ColorMatrix::enable_channels(true, false, true).apply(&img);
        assert_eq!(out.samples(), &[10, 0, 30]);
    }

    #[test]
    fn test_contrast_zero_is_identity() {
        let img = sample_image();
        let out = ColorMatrix::contrast(0).unwrap().apply(&img);
        assert_eq!(out, img);
    }

    #[test]
    fn test_contrast_out_of_range() {
        assert!(matches!(
            ColorMatrix::contrast(256),
            Err(FilterError::OutOfRangeParameter { .. })
        ));
        assert!(ColorMatrix::contrast(-256).is_err());
        assert!(ColorMatrix::contrast(255).is_ok());
    }

    #[test]
    fn test_contrast_pushes_away_from_mid() {
        let img = PixelBuffer::from_raw(1, 2, 3, vec![100, 100, 100, 200, 200, 200]).unwrap();
        let out = ColorMatrix::contrast(128).unwrap().apply(&img);
        assert!(out.samples()[0] < 100);
        assert!(out.samples()[3] > 200);
    }

    #[test]
    fn test_tint_red_on_mid_gray() {
        let img = PixelBuffer::from_raw(2, 1, 3, vec![128, 128, 128, 128, 128, 128]).unwrap();
        let red = Rgb::from_hex("FF0000").unwrap();
        let out = ColorMatrix::tint(red).apply(&img);
        assert_eq!(out.samples(), &[128, 0, 0, 128, 0, 0]);
    }

    #[test]
    fn test_sepia_white_saturates() {
        let img = PixelBuffer::from_raw(1, 1, 3, vec![255, 255, 255]).unwrap();
        let out = ColorMatrix::sepia().apply(&img);
        assert_eq!(out.samples(), &[255, 255, 239]);
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            Rgb::from_hex("#1a2B3c").unwrap(),
            Rgb {
                r: 0x1a,
                g: 0x2b,
                b: 0x3c
            }
        );
        assert!(matches!(
            Rgb::from_hex("12345"),
            Err(FilterError::InvalidHexColor(_))
        ));
        assert!(Rgb::from_hex("GG0000").is_err());
        assert!(Rgb::from_hex("+10000").is_err());
    }
}
