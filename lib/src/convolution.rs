//! Square-kernel convolution.
//!
//! Kernel taps that fall outside the image are skipped rather than clamped or
//! wrapped, so border pixels see fewer contributions. Only color channels are
//! filtered; alpha is copied through.

use crate::buffer::PixelBuffer;
use crate::color::saturate;
use crate::error::{FilterError, Result};
use rayon::prelude::*;

/// Square convolution kernel of odd side with a normalization scalar.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f64>,
    scalar: f64,
}

impl Kernel {
    /// Creates a kernel from row-major `weights`.
    ///
    /// `weights.len()` must be a perfect square with an odd side.
    pub fn new(weights: Vec<f64>, scalar: f64) -> Result<Self> {
        let side = (weights.len() as f64).sqrt().round() as usize;
        if side * side != weights.len() || side % 2 == 0 {
            return Err(FilterError::InvalidDimensions(format!(
                "kernel must be square with an odd side, got {} weights",
                weights.len()
            )));
        }
        Ok(Self {
            side,
            weights,
            scalar,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn radius(&self) -> usize {
        self.side / 2
    }

    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    /// Weight at offset (`dy`, `dx`) from the center.
    pub fn weight(&self, dy: isize, dx: isize) -> f64 {
        let r = self.radius() as isize;
        self.weights[((dy + r) as usize) * self.side + (dx + r) as usize]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Laplacian-style edge highlighter.
    pub fn outline() -> Self {
        #[rustfmt::skip]
        let weights = vec![
            -1.0, -1.0, -1.0,
            -1.0,  8.0, -1.0,
            -1.0, -1.0, -1.0,
        ];
        Self {
            side: 3,
            weights,
            scalar: 1.0,
        }
    }

    pub fn sharpen() -> Self {
        #[rustfmt::skip]
        let weights = vec![
             0.0, -1.0,  0.0,
            -1.0,  5.0, -1.0,
             0.0, -1.0,  0.0,
        ];
        Self {
            side: 3,
            weights,
            scalar: 1.0,
        }
    }

    /// All-ones kernel of side `2*radius+1`, scaled to average its taps.
    pub fn box_blur(radius: usize) -> Self {
        let side = 2 * radius + 1;
        let taps = side * side;
        Self {
            side,
            weights: vec![1.0; taps],
            scalar: 1.0 / taps as f64,
        }
    }

    /// Sampled 2D Gaussian, normalized by its own sum.
    pub fn gaussian(radius: usize, sigma: f64) -> Result<Self> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(FilterError::OutOfRangeParameter {
                name: "sigma",
                value: sigma,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        let side = 2 * radius + 1;
        let r = radius as isize;
        let mut weights = Vec::with_capacity(side * side);
        for dy in -r..=r {
            for dx in -r..=r {
                weights.push(gaussian(sigma, dx as f64, dy as f64));
            }
        }
        let sum: f64 = weights.iter().sum();
        Ok(Self {
            side,
            weights,
            scalar: 1.0 / sum,
        })
    }
}

/// 2D Gaussian density at offset (`x`, `y`).
///
/// Formula: (1 / (2π σ²)) * exp(-(x² + y²) / (2σ²))
pub fn gaussian(sigma: f64, x: f64, y: f64) -> f64 {
    let sigma_sq = sigma * sigma;
    (1.0 / (2.0 * std::f64::consts::PI * sigma_sq)) * (-(x * x + y * y) / (2.0 * sigma_sq)).exp()
}

/// Convolves the color channels of `image` with `kernel`.
///
/// Output (i, j) accumulates `weight(dy, dx) * scalar * src(i - dy, j - dx)`.
/// Taps falling outside the image contribute nothing and are not renormalized.
/// Alpha is copied from the source.
pub fn convolve(image: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (width, height) = image.dimensions();
    let ch = image.channels() as usize;
    let color = image.color_channels();
    let row_len = image.row_len();
    let r = kernel.radius() as isize;
    let src = image.samples();

    log::debug!(
        "convolving {}x{} image with {}x{} kernel (scalar {:.5})",
        width,
        height,
        kernel.side(),
        kernel.side(),
        kernel.scalar()
    );

    let mut samples = src.to_vec();
    samples
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(i, out_row)| {
            let i = i as isize;
            for j in 0..width as isize {
                let mut acc = [0.0f64; 3];
                for dy in -r..=r {
                    let y = i - dy;
                    if y < 0 || y >= height as isize {
                        continue;
                    }
                    for dx in -r..=r {
                        let x = j - dx;
                        if x < 0 || x >= width as isize {
                            continue;
                        }
                        let w = kernel.weight(dy, dx) * kernel.scalar();
                        let base = y as usize * row_len + x as usize * ch;
                        for (k, a) in acc.iter_mut().take(color).enumerate() {
                            *a += w * src[base + k] as f64;
                        }
                    }
                }
                let out = j as usize * ch;
                for (k, a) in acc.iter().take(color).enumerate() {
                    out_row[out + k] = saturate(*a);
                }
            }
        });

    image.with_samples(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, 3, |row, col| {
            [(row * 20 + col * 3) as u8, (col * 17) as u8, 200, 0]
        })
        .unwrap()
    }

    #[test]
    fn test_kernel_rejects_even_side() {
        assert!(matches!(
            Kernel::new(vec![1.0; 4], 1.0),
            Err(FilterError::InvalidDimensions(_))
        ));
        assert!(Kernel::new(vec![1.0; 8], 1.0).is_err());
        assert_eq!(Kernel::new(vec![1.0; 25], 1.0).unwrap().radius(), 2);
    }

    #[test]
    fn test_box_blur_radius_zero_is_identity() {
        let img = gradient(7, 5);
        assert_eq!(convolve(&img, &Kernel::box_blur(0)), img);
    }

    #[test]
    fn test_uniform_image_preserved_by_normalized_kernels() {
        let img = PixelBuffer::from_fn(9, 9, 3, |_, _| [90, 150, 30, 0]).unwrap();
        for kernel in [
            Kernel::box_blur(1),
            Kernel::gaussian(2, 1.0).unwrap(),
            Kernel::sharpen(),
        ] {
            let out = convolve(&img, &kernel);
            // center pixel has all taps in bounds
            assert_eq!(out.get(4, 4), img.get(4, 4));
        }
    }

    #[test]
    fn test_out_of_bounds_taps_are_skipped() {
        let img = PixelBuffer::from_fn(3, 3, 3, |_, _| [90, 90, 90, 0]).unwrap();
        let out = convolve(&img, &Kernel::box_blur(1));
        // corner sees 4 of 9 taps: 4 * 90 / 9 = 40
        assert_eq!(out.samples()[0], 40);
        // edge sees 6 of 9 taps: 60
        assert_eq!(out.get(0, 1).unwrap().r, 60);
        assert_eq!(out.get(1, 1).unwrap().r, 90);
    }

    #[test]
    fn test_outline_flat_interior_is_black() {
        let img = PixelBuffer::from_fn(5, 5, 3, |_, _| [120, 120, 120, 0]).unwrap();
        let out = convolve(&img, &Kernel::outline());
        assert_eq!(out.get(2, 2).unwrap().g, 0);
        // border taps are missing, so the center weight dominates and saturates
        assert_eq!(out.get(0, 0).unwrap().g, 255);
    }

    #[test]
    fn test_convolution_flips_kernel() {
        // single bright pixel; asymmetric kernel picks the tap at (i - dy, j - dx)
        let mut weights = vec![0.0; 9];
        weights[5] = 1.0; // dy = 0, dx = 1
        let kernel = Kernel::new(weights, 1.0).unwrap();
        let mut samples = vec![0u8; 9];
        samples[4] = 200;
        let img = PixelBuffer::from_raw(3, 3, 1, samples).unwrap();
        let out = convolve(&img, &kernel);
        assert_eq!(out.samples()[5], 200);
        assert_eq!(out.samples()[4], 0);
    }

    #[test]
    fn test_alpha_copied() {
        let img = PixelBuffer::from_fn(4, 4, 4, |r, c| [(r * 50) as u8, 0, (c * 50) as u8, 33])
            .unwrap();
        let out = convolve(&img, &Kernel::box_blur(1));
        assert!(out.samples().chunks(4).all(|px| px[3] == 33));
    }

    #[test]
    fn test_gaussian_normalized_and_symmetric() {
        for (radius, sigma) in [(1, 0.3), (3, 2.0), (5, 25.0)] {
            let k = Kernel::gaussian(radius, sigma).unwrap();
            assert!((k.sum() * k.scalar() - 1.0).abs() < 1e-12);
            assert_eq!(k.weight(-1, 1), k.weight(1, -1));
            assert!(k.weight(0, 0) >= k.weight(1, 0));
        }
        assert!(Kernel::gaussian(1, 0.0).is_err());
    }
}
