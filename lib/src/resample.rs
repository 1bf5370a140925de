//! Area-averaging resampler.
//!
//! The source image is partitioned into a grid of rectangular chunks whose
//! sizes need not be integral. Each source pixel is assigned by its center:
//! pixel (i, j) lands in chunk row `floor((2i+1) / (2*chunk_height))` and chunk
//! column `floor((2j+1) / (2*chunk_width))`. Pixelation and ASCII rendering
//! both consume the resulting per-chunk averages.

use crate::buffer::PixelBuffer;
use crate::config::PixelateConfig;
use crate::error::Result;
use rayon::prelude::*;

/// Partition of a `width`×`height` image into `cols`×`rows` chunks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkGrid {
    cols: u32,
    rows: u32,
    chunk_width: f64,
    chunk_height: f64,
}

impl ChunkGrid {
    /// Grid of `target_cols`×`target_rows` chunks, each count clamped to
    /// `[1, dimension]` so that every chunk covers at least one pixel.
    pub fn new(width: u32, height: u32, target_cols: u32, target_rows: u32) -> Self {
        let cols = target_cols.clamp(1, width.max(1));
        let rows = target_rows.clamp(1, height.max(1));
        if cols != target_cols || rows != target_rows {
            log::debug!(
                "chunk grid {target_cols}x{target_rows} clamped to {cols}x{rows} for {width}x{height} image"
            );
        }
        Self {
            cols,
            rows,
            chunk_width: width as f64 / cols as f64,
            chunk_height: height as f64 / rows as f64,
        }
    }

    /// Grid for ASCII output: `cols` glyphs per line, with the line count
    /// shrunk by `ratio` to compensate for glyphs taller than they are wide.
    pub fn for_ascii(width: u32, height: u32, cols: u32, ratio: f64) -> Self {
        let cols = cols.clamp(1, width.max(1));
        let chunk_width = width as f64 / cols as f64;
        let rows = (height as f64 / chunk_width / ratio).round().max(1.0) as u32;
        Self::new(width, height, cols, rows)
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn chunk_width(&self) -> f64 {
        self.chunk_width
    }

    pub fn chunk_height(&self) -> f64 {
        self.chunk_height
    }

    /// Chunk column holding the center of source column `col`.
    pub fn chunk_col(&self, col: u32) -> u32 {
        center_bucket(col, self.chunk_width, self.cols)
    }

    /// Chunk row holding the center of source row `row`.
    pub fn chunk_row(&self, row: u32) -> u32 {
        center_bucket(row, self.chunk_height, self.rows)
    }
}

fn center_bucket(index: u32, size: f64, count: u32) -> u32 {
    let bucket = ((2 * index as u64 + 1) as f64 / (2.0 * size)).floor() as u32;
    bucket.min(count - 1)
}

/// Per-chunk channel sums and pixel counts.
#[derive(Clone, Debug)]
pub struct ChunkAverages {
    cols: u32,
    rows: u32,
    channels: u8,
    color_channels: usize,
    sums: Vec<u64>,
    counts: Vec<u32>,
}

impl ChunkAverages {
    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn count(&self, row: u32, col: u32) -> u32 {
        self.counts[(row * self.cols + col) as usize]
    }

    /// Rounded mean of channel `channel` over the chunk.
    pub fn average(&self, row: u32, col: u32, channel: usize) -> u8 {
        let idx = (row * self.cols + col) as usize;
        let count = self.counts[idx].max(1) as f64;
        let sum = self.sums[idx * self.channels as usize + channel] as f64;
        (sum / count).round() as u8
    }

    /// Mean of the color channel means, truncated to an integer.
    pub fn brightness(&self, row: u32, col: u32) -> u8 {
        let idx = (row * self.cols + col) as usize;
        let count = self.counts[idx].max(1) as f64;
        let base = idx * self.channels as usize;
        let total: u64 = self.sums[base..base + self.color_channels].iter().sum();
        (total as f64 / count / self.color_channels as f64) as u8
    }

    /// One pixel per chunk holding its average.
    pub fn to_buffer(&self) -> Result<PixelBuffer> {
        let ch = self.channels as usize;
        PixelBuffer::from_fn(self.cols, self.rows, self.channels, |row, col| {
            let mut px = [0u8; 4];
            for (k, v) in px.iter_mut().take(ch).enumerate() {
                *v = self.average(row, col, k);
            }
            px
        })
    }
}

/// Accumulates every source pixel of `image` into its chunk of `grid`.
pub fn chunk_averages(image: &PixelBuffer, grid: &ChunkGrid) -> ChunkAverages {
    let (width, height) = image.dimensions();
    let ch = image.channels() as usize;
    let cols = grid.cols() as usize;
    let src = image.samples();
    let row_len = image.row_len();

    let col_chunks: Vec<usize> = (0..width).map(|j| grid.chunk_col(j) as usize).collect();
    let row_chunks: Vec<u32> = (0..height).map(|i| grid.chunk_row(i)).collect();

    // Row assignment is monotone, so each chunk row owns a contiguous run of
    // source rows.
    let per_row: Vec<(Vec<u64>, Vec<u32>)> = (0..grid.rows())
        .into_par_iter()
        .map(|chunk_row| {
            let mut sums = vec![0u64; cols * ch];
            let mut counts = vec![0u32; cols];
            let first = row_chunks.partition_point(|&r| r < chunk_row);
            let last = row_chunks.partition_point(|&r| r <= chunk_row);
            for i in first..last {
                let row = &src[i * row_len..(i + 1) * row_len];
                for (px, &c) in row.chunks_exact(ch).zip(&col_chunks) {
                    for (k, &s) in px.iter().enumerate() {
                        sums[c * ch + k] += s as u64;
                    }
                    counts[c] += 1;
                }
            }
            (sums, counts)
        })
        .collect();

    let mut sums = Vec::with_capacity(per_row.len() * cols * ch);
    let mut counts = Vec::with_capacity(per_row.len() * cols);
    for (s, c) in per_row {
        sums.extend(s);
        counts.extend(c);
    }

    ChunkAverages {
        cols: grid.cols(),
        rows: grid.rows(),
        channels: image.channels(),
        color_channels: image.color_channels(),
        sums,
        counts,
    }
}

/// Downsamples `image` to `target_cols`×`target_rows` chunk averages.
pub fn downsample(image: &PixelBuffer, target_cols: u32, target_rows: u32) -> Result<PixelBuffer> {
    let (width, height) = image.dimensions();
    let grid = ChunkGrid::new(width, height, target_cols, target_rows);
    chunk_averages(image, &grid).to_buffer()
}

/// Chunk layout for pixelation, derived from the number of divisions along
/// the longest side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelateLayout {
    pub grid: ChunkGrid,
    /// Side of the square block each chunk expands to in the output.
    pub block: u32,
}

impl PixelateLayout {
    pub fn new(width: u32, height: u32, divs: u32) -> Self {
        let longest = width.max(height);
        let divs = divs.clamp(1, longest);
        let chunk_length = longest as f64 / divs as f64;
        let fit = |dim: u32| ((dim as f64 / chunk_length).round() as u32).max(1);

        let cols = if width > height { divs } else { fit(width) };
        let rows = if height >= width { divs } else { fit(height) };
        let block = (chunk_length.round() as u32).max(1);

        Self {
            grid: ChunkGrid::new(width, height, cols, rows),
            block,
        }
    }

    /// Output dimensions: every chunk becomes a `block`×`block` square.
    pub fn output_dimensions(&self) -> (u32, u32) {
        (self.grid.cols() * self.block, self.grid.rows() * self.block)
    }
}

/// Replaces each chunk with a solid block of its average color.
pub fn pixelate(image: &PixelBuffer, config: &PixelateConfig) -> Result<PixelBuffer> {
    config.validate()?;
    let (width, height) = image.dimensions();
    let layout = PixelateLayout::new(width, height, config.divs);
    let (new_width, new_height) = layout.output_dimensions();

    log::debug!(
        "pixelating {width}x{height} into {}x{} chunks of side {} ({new_width}x{new_height})",
        layout.grid.cols(),
        layout.grid.rows(),
        layout.block
    );

    let small = chunk_averages(image, &layout.grid).to_buffer()?;
    let ch = image.channels() as usize;
    let block = layout.block;
    let small_samples = small.samples();
    let small_row_len = small.row_len();

    let out_row_len = new_width as usize * ch;
    let mut samples = PixelBuffer::new(new_width, new_height, image.channels())?.into_raw();
    samples
        .par_chunks_mut(out_row_len)
        .enumerate()
        .for_each(|(i, row)| {
            let chunk_row = i / block as usize;
            for (j, px) in row.chunks_exact_mut(ch).enumerate() {
                let chunk_col = j / block as usize;
                let src = chunk_row * small_row_len + chunk_col * ch;
                px.copy_from_slice(&small_samples[src..src + ch]);
            }
        });

    PixelBuffer::from_raw(new_width, new_height, image.channels(), samples)
}
