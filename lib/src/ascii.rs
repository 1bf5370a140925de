use crate::buffer::PixelBuffer;
use crate::config::AsciiConfig;
use crate::error::Result;
use crate::lut::glyph_for_brightness;
use crate::resample::{ChunkAverages, ChunkGrid, chunk_averages};

/// Renders `image` as ASCII art
///
/// Pipeline:
/// 1. Split the image into `cols` chunks per line; the line count is
///    `round(height / chunk_width / ratio)`
/// 2. Average each chunk
/// 3. Map each chunk's brightness onto the glyph ramp
///
/// # Arguments
/// * `image` - Source image (gray, gray+alpha, RGB or RGBA)
/// * `config` - Column count and aspect ratio correction
///
/// # Returns
/// One glyph per chunk, row-major, each line terminated by `\n`
pub fn render_ascii(image: &PixelBuffer, config: &AsciiConfig) -> Result<String> {
    config.validate()?;
    let (width, height) = image.dimensions();
    let grid = ChunkGrid::for_ascii(width, height, config.cols, config.ratio);

    log::debug!(
        "ascii render of {width}x{height} image as {}x{} glyphs",
        grid.cols(),
        grid.rows()
    );

    let averages = chunk_averages(image, &grid);
    Ok(glyphs_to_string(&averages))
}

/// Converts chunk averages to lines of glyphs
fn glyphs_to_string(averages: &ChunkAverages) -> String {
    let mut out = String::with_capacity(((averages.cols() + 1) * averages.rows()) as usize);
    for row in 0..averages.rows() {
        for col in 0..averages.cols() {
            out.push(glyph_for_brightness(averages.brightness(row, col)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lut::ASCII_RAMP;

    #[test]
    fn test_white_image_is_blank() {
        let img = PixelBuffer::from_fn(8, 8, 3, |_, _| [255, 255, 255, 0]).unwrap();
        let config = AsciiConfig {
            cols: 4,
            ratio: 2.0,
        };
        let text = render_ascii(&img, &config).unwrap();
        // chunk_width = 2, rows = round(8 / 2 / 2) = 2
        assert_eq!(text, "    \n    \n");
    }

    #[test]
    fn test_black_image_is_dense() {
        let img = PixelBuffer::new(10, 10, 4).unwrap();
        let config = AsciiConfig {
            cols: 5,
            ratio: 1.0,
        };
        let text = render_ascii(&img, &config).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| *l == "$$$$$"));
    }

    #[test]
    fn test_row_count_follows_ratio() {
        let img = PixelBuffer::new(100, 50, 3).unwrap();
        let config = AsciiConfig {
            cols: 20,
            ratio: 2.0,
        };
        // chunk_width = 5, rows = round(50 / 5 / 2) = 5
        let text = render_ascii(&img, &config).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert!(text.lines().all(|l| l.len() == 20));
    }

    #[test]
    fn test_left_dark_right_light() {
        let img = PixelBuffer::from_fn(4, 2, 3, |_, col| {
            let v = if col < 2 { 0 } else { 255 };
            [v, v, v, 0]
        })
        .unwrap();
        let config = AsciiConfig {
            cols: 2,
            ratio: 1.0,
        };
        let text = render_ascii(&img, &config).unwrap();
        let first = ASCII_RAMP.chars().next().unwrap();
        assert_eq!(text, format!("{first} \n"));
    }

    #[test]
    fn test_cols_clamped_to_width() {
        let img = PixelBuffer::new(3, 3, 1).unwrap();
        let config = AsciiConfig {
            cols: 80,
            ratio: 1.0,
        };
        let text = render_ascii(&img, &config).unwrap();
        assert_eq!(text, "$$$\n$$$\n$$$\n");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let img = PixelBuffer::new(3, 3, 1).unwrap();
        let config = AsciiConfig {
            cols: 0,
            ratio: 1.0,
        };
        assert!(render_ascii(&img, &config).is_err());
    }
}
