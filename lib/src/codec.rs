//! File I/O around the transform engines.
//!
//! - `decode`: read a PNG/BMP/JPEG/etc. into a `PixelBuffer`, keeping its channel count.
//! - `encode`: write a `PixelBuffer`, picking the format from the path extension.
//! - `write_text`: write ASCII art to a plain text file.

use crate::buffer::PixelBuffer;
use crate::config::EncodeConfig;
use crate::error::{CodecError, FilterError};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Image formats accepted for output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Bmp,
    Jpeg,
}

impl OutputFormat {
    /// Selects the format from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("bmp") => Ok(OutputFormat::Bmp),
            Some("jpg" | "jpeg") => Ok(OutputFormat::Jpeg),
            _ => Err(CodecError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load an image from disk.
///
/// 8-bit gray, gray+alpha, RGB and RGBA images keep their layout; anything
/// else is converted to 8-bit RGB, or RGBA when it carries alpha.
pub fn decode(path: &Path) -> Result<PixelBuffer, CodecError> {
    let img = image::open(path).map_err(|source| CodecError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    from_dynamic(img).map_err(|_| CodecError::EmptyImage(path.to_path_buf()))
}

/// Converts a decoded image into a `PixelBuffer`.
///
/// Fails with `InvalidDimensions` when the image has no pixels.
pub fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer, FilterError> {
    match img {
        DynamicImage::ImageLuma8(buf) => buf.try_into(),
        DynamicImage::ImageLumaA8(buf) => buf.try_into(),
        DynamicImage::ImageRgb8(buf) => buf.try_into(),
        DynamicImage::ImageRgba8(buf) => buf.try_into(),
        other if other.color().has_alpha() => other.to_rgba8().try_into(),
        other => other.to_rgb8().try_into(),
    }
}

fn color_type(channels: u8) -> ExtendedColorType {
    match channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    }
}

/// Samples without the alpha channel, for formats that cannot store it.
fn strip_alpha(image: &PixelBuffer) -> (Vec<u8>, u8) {
    let ch = image.channels() as usize;
    if ch == 1 || ch == 3 {
        return (image.samples().to_vec(), image.channels());
    }
    let keep = ch - 1;
    let samples = image
        .samples()
        .chunks_exact(ch)
        .flat_map(|px| px[..keep].iter().copied())
        .collect();
    (samples, keep as u8)
}

/// Save `image` to `path` in the format named by its extension.
///
/// Settings are validated before the file is created.
pub fn encode(path: &Path, image: &PixelBuffer, config: &EncodeConfig) -> Result<(), CodecError> {
    config.validate()?;
    let format = OutputFormat::from_path(path)?;
    let (width, height) = image.dimensions();
    let wrap = |source: image::ImageError| CodecError::Encode {
        path: path.to_path_buf(),
        source,
    };

    match format {
        OutputFormat::Png | OutputFormat::Bmp => {
            let image_format = if format == OutputFormat::Png {
                ImageFormat::Png
            } else {
                ImageFormat::Bmp
            };
            image::save_buffer_with_format(
                path,
                image.samples(),
                width,
                height,
                color_type(image.channels()),
                image_format,
            )
            .map_err(wrap)
        }
        OutputFormat::Jpeg => {
            let quality = config.jpeg_quality;
            let (samples, channels) = strip_alpha(image);
            let mut writer = BufWriter::new(File::create(path)?);
            JpegEncoder::new_with_quality(&mut writer, quality)
                .encode(&samples, width, height, color_type(channels))
                .map_err(wrap)?;
            writer.flush()?;
            Ok(())
        }
    }
}

/// Write ASCII art to `path` verbatim.
pub fn write_text(path: &Path, text: &str) -> Result<(), CodecError> {
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(channels: u8) -> PixelBuffer {
        PixelBuffer::from_fn(6, 5, channels, |r, c| {
            [(r * 40) as u8, (c * 30) as u8, 77, (100 + r * 10) as u8]
        })
        .unwrap()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.PNG")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.bmp")).unwrap(), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path(Path::new("a.Jpeg")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a.jpg")).unwrap(), OutputFormat::Jpeg);
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.gif")),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(OutputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_png_round_trip_keeps_channels() {
        let dir = tempdir().unwrap();
        for channels in [1, 2, 3, 4] {
            let path = dir.path().join(format!("out{channels}.png"));
            let img = sample(channels);
            encode(&path, &img, &EncodeConfig::default()).unwrap();
            assert_eq!(decode(&path).unwrap(), img);
        }
    }

    #[test]
    fn test_bmp_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        let img = sample(3);
        encode(&path, &img, &EncodeConfig::default()).unwrap();
        assert_eq!(decode(&path).unwrap(), img);
    }

    #[test]
    fn test_jpeg_drops_alpha() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        encode(&path, &sample(4), &EncodeConfig { jpeg_quality: 90 }).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!(back.dimensions(), (6, 5));
        assert_eq!(back.channels(), 3);
    }

    #[test]
    fn test_from_dynamic_rejects_empty() {
        let empty = DynamicImage::new_rgb8(0, 4);
        assert!(matches!(
            from_dynamic(empty),
            Err(FilterError::InvalidDimensions(_))
        ));
        let gray = from_dynamic(DynamicImage::new_luma8(2, 3)).unwrap();
        assert_eq!((gray.dimensions(), gray.channels()), ((2, 3), 1));
    }

    #[test]
    fn test_encode_rejects_zero_quality() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let err = encode(&path, &sample(3), &EncodeConfig { jpeg_quality: 0 }).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidConfig(FilterError::OutOfRangeParameter { name: "jpeg_quality", .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempdir().unwrap();
        let err = decode(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn test_write_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("art.txt");
        write_text(&path, "$$\n  \n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "$$\n  \n");
    }
}
