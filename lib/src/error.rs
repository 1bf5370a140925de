//! Error types for the filter engines, the catalog and the codec.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the transform engines and the filter catalog.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Buffer or kernel geometry violates a precondition.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A user-supplied parameter lies outside its accepted range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRangeParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("malformed hex color {0:?}: expected six hexadecimal digits")]
    InvalidHexColor(String),

    #[error("unknown filter {0:?}")]
    UnknownFilter(String),

    #[error("filter {filter:?} has no parameter {param:?}")]
    UnknownParameter { filter: String, param: String },

    #[error("invalid value {value:?} for parameter {param:?} of filter {filter:?}")]
    InvalidParameterValue {
        filter: String,
        param: String,
        value: String,
    },

    /// A filter that yields text was followed by further filters.
    #[error("filter {0:?} produces text and must be the last filter in the chain")]
    TextStageNotLast(&'static str),
}

/// Failures raised while decoding or encoding image files.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported output format for {}: expected png, bmp, jpg or jpeg", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{} decoded to an empty image", .0.display())]
    EmptyImage(PathBuf),

    #[error("invalid encoder settings: {0}")]
    InvalidConfig(#[from] FilterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Any failure of a file-to-file run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T, E = FilterError> = std::result::Result<T, E>;

/// Checks `value` against an inclusive range.
pub(crate) fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_nan() || value < min || value > max {
        return Err(FilterError::OutOfRangeParameter {
            name,
            value,
            min,
            max,
        });
    }
    Ok(())
}
