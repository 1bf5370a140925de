use crate::buffer::PixelBuffer;
use crate::codec::{self, OutputFormat};
use crate::config::EncodeConfig;
use crate::error::{Error, FilterError, Result};
use crate::filters::{Filter, FilterOutput};
use std::path::Path;

/// Checks that a text-producing filter, if any, ends the chain
fn check_chain(filters: &[Filter]) -> Result<()> {
    match filters.iter().position(Filter::produces_text) {
        Some(pos) if pos + 1 != filters.len() => {
            Err(FilterError::TextStageNotLast(filters[pos].name()))
        }
        _ => Ok(()),
    }
}

/// Applies `filters` in order, feeding each output into the next filter
///
/// Each intermediate image is dropped as soon as the next one exists. An empty
/// chain returns the input unchanged.
///
/// # Arguments
/// * `image` - The input image; ownership passes to the chain
/// * `filters` - Filters in application order
///
/// # Returns
/// The final image, or the ASCII text when the chain ends with `ascii`
pub fn apply_chain(image: PixelBuffer, filters: &[Filter]) -> Result<FilterOutput> {
    check_chain(filters)?;

    let total = filters.len();
    let mut current = image;
    for (step, filter) in filters.iter().enumerate() {
        log::info!("Applying {} ({}/{})", filter.name(), step + 1, total);
        match filter.apply(&current)? {
            FilterOutput::Image(next) => current = next,
            FilterOutput::Text(text) => return Ok(FilterOutput::Text(text)),
        }
    }

    Ok(FilterOutput::Image(current))
}

/// Reads `input`, runs the chain and writes the result to `output`
///
/// Image results are encoded in the format named by `output`'s extension;
/// ASCII results are written as plain text. The extension is checked before
/// any work is done.
pub fn process_file(
    input: &Path,
    output: &Path,
    filters: &[Filter],
    config: &EncodeConfig,
) -> std::result::Result<FilterOutput, Error> {
    check_chain(filters)?;
    config.validate()?;
    let text_output = filters.last().is_some_and(Filter::produces_text);
    if !text_output {
        OutputFormat::from_path(output)?;
    }

    let image = codec::decode(input)?;
    log::info!("Finished reading reference image {}", input.display());

    let result = apply_chain(image, filters)?;
    match &result {
        FilterOutput::Image(img) => {
            codec::encode(output, img, config)?;
            log::info!("Finished writing output image {}", output.display());
        }
        FilterOutput::Text(text) => {
            codec::write_text(output, text)?;
            log::info!("Finished writing output text file {}", output.display());
        }
    }

    Ok(result)
}
