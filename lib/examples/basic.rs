/// Basic example: run a filter chain over a synthetic image
///
/// This draws a test image with some basic shapes, applies a few named
/// filters from the catalog and writes the input and output to disk.
use image_manipulator::{EncodeConfig, FilterOutput, PixelBuffer, apply_chain, catalog, codec};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Image Manipulator - Basic Example");
    println!("=================================\n");

    // Gray background, a white disc with a black rim and a red diagonal
    let (width, height) = (160u32, 120u32);
    let center = (width as f32 / 2.0, height as f32 / 2.0);
    let radius = 40.0;
    let input = PixelBuffer::from_fn(width, height, 3, |y, x| {
        let dx = x as f32 - center.0;
        let dy = y as f32 - center.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if x.abs_diff(y) <= 1 {
            [255, 0, 0, 0]
        } else if dist < radius {
            [255, 255, 255, 0]
        } else if (dist - radius).abs() < 5.0 {
            [0, 0, 0, 0]
        } else {
            [100, 100, 100, 0]
        }
    })?;

    println!("Created test image: {}x{}", width, height);

    let invocations = ["gaussian-blur:radius=2,sigma=1.2", "sepia", "pixelate:divs=40"];
    let filters = catalog().parse_chain(&invocations)?;

    println!("Applying chain:");
    for invocation in &invocations {
        println!("  - {}", invocation);
    }
    println!();

    codec::encode(Path::new("basic_input.png"), &input, &EncodeConfig::default())?;

    match apply_chain(input, &filters)? {
        FilterOutput::Image(output) => {
            codec::encode(Path::new("basic_output.png"), &output, &EncodeConfig::default())?;
            println!("✓ Saved input to:  basic_input.png");
            println!("✓ Saved output to: basic_output.png ({}x{})", output.width(), output.height());
        }
        FilterOutput::Text(text) => println!("{text}"),
    }

    Ok(())
}
