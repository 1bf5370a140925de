/// ASCII example: render gradients of several sizes as text
///
/// Shows how the line count follows the column count and the aspect ratio.
use image_manipulator::{AsciiConfig, Filter, FilterOutput, PixelBuffer, apply_chain};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Image Manipulator - ASCII Demo");
    println!("==============================\n");

    let test_cases = vec![
        (100, 100, 40, 2.0),
        (320, 120, 60, 2.0),
        (64, 256, 16, 1.0),
    ];

    for (width, height, cols, ratio) in test_cases {
        println!("{}x{} image, {} columns, ratio {}", width, height, cols, ratio);

        // Radial gradient: dark center, light corners
        let img = PixelBuffer::from_fn(width, height, 3, |y, x| {
            let dx = x as f32 / width as f32 - 0.5;
            let dy = y as f32 / height as f32 - 0.5;
            let v = ((dx * dx + dy * dy).sqrt() * 2.0 * 255.0).min(255.0) as u8;
            [v, v, v, 0]
        })?;

        let chain = [Filter::Sharpen, Filter::Ascii(AsciiConfig { cols, ratio })];
        if let FilterOutput::Text(text) = apply_chain(img, &chain)? {
            println!("{}", text);
            println!("  -> {} lines\n", text.lines().count());
        }
    }

    Ok(())
}
