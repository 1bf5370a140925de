use image_manipulator::{
    EncodeConfig, Error, FilterError, FilterOutput, PixelBuffer, catalog, codec, process_file,
};
use std::fs;
use tempfile::tempdir;

fn checkerboard(width: u32, height: u32, cell: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, 3, |y, x| {
        if (x / cell + y / cell) % 2 == 0 {
            [240, 200, 40, 0]
        } else {
            [20, 60, 180, 0]
        }
    })
    .unwrap()
}

#[test]
fn test_file_chain_png_to_png() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.PNG");
    codec::encode(&input, &checkerboard(100, 50, 10), &EncodeConfig::default()).unwrap();

    let filters = catalog()
        .parse_chain(&["pixelate:divs=10", "grayscale", "invert"])
        .unwrap();
    let result = process_file(&input, &output, &filters, &EncodeConfig::default()).unwrap();

    let written = codec::decode(&output).unwrap();
    assert_eq!(written.dimensions(), (100, 50));
    assert_eq!(FilterOutput::Image(written.clone()), result);

    // 10x10 cells line up with the chunks, so each block is one solid color
    let yellow = written.get(0, 0).unwrap();
    let blue = written.get(0, 10).unwrap();
    assert_eq!(yellow.r, 255 - 160);
    assert_eq!(blue.r, 255 - 87);
}

#[test]
fn test_file_chain_to_ascii_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("white.bmp");
    let output = dir.path().join("art.txt");
    let white = PixelBuffer::from_fn(40, 40, 3, |_, _| [255, 255, 255, 0]).unwrap();
    codec::encode(&input, &white, &EncodeConfig::default()).unwrap();

    let filters = catalog().parse_chain(&["ascii:cols=4,ratio=2"]).unwrap();
    process_file(&input, &output, &filters, &EncodeConfig::default()).unwrap();

    // chunk_width = 10, rows = round(40 / 10 / 2) = 2
    assert_eq!(fs::read_to_string(&output).unwrap(), "    \n    \n");
}

#[test]
fn test_file_chain_rejects_misplaced_ascii() {
    let dir = tempdir().unwrap();
    let filters = catalog().parse_chain(&["ascii", "sepia"]).unwrap();
    let err = process_file(
        &dir.path().join("in.png"),
        &dir.path().join("out.png"),
        &filters,
        &EncodeConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Filter(FilterError::TextStageNotLast("ascii"))
    ));
}

#[test]
fn test_jpeg_output_uses_quality() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    codec::encode(&input, &checkerboard(64, 64, 8), &EncodeConfig::default()).unwrap();
    let filters = catalog().parse_chain(&["sharpen"]).unwrap();

    let low = dir.path().join("low.jpg");
    let high = dir.path().join("high.jpeg");
    process_file(&input, &low, &filters, &EncodeConfig { jpeg_quality: 5 }).unwrap();
    process_file(&input, &high, &filters, &EncodeConfig { jpeg_quality: 95 }).unwrap();

    let low_len = fs::metadata(&low).unwrap().len();
    let high_len = fs::metadata(&high).unwrap().len();
    assert!(low_len < high_len);
}
