//! Glyph ramp for ASCII rendering.
//!
//! Characters are ordered from the densest glyph to the emptiest one, so dark
//! regions print as heavy ink and white regions as blank space.

/// 70 glyphs, densest first.
pub const ASCII_RAMP: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Maps a brightness in [0, 255] linearly onto the ramp.
pub fn glyph_for_brightness(brightness: u8) -> char {
    let ramp = ASCII_RAMP.as_bytes();
    let index = (brightness as f64 / 255.0 * (ramp.len() - 1) as f64) as usize;
    ramp[index.min(ramp.len() - 1)] as char
}
