//! Test fixtures shared across integration tests.

use image::{Rgba, RgbaImage};

/// Uniform opaque mid-gray frame.
pub fn uniform_gray(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
}

/// Two-axis gradient frame, useful when samples must visibly differ.
pub fn gradient_source(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgba([r, g, 90, 255])
    })
}

/// Decode an encoded sample and return its dimensions.
pub fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
    let decoded = image::load_from_memory(bytes).expect("sample bytes must decode");
    (decoded.width(), decoded.height())
}
