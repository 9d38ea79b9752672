//! Image preprocessing for WD14 interrogation.
//!
//! WD14 taggers expect:
//! - Square input (448x448 for all current variants), padded with white
//! - Channel order: BGR
//! - Raw pixel values 0-255 as f32 (no normalization)
//! - Tensor layout: NHWC [batch, height, width, channels]
//!
//! Transparency is composited onto a white background before padding.

use image::{imageops, DynamicImage, Rgb, RgbImage};
use ndarray::Array4;

/// Number of color channels.
const CHANNELS: usize = 3;

/// Preprocess an image for WD14 inference.
pub fn preprocess(image: &DynamicImage, input_size: u32) -> Array4<f32> {
    let composited = composite_on_white(image);
    let squared = pad_to_square(&composited);
    let resized = imageops::resize(
        &squared,
        input_size,
        input_size,
        imageops::FilterType::Lanczos3,
    );

    let size = input_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, size, size, CHANNELS));

    // Fill NHWC directly from the raw RGB buffer, swapping to BGR.
    let raw = resized.as_raw();
    let tensor_data = tensor.as_slice_mut().unwrap();
    for (i, pixel) in raw.chunks_exact(3).enumerate() {
        let base = i * CHANNELS;
        tensor_data[base] = pixel[2] as f32; // B
        tensor_data[base + 1] = pixel[1] as f32; // G
        tensor_data[base + 2] = pixel[0] as f32; // R
    }

    tensor
}

/// Flatten any alpha channel against a white background.
fn composite_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        out.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }

    out
}

/// Pad a rectangular image to a centered square on white.
fn pad_to_square(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image.clone();
    }

    let side = width.max(height);
    let mut canvas = RgbImage::from_pixel(side, side, Rgb([255, 255, 255]));
    let x_off = (side - width) / 2;
    let y_off = (side - height) / 2;
    imageops::overlay(&mut canvas, image, x_off as i64, y_off as i64);
    canvas
}
