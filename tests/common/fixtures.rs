#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use tempfile::TempDir;

use defectview::models::PixelBox;

/// Solid-color RGB test image.
pub fn flat_rgb(width: u32, height: u32, value: u8) -> RgbImage {
    ImageBuffer::from_fn(width, height, |_, _| Rgb([value, value, value]))
}

/// Grayscale image with a horizontal luminance ramp.
pub fn gradient_gray(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, _| {
        Luma([(x * 255 / width.max(1)) as u8])
    })
}

/// RGB image with per-channel ramps, so filters see structure in every
/// channel.
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    })
}

/// Writes a 100x100 image plus the given annotation sidecar text into a temp
/// directory. Returns the directory (keep alive) and the image path.
pub fn image_with_sidecar(annotations: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let image_path = dir.path().join("sample.png");
    flat_rgb(100, 100, 128)
        .save(&image_path)
        .expect("Failed to save test image");
    fs::write(dir.path().join("sample.txt"), annotations).expect("Failed to write sidecar");
    (dir, image_path)
}

pub fn gt_box(class_id: u32, x1: i32, y1: i32, x2: i32, y2: i32) -> PixelBox {
    PixelBox::new(class_id, x1, y1, x2, y2)
}

pub fn pred_box(class_id: u32, confidence: f32, x1: i32, y1: i32, x2: i32, y2: i32) -> PixelBox {
    PixelBox::new(class_id, x1, y1, x2, y2).with_confidence(confidence)
}
