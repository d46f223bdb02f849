//! Pixel-level helpers shared by the pipeline stages.

use image::{GrayImage, Rgb, RgbImage};

/// Gaussian sigma derived from an odd kernel size, using the standard
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8` rule, so a kernel-size slider can drive
/// a sigma-parameterized blur.
pub fn gaussian_sigma(kernel_size: u32) -> f32 {
    (0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8).max(0.1)
}

/// Broadcast a single-channel buffer to three channels by replication.
/// No color information is invented.
pub fn broadcast_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Binarize against the local window mean minus a constant offset.
///
/// `block_size` must be odd (callers sanitize it). A pixel becomes 255 when
/// strictly brighter than `mean(window) - offset`, else 0. Windows are
/// clamped at the borders, so border pixels compare against a smaller
/// neighborhood rather than padded data.
pub fn adaptive_mean_threshold(image: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let (width, height) = image.dimensions();
    let radius = (block_size / 2) as i64;

    // Integral image with a one-row/column zero border:
    // integral[(y+1)*(w+1) + (x+1)] = sum of pixels in [0..=x, 0..=y].
    let w1 = width as usize + 1;
    let h1 = height as usize + 1;
    let mut integral = vec![0u64; w1 * h1];
    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += image.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * w1 + (x + 1)] = integral[y * w1 + (x + 1)] + row_sum;
        }
    }

    let window_sum = |x0: i64, y0: i64, x1: i64, y1: i64| -> (u64, u64) {
        let x0 = x0.max(0) as usize;
        let y0 = y0.max(0) as usize;
        let x1 = (x1.min(width as i64 - 1)) as usize;
        let y1 = (y1.min(height as i64 - 1)) as usize;
        let sum = integral[(y1 + 1) * w1 + (x1 + 1)] + integral[y0 * w1 + x0]
            - integral[y0 * w1 + (x1 + 1)]
            - integral[(y1 + 1) * w1 + x0];
        let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as u64;
        (sum, count)
    };

    GrayImage::from_fn(width, height, |x, y| {
        let (sum, count) = window_sum(
            x as i64 - radius,
            y as i64 - radius,
            x as i64 + radius,
            y as i64 + radius,
        );
        let mean = sum as f32 / count as f32;
        let value = image.get_pixel(x, y)[0] as f32;
        if value > mean - offset {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    })
}
