//! Signed float convolution for the gallery filters.
//!
//! imageproc's convolutions saturate into `u8`, which destroys the signed
//! responses the derivative filters need, so the gallery keeps its raw
//! results in `f32` planes and converts to 8-bit only at the end.

use image::{GrayImage, Luma};

/// 1-D derivative kernel built the Pascal-triangle way: start from `[1]`,
/// smooth with `[1, 1]` `ksize - 1 - order` times, then differentiate with
/// `[-1, 1]` `order` times. Order 0 gives a binomial smoothing row, order 1
/// the Sobel derivative row, order 2 the second derivative used by the
/// Laplacian.
pub fn binomial_deriv_kernel(ksize: u32, order: u32) -> Vec<f32> {
    debug_assert!(ksize % 2 == 1 && ksize > order);
    let mut kernel = vec![1.0f32];
    for _ in 0..(ksize - 1 - order) {
        kernel = convolve_vec(&kernel, &[1.0, 1.0]);
    }
    for _ in 0..order {
        kernel = convolve_vec(&kernel, &[-1.0, 1.0]);
    }
    kernel
}

fn convolve_vec(a: &[f32], b: &[f32]) -> Vec<f32> {
    let mut out = vec![0.0f32; a.len() + b.len() - 1];
    for (i, &av) in a.iter().enumerate() {
        for (j, &bv) in b.iter().enumerate() {
            out[i + j] += av * bv;
        }
    }
    out
}

/// Separable correlation with replicated borders. `horizontal` runs along x,
/// `vertical` along y; both must have odd length.
pub fn separable_filter(image: &GrayImage, horizontal: &[f32], vertical: &[f32]) -> Vec<f32> {
    let width = image.width() as i64;
    let height = image.height() as i64;
    let hr = (horizontal.len() / 2) as i64;
    let vr = (vertical.len() / 2) as i64;

    let mut rows = vec![0.0f32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (i, &k) in horizontal.iter().enumerate() {
                let sx = (x + i as i64 - hr).clamp(0, width - 1);
                acc += k * image.get_pixel(sx as u32, y as u32)[0] as f32;
            }
            rows[(y * width + x) as usize] = acc;
        }
    }

    let mut out = vec![0.0f32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (j, &k) in vertical.iter().enumerate() {
                let sy = (y + j as i64 - vr).clamp(0, height - 1);
                acc += k * rows[(sy * width + x) as usize];
            }
            out[(y * width + x) as usize] = acc;
        }
    }
    out
}

/// Dense 2-D correlation with a square `ksize` x `ksize` kernel (row-major),
/// replicated borders.
pub fn filter_2d(image: &GrayImage, kernel: &[f32], ksize: u32) -> Vec<f32> {
    debug_assert_eq!(kernel.len(), (ksize * ksize) as usize);
    let width = image.width() as i64;
    let height = image.height() as i64;
    let radius = (ksize / 2) as i64;

    let mut out = vec![0.0f32; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for ky in 0..ksize as i64 {
                let sy = (y + ky - radius).clamp(0, height - 1);
                for kx in 0..ksize as i64 {
                    let sx = (x + kx - radius).clamp(0, width - 1);
                    acc += kernel[(ky * ksize as i64 + kx) as usize]
                        * image.get_pixel(sx as u32, sy as u32)[0] as f32;
                }
            }
            out[(y * width + x) as usize] = acc;
        }
    }
    out
}

/// Element-wise `sqrt(a^2 + b^2)`.
pub fn magnitude(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x * x + y * y).sqrt())
        .collect()
}

/// Absolute value clamped into the displayable 8-bit range.
pub fn scale_abs(values: &[f32], width: u32, height: u32) -> GrayImage {
    debug_assert_eq!(values.len(), (width * height) as usize);
    GrayImage::from_fn(width, height, |x, y| {
        let v = values[(y * width + x) as usize].abs();
        Luma([v.min(255.0) as u8])
    })
}

/// Min-max normalization into [0, 255].
pub fn normalize_minmax(values: &[f32], width: u32, height: u32) -> GrayImage {
    debug_assert_eq!(values.len(), (width * height) as usize);
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let range = max - min;
    GrayImage::from_fn(width, height, |x, y| {
        let v = values[(y * width + x) as usize];
        if range > 0.0 {
            Luma([((v - min) / range * 255.0).round() as u8])
        } else {
            Luma([0u8])
        }
    })
}
