//! Frequency-domain and oriented-texture filters for the gallery.

use std::f32::consts::PI;

use image::GrayImage;
use rustfft::num_complex::Complex32;
use rustfft::FftPlanner;

use crate::filters::convolve;
use crate::kernel::{scaled_threshold, KernelRange};

/// Annulus radii and Gabor kernel sizes share the usual odd-kernel bounds.
pub const RADIUS_RANGE: KernelRange = KernelRange::new(1, 31);

/// Band-pass filter: keep only the spatial frequencies inside an annulus
/// around the frequency-domain center.
///
/// The mask is applied in the unshifted FFT layout; the distance to the
/// spectrum center is computed with wrap-around, which is equivalent to an
/// fftshift without moving any data.
pub fn bandpass(gray: &GrayImage, intensity: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let w = width as usize;
    let h = height as usize;

    let inner = RADIUS_RANGE.clamp_odd(scaled_threshold(10.0, intensity) as i64) as f32;
    let outer = RADIUS_RANGE.clamp_odd(scaled_threshold(60.0, intensity) as i64) as f32;

    let mut data: Vec<Complex32> = gray
        .pixels()
        .map(|p| Complex32::new(p[0] as f32, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let row_forward = planner.plan_fft_forward(w);
    let col_forward = planner.plan_fft_forward(h);
    let col_inverse = planner.plan_fft_inverse(h);
    let row_inverse = planner.plan_fft_inverse(w);

    for row in data.chunks_exact_mut(w) {
        row_forward.process(row);
    }
    let mut columns = transpose(&data, w, h);
    for col in columns.chunks_exact_mut(h) {
        col_forward.process(col);
    }

    // columns is x-major: index = x * h + y.
    for x in 0..w {
        let fx = x.min(w - x) as f32;
        for y in 0..h {
            let fy = y.min(h - y) as f32;
            let distance = (fx * fx + fy * fy).sqrt();
            if distance <= inner || distance > outer {
                columns[x * h + y] = Complex32::new(0.0, 0.0);
            }
        }
    }

    for col in columns.chunks_exact_mut(h) {
        col_inverse.process(col);
    }
    let mut data = transpose(&columns, h, w);
    for row in data.chunks_exact_mut(w) {
        row_inverse.process(row);
    }

    // rustfft leaves the inverse unscaled; min-max normalization absorbs the
    // w*h factor anyway.
    let magnitudes: Vec<f32> = data.iter().map(|c| c.norm()).collect();
    convolve::normalize_minmax(&magnitudes, width, height)
}

fn transpose(data: &[Complex32], width: usize, height: usize) -> Vec<Complex32> {
    let mut out = vec![Complex32::new(0.0, 0.0); data.len()];
    for y in 0..height {
        for x in 0..width {
            out[x * height + y] = data[y * width + x];
        }
    }
    out
}

/// Oriented texture filter: a Gabor kernel with fixed orientation (pi/4),
/// aspect ratio 0.5 and sigma 8.0; kernel size and wavelength scale with
/// intensity.
pub fn gabor(gray: &GrayImage, intensity: f32) -> GrayImage {
    let ksize = RADIUS_RANGE.clamp_odd((21.0 * intensity).round() as i64);
    let wavelength = (10.0 * intensity).max(0.1);
    let kernel = gabor_kernel(ksize, 8.0, PI / 4.0, wavelength, 0.5);
    let response = convolve::filter_2d(gray, &kernel, ksize);
    convolve::scale_abs(&response, gray.width(), gray.height())
}

fn gabor_kernel(ksize: u32, sigma: f32, theta: f32, wavelength: f32, gamma: f32) -> Vec<f32> {
    let radius = (ksize / 2) as i64;
    let mut kernel = Vec::with_capacity((ksize * ksize) as usize);
    for y in -radius..=radius {
        for x in -radius..=radius {
            let xf = x as f32;
            let yf = y as f32;
            let x_theta = xf * theta.cos() + yf * theta.sin();
            let y_theta = -xf * theta.sin() + yf * theta.cos();
            let envelope =
                (-(x_theta * x_theta + gamma * gamma * y_theta * y_theta) / (2.0 * sigma * sigma))
                    .exp();
            let carrier = (2.0 * PI * x_theta / wavelength).cos();
            kernel.push(envelope * carrier);
        }
    }
    kernel
}
