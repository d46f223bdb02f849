//! Spatial-domain edge filters for the gallery.

use image::GrayImage;
use imageproc::edges::canny;

use crate::filters::convolve;
use crate::kernel::{scaled_kernel, scaled_threshold, KernelRange};

/// Derivative kernels below 3 are degenerate, above 31 numerically useless.
pub const EDGE_KERNEL_RANGE: KernelRange = KernelRange::new(3, 31);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Kernel size for the intensity-scaled derivative filters.
fn derived_ksize(intensity: f32) -> u32 {
    scaled_kernel(3.0, 2.0, intensity, EDGE_KERNEL_RANGE)
}

/// Laplacian with an intensity-driven kernel size: second derivative along
/// one axis, binomial smoothing along the other, summed over both axes.
pub fn laplacian(gray: &GrayImage, intensity: f32) -> GrayImage {
    let ksize = derived_ksize(intensity);
    let smooth = convolve::binomial_deriv_kernel(ksize, 0);
    let second = convolve::binomial_deriv_kernel(ksize, 2);

    let dxx = convolve::separable_filter(gray, &second, &smooth);
    let dyy = convolve::separable_filter(gray, &smooth, &second);
    let sum: Vec<f32> = dxx.iter().zip(dyy.iter()).map(|(a, b)| a + b).collect();
    convolve::scale_abs(&sum, gray.width(), gray.height())
}

/// Sobel derivative along one axis with an intensity-driven kernel size.
pub fn sobel(gray: &GrayImage, intensity: f32, axis: Axis) -> GrayImage {
    let ksize = derived_ksize(intensity);
    let smooth = convolve::binomial_deriv_kernel(ksize, 0);
    let deriv = convolve::binomial_deriv_kernel(ksize, 1);

    let response = match axis {
        Axis::X => convolve::separable_filter(gray, &deriv, &smooth),
        Axis::Y => convolve::separable_filter(gray, &smooth, &deriv),
    };
    convolve::scale_abs(&response, gray.width(), gray.height())
}

/// Scharr derivative. The kernel is fixed at 3x3; intensity scales the
/// output magnitude instead of the kernel size.
pub fn scharr(gray: &GrayImage, intensity: f32, axis: Axis) -> GrayImage {
    let deriv = [-1.0, 0.0, 1.0];
    let smooth = [3.0, 10.0, 3.0];
    let response = match axis {
        Axis::X => convolve::separable_filter(gray, &deriv, &smooth),
        Axis::Y => convolve::separable_filter(gray, &smooth, &deriv),
    };
    let scaled: Vec<f32> = response.iter().map(|v| v * intensity).collect();
    convolve::scale_abs(&scaled, gray.width(), gray.height())
}

/// Prewitt gradient magnitude. Fixed 3x3 directional kernels, scaled by
/// intensity as a linear gain before convolving.
pub fn prewitt(gray: &GrayImage, intensity: f32) -> GrayImage {
    let deriv: Vec<f32> = [1.0, 0.0, -1.0].iter().map(|v| v * intensity).collect();
    let smooth = [1.0, 1.0, 1.0];
    let gx = convolve::separable_filter(gray, &deriv, &smooth);
    let gy = convolve::separable_filter(gray, &smooth, &deriv);
    let mag = convolve::magnitude(&gx, &gy);
    convolve::scale_abs(&mag, gray.width(), gray.height())
}

/// Canny edge map with intensity-scaled hysteresis thresholds.
pub fn canny_edge(gray: &GrayImage, intensity: f32) -> GrayImage {
    let low = scaled_threshold(50.0, intensity);
    let high = scaled_threshold(150.0, intensity);
    canny(gray, low, high)
}
