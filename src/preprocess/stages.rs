//! Stage implementations for the preprocessing pipeline.

use anyhow::Result;
use image::GrayImage;
use imageproc::contrast::equalize_histogram;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::{bilateral_filter, gaussian_blur_f32, median_filter};
use imageproc::morphology::close;

use crate::config::PreprocessConfig;
use crate::kernel::{kernel_radius, KernelRange, DEFAULT_KERNEL_RANGE};
use crate::preprocess::{clahe, ops, PreprocessStage};

/// Adaptive threshold windows below 3 px are meaningless.
const BLOCK_SIZE_RANGE: KernelRange = KernelRange::new(3, 31);

/// Impulse-noise suppression.
pub struct MedianBlurStage;

impl PreprocessStage for MedianBlurStage {
    fn name(&self) -> &'static str {
        "median blur"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.median_blur.enabled
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let kernel = DEFAULT_KERNEL_RANGE.clamp_odd(cfg.median_blur.kernel_size as i64);
        let radius = kernel_radius(kernel);
        Ok(median_filter(&image, radius, radius))
    }
}

/// Edge-preserving smoothing.
pub struct BilateralStage;

impl PreprocessStage for BilateralStage {
    fn name(&self) -> &'static str {
        "bilateral filter"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.bilateral.enabled
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let window = DEFAULT_KERNEL_RANGE.clamp_odd(cfg.bilateral.diameter as i64);
        let sigma_color = cfg.bilateral.sigma_color.max(1.0);
        let sigma_space = cfg.bilateral.sigma_space.max(1.0);
        Ok(bilateral_filter(&image, window, sigma_color, sigma_space))
    }
}

/// Always-on smoothing; downstream stages rely on it for stable gradients.
pub struct GaussianBlurStage;

impl PreprocessStage for GaussianBlurStage {
    fn name(&self) -> &'static str {
        "gaussian blur"
    }

    fn enabled(&self, _cfg: &PreprocessConfig) -> bool {
        true
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let kernel = DEFAULT_KERNEL_RANGE.clamp_odd(cfg.gaussian_kernel as i64);
        Ok(gaussian_blur_f32(&image, ops::gaussian_sigma(kernel)))
    }
}

/// Global histogram equalization; runs before the local enhancement.
pub struct EqualizeHistogramStage;

impl PreprocessStage for EqualizeHistogramStage {
    fn name(&self) -> &'static str {
        "histogram equalization"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.equalize_histogram
    }

    fn apply(&self, image: GrayImage, _cfg: &PreprocessConfig) -> Result<GrayImage> {
        Ok(equalize_histogram(&image))
    }
}

/// Always-on local contrast enhancement over a fixed 8x8 tile grid.
pub struct ClaheStage;

impl PreprocessStage for ClaheStage {
    fn name(&self) -> &'static str {
        "clahe"
    }

    fn enabled(&self, _cfg: &PreprocessConfig) -> bool {
        true
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let clip_limit = cfg.clahe_clip_limit.max(0.01);
        Ok(clahe::clahe(&image, clip_limit, clahe::TILE_GRID, clahe::TILE_GRID))
    }
}

/// Morphological closing with a square structuring element.
pub struct MorphCloseStage;

impl PreprocessStage for MorphCloseStage {
    fn name(&self) -> &'static str {
        "morphological close"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.morphology.enabled
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let kernel = DEFAULT_KERNEL_RANGE.clamp_odd(cfg.morphology.kernel_size as i64);
        // LInf with radius r dilates/erodes with a (2r+1) square.
        Ok(close(&image, Norm::LInf, kernel_radius(kernel) as u8))
    }
}

/// Locally thresholded binarization.
pub struct AdaptiveThresholdStage;

impl PreprocessStage for AdaptiveThresholdStage {
    fn name(&self) -> &'static str {
        "adaptive threshold"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.adaptive_threshold.enabled
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let block_size = BLOCK_SIZE_RANGE.clamp_odd(cfg.adaptive_threshold.block_size as i64);
        Ok(ops::adaptive_mean_threshold(
            &image,
            block_size,
            cfg.adaptive_threshold.offset,
        ))
    }
}

/// Dual-threshold hysteresis edge extraction; the image becomes a binary
/// edge map.
pub struct CannyStage;

impl PreprocessStage for CannyStage {
    fn name(&self) -> &'static str {
        "canny"
    }

    fn enabled(&self, cfg: &PreprocessConfig) -> bool {
        cfg.canny.enabled
    }

    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
        let mut low = cfg.canny.low_threshold.max(0.0);
        let mut high = cfg.canny.high_threshold.max(0.0);
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        Ok(canny(&image, low, high))
    }
}
