//! Configurable preprocessing pipeline.
//!
//! The stage order is fixed and declared as data by [`stage_list`]; the
//! configuration only decides which optional stages run and with which
//! parameters. Every stage consumes and returns a single-channel working
//! buffer; the terminal output is re-expanded to three channels.

pub mod clahe;
pub mod ops;
pub mod stages;

use anyhow::{bail, Context, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::warn;

use crate::config::PreprocessConfig;

/// One stage of the pipeline.
pub trait PreprocessStage {
    /// Human-readable name, used in error context and logs.
    fn name(&self) -> &'static str;

    /// Whether the configuration enables this stage.
    fn enabled(&self, cfg: &PreprocessConfig) -> bool;

    /// Transform the working buffer. Parameters must be sanitized through
    /// `crate::kernel` before reaching the underlying operator.
    fn apply(&self, image: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage>;
}

/// The fixed stage order: noise reduction, blur, contrast, morphology,
/// binarization, edge extraction.
pub fn stage_list() -> Vec<Box<dyn PreprocessStage>> {
    vec![
        Box::new(stages::MedianBlurStage),
        Box::new(stages::BilateralStage),
        Box::new(stages::GaussianBlurStage),
        Box::new(stages::EqualizeHistogramStage),
        Box::new(stages::ClaheStage),
        Box::new(stages::MorphCloseStage),
        Box::new(stages::AdaptiveThresholdStage),
        Box::new(stages::CannyStage),
    ]
}

/// Result of a pipeline run.
///
/// On a stage failure `image` is the *original* input (converted to RGB) and
/// `error` carries the cause; partial output is never returned.
pub struct PreprocessOutput {
    pub image: RgbImage,
    pub error: Option<anyhow::Error>,
}

/// Run the full pipeline on an image.
pub fn process(input: &DynamicImage, cfg: &PreprocessConfig) -> PreprocessOutput {
    match run_stages(input.to_luma8(), cfg) {
        Ok(gray) => PreprocessOutput {
            image: ops::broadcast_to_rgb(&gray),
            error: None,
        },
        Err(err) => {
            warn!("preprocessing failed, returning original image: {:#}", err);
            PreprocessOutput {
                image: input.to_rgb8(),
                error: Some(err),
            }
        }
    }
}

/// Run the stage chain on a grayscale buffer without the fallback wrapper.
pub fn run_stages(gray: GrayImage, cfg: &PreprocessConfig) -> Result<GrayImage> {
    if gray.width() == 0 || gray.height() == 0 {
        bail!("empty image");
    }
    let mut working = gray;
    for stage in stage_list() {
        if !stage.enabled(cfg) {
            continue;
        }
        working = stage
            .apply(working, cfg)
            .with_context(|| format!("stage '{}' failed", stage.name()))?;
    }
    Ok(working)
}
