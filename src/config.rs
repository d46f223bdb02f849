//! Preprocessing configuration.
//!
//! One explicit value passed into every pipeline call; nothing here is global.
//! Parameters persist across toggles: disabling a stage flips `enabled` and
//! leaves its parameters untouched, so re-enabling restores the old tuning.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MedianBlurParams {
    pub enabled: bool,
    /// Odd kernel size, sanitized into [1, 31] before use.
    pub kernel_size: u32,
}

impl Default for MedianBlurParams {
    fn default() -> Self {
        Self {
            enabled: false,
            kernel_size: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BilateralParams {
    pub enabled: bool,
    /// Filter window diameter in pixels.
    pub diameter: u32,
    /// Intensity-similarity sigma.
    pub sigma_color: f32,
    /// Spatial sigma.
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            enabled: false,
            diameter: 9,
            sigma_color: 75.0,
            sigma_space: 75.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    pub enabled: bool,
    /// Odd square structuring-element size.
    pub kernel_size: u32,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            enabled: false,
            kernel_size: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveThresholdParams {
    pub enabled: bool,
    /// Odd window size the local mean is computed over.
    pub block_size: u32,
    /// Constant subtracted from the local mean.
    pub offset: f32,
}

impl Default for AdaptiveThresholdParams {
    fn default() -> Self {
        Self {
            enabled: false,
            block_size: 11,
            offset: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParams {
    pub enabled: bool,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyParams {
    fn default() -> Self {
        Self {
            enabled: false,
            low_threshold: 100.0,
            high_threshold: 200.0,
        }
    }
}

/// Full preprocessing configuration.
///
/// Stage order is fixed by `preprocess::stage_list`, not by this struct;
/// the config only carries toggles and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub median_blur: MedianBlurParams,
    pub bilateral: BilateralParams,
    /// Odd kernel size for the always-on gaussian blur stage.
    pub gaussian_kernel: u32,
    /// Global histogram equalization toggle.
    pub equalize_histogram: bool,
    /// Clip limit for the always-on local contrast enhancement stage.
    pub clahe_clip_limit: f32,
    pub morphology: MorphologyParams,
    pub adaptive_threshold: AdaptiveThresholdParams,
    pub canny: CannyParams,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            median_blur: MedianBlurParams::default(),
            bilateral: BilateralParams::default(),
            gaussian_kernel: 15,
            equalize_histogram: false,
            clahe_clip_limit: 2.0,
            morphology: MorphologyParams::default(),
            adaptive_threshold: AdaptiveThresholdParams::default(),
            canny: CannyParams::default(),
        }
    }
}

impl PreprocessConfig {
    /// Load a configuration saved by [`PreprocessConfig::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("failed to write config {}", path.display()))
    }
}
