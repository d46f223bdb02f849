mod common;

use common::gradient_gray;
use defectview::config::PreprocessConfig;
use defectview::preprocess::{self, clahe, ops, run_stages};
use image::DynamicImage;

#[test]
fn default_pipeline_is_gaussian_then_clahe() -> anyhow::Result<()> {
    let gray = gradient_gray(64, 64);
    let cfg = PreprocessConfig::default();

    let output = run_stages(gray.clone(), &cfg)?;

    let blurred = imageproc::filter::gaussian_blur_f32(&gray, ops::gaussian_sigma(15));
    let expected = clahe::clahe(&blurred, 2.0, clahe::TILE_GRID, clahe::TILE_GRID);
    assert_eq!(output, expected);
    Ok(())
}

#[test]
fn process_expands_the_result_to_three_channels() {
    let input = DynamicImage::ImageLuma8(gradient_gray(64, 64));
    let output = preprocess::process(&input, &PreprocessConfig::default());

    assert!(output.error.is_none());
    assert_eq!(output.image.dimensions(), (64, 64));
    for pixel in output.image.pixels() {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }
}

#[test]
fn failed_pipeline_returns_the_original_image() {
    let input = DynamicImage::new_rgb8(0, 0);
    let output = preprocess::process(&input, &PreprocessConfig::default());

    assert!(output.error.is_some());
    assert_eq!(output.image.dimensions(), (0, 0));
}

#[test]
fn canny_stage_produces_a_binary_edge_map() -> anyhow::Result<()> {
    let mut cfg = PreprocessConfig::default();
    cfg.canny.enabled = true;

    let output = run_stages(gradient_gray(64, 64), &cfg)?;
    assert!(output.pixels().all(|p| p[0] == 0 || p[0] == 255));
    Ok(())
}

#[test]
fn inverted_canny_thresholds_still_run() -> anyhow::Result<()> {
    let mut cfg = PreprocessConfig::default();
    cfg.canny.enabled = true;
    cfg.canny.low_threshold = 200.0;
    cfg.canny.high_threshold = 100.0;

    let output = run_stages(gradient_gray(64, 64), &cfg)?;
    assert!(output.pixels().all(|p| p[0] == 0 || p[0] == 255));
    Ok(())
}

#[test]
fn adaptive_threshold_binarizes() -> anyhow::Result<()> {
    let mut cfg = PreprocessConfig::default();
    cfg.adaptive_threshold.enabled = true;

    let output = run_stages(gradient_gray(64, 64), &cfg)?;
    assert!(output.pixels().all(|p| p[0] == 0 || p[0] == 255));
    Ok(())
}

#[test]
fn even_kernel_sizes_are_sanitized_not_fatal() -> anyhow::Result<()> {
    let mut cfg = PreprocessConfig::default();
    cfg.median_blur.enabled = true;
    cfg.median_blur.kernel_size = 4;
    cfg.morphology.enabled = true;
    cfg.morphology.kernel_size = 0;
    cfg.gaussian_kernel = 100;

    let output = run_stages(gradient_gray(32, 32), &cfg)?;
    assert_eq!(output.dimensions(), (32, 32));
    Ok(())
}

#[test]
fn all_stages_enabled_runs_end_to_end() -> anyhow::Result<()> {
    let mut cfg = PreprocessConfig::default();
    cfg.median_blur.enabled = true;
    cfg.bilateral.enabled = true;
    cfg.equalize_histogram = true;
    cfg.morphology.enabled = true;
    cfg.adaptive_threshold.enabled = true;
    cfg.canny.enabled = true;

    let output = run_stages(gradient_gray(64, 64), &cfg)?;
    assert_eq!(output.dimensions(), (64, 64));
    Ok(())
}

#[test]
fn config_round_trips_through_json() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("preprocess.json");

    let mut cfg = PreprocessConfig::default();
    cfg.median_blur.enabled = true;
    cfg.median_blur.kernel_size = 7;
    cfg.clahe_clip_limit = 3.5;
    cfg.canny.enabled = true;
    cfg.save(&path)?;

    let loaded = PreprocessConfig::load(&path)?;
    assert_eq!(serde_json::to_value(&cfg)?, serde_json::to_value(&loaded)?);
    Ok(())
}

#[test]
fn missing_config_fields_fall_back_to_defaults() -> anyhow::Result<()> {
    let cfg: PreprocessConfig = serde_json::from_str(r#"{"gaussian_kernel": 7}"#)?;
    assert_eq!(cfg.gaussian_kernel, 7);
    assert_eq!(cfg.clahe_clip_limit, 2.0);
    assert!(!cfg.median_blur.enabled);
    assert_eq!(cfg.median_blur.kernel_size, 3);

    let empty: PreprocessConfig = serde_json::from_str("{}")?;
    assert_eq!(empty.gaussian_kernel, 15);
    Ok(())
}

#[test]
fn disabling_a_stage_keeps_its_parameters() {
    let mut cfg = PreprocessConfig::default();
    cfg.median_blur.enabled = true;
    cfg.median_blur.kernel_size = 9;
    cfg.median_blur.enabled = false;
    assert_eq!(cfg.median_blur.kernel_size, 9);
}
