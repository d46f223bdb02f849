//! IoU computation and prediction-to-ground-truth matching.

use std::fmt::Write as _;

use anyhow::{bail, Context, Result};
use image::RgbImage;

use crate::models::{class_name, PixelBox};

/// Intersection over union of two pixel boxes, in [0, 1].
///
/// An empty intersection returns exactly 0.0, as does a zero-area union
/// (two degenerate boxes).
pub fn iou(a: &PixelBox, b: &PixelBox) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    if x2 < x1 || y2 < y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) as f64 * (y2 - y1) as f64;
    let union = a.area() as f64 + b.area() as f64 - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Best ground-truth match for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub prediction_index: usize,
    pub class_id: u32,
    /// `(ground_truth_index, iou)` of the best same-class ground truth, or
    /// `None` when no ground truth shares the prediction's class.
    pub matched: Option<(usize, f64)>,
}

/// Greedy per-prediction matching.
///
/// Each prediction independently picks the same-class ground truth with the
/// highest IoU (first encountered wins ties). This is deliberately not a
/// global assignment: two predictions may claim the same ground truth.
pub fn match_predictions(predictions: &[PixelBox], ground_truths: &[PixelBox]) -> Vec<MatchResult> {
    predictions
        .iter()
        .enumerate()
        .map(|(pi, pred)| {
            let mut best: Option<(usize, f64)> = None;
            for (gi, gt) in ground_truths.iter().enumerate() {
                if gt.class_id != pred.class_id {
                    continue;
                }
                let overlap = iou(pred, gt);
                match best {
                    Some((_, best_iou)) if overlap <= best_iou => {}
                    _ => best = Some((gi, overlap)),
                }
            }
            MatchResult {
                prediction_index: pi,
                class_id: pred.class_id,
                matched: best,
            }
        })
        .collect()
}

/// Operator-facing summary text: predictions, ground truth and the matching
/// analysis. Consumed by the presentation layer; never rendered here.
pub fn detection_report(
    image_name: &str,
    predictions: &[PixelBox],
    ground_truths: &[PixelBox],
) -> String {
    let mut text = format!("File: {}\n\n", image_name);

    text.push_str("Predictions:\n");
    for p in predictions {
        let confidence = p.confidence.unwrap_or(0.0);
        let _ = writeln!(
            text,
            "- {} (conf: {:.3}): ({}, {}) to ({}, {})",
            class_name(p.class_id),
            confidence,
            p.x1,
            p.y1,
            p.x2,
            p.y2
        );
    }

    text.push_str("\nGround Truth:\n");
    for g in ground_truths {
        let _ = writeln!(
            text,
            "- {}: ({}, {}) to ({}, {})",
            class_name(g.class_id),
            g.x1,
            g.y1,
            g.x2,
            g.y2
        );
    }

    text.push_str("\nMatching Analysis:\n");
    for result in match_predictions(predictions, ground_truths) {
        let label = class_name(result.class_id);
        match result.matched {
            Some((_, overlap)) => {
                let _ = writeln!(text, "Prediction {} matches GT with IoU: {:.3}", label, overlap);
            }
            None => {
                let _ = writeln!(text, "Prediction {} has no matching GT", label);
            }
        }
    }

    text
}

/// User-supplied detector thresholds, validated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorThresholds {
    pub confidence: f32,
    pub iou: f32,
}

impl DetectorThresholds {
    /// Parse the two threshold text fields. Unparsable or out-of-range text
    /// is rejected here; nothing invalid is ever forwarded to the detector.
    pub fn parse(confidence: &str, iou: &str) -> Result<Self> {
        let confidence = parse_unit_interval(confidence).context("invalid confidence threshold")?;
        let iou = parse_unit_interval(iou).context("invalid IoU threshold")?;
        Ok(Self { confidence, iou })
    }
}

fn parse_unit_interval(text: &str) -> Result<f32> {
    let value: f32 = text
        .trim()
        .parse()
        .with_context(|| format!("not a number: {:?}", text))?;
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        bail!("{} is outside [0, 1]", value);
    }
    Ok(value)
}

/// The external object-detection model, treated as a black box.
pub trait Detector {
    fn detect(&self, image: &RgbImage, thresholds: &DetectorThresholds) -> Result<Vec<PixelBox>>;
}
