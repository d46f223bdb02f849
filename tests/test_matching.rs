mod common;

use common::{flat_rgb, gt_box, pred_box};
use defectview::matching::{
    detection_report, iou, match_predictions, Detector, DetectorThresholds,
};
use defectview::models::PixelBox;
use image::RgbImage;

#[test]
fn iou_of_a_box_with_itself_is_one() {
    let b = gt_box(0, 10, 20, 50, 80);
    assert!((iou(&b, &b) - 1.0).abs() < 1e-12);
}

#[test]
fn iou_is_symmetric() {
    let a = gt_box(0, 0, 0, 40, 40);
    let b = gt_box(0, 20, 20, 60, 60);
    assert_eq!(iou(&a, &b), iou(&b, &a));
    assert!(iou(&a, &b) > 0.0);
}

#[test]
fn disjoint_boxes_have_exactly_zero_iou() {
    let a = gt_box(0, 0, 0, 10, 10);
    let b = gt_box(0, 50, 50, 60, 60);
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn edge_touching_boxes_have_zero_iou() {
    let a = gt_box(0, 0, 0, 10, 10);
    let b = gt_box(0, 10, 0, 20, 10);
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn degenerate_boxes_do_not_divide_by_zero() {
    let a = gt_box(0, 5, 5, 5, 5);
    let b = gt_box(0, 5, 5, 5, 5);
    assert_eq!(iou(&a, &b), 0.0);
}

#[test]
fn partial_overlap_matches_the_formula() {
    // intersection (42,41)-(60,59) = 18 * 18 = 324
    // union = 400 + 342 - 324 = 418
    let gt = gt_box(2, 40, 40, 60, 60);
    let pred = pred_box(2, 0.9, 42, 41, 61, 59);
    assert!((iou(&pred, &gt) - 324.0 / 418.0).abs() < 1e-12);
}

#[test]
fn prediction_picks_the_best_same_class_ground_truth() {
    let predictions = vec![pred_box(2, 0.9, 40, 40, 60, 60)];
    let ground_truths = vec![
        gt_box(2, 100, 100, 120, 120),
        gt_box(2, 41, 41, 61, 61),
        gt_box(2, 50, 50, 70, 70),
    ];
    let results = match_predictions(&predictions, &ground_truths);
    assert_eq!(results.len(), 1);
    let (gt_index, overlap) = results[0].matched.unwrap();
    assert_eq!(gt_index, 1);
    assert!(overlap > 0.5);
}

#[test]
fn other_classes_are_invisible_to_the_matcher() {
    // A perfectly overlapping box of another class must not match; the far
    // same-class box still does, at zero IoU.
    let predictions = vec![pred_box(2, 0.9, 40, 40, 60, 60)];
    let ground_truths = vec![gt_box(5, 40, 40, 60, 60), gt_box(2, 200, 200, 220, 220)];
    let results = match_predictions(&predictions, &ground_truths);
    assert_eq!(results[0].matched, Some((1, 0.0)));
}

#[test]
fn no_same_class_ground_truth_means_no_match() {
    let predictions = vec![pred_box(2, 0.9, 40, 40, 60, 60)];
    let ground_truths = vec![gt_box(5, 40, 40, 60, 60)];
    let results = match_predictions(&predictions, &ground_truths);
    assert_eq!(results[0].matched, None);
}

#[test]
fn empty_ground_truth_leaves_every_prediction_unmatched() {
    let predictions = vec![
        pred_box(0, 0.5, 0, 0, 10, 10),
        pred_box(1, 0.5, 20, 20, 30, 30),
    ];
    let results = match_predictions(&predictions, &[]);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.matched.is_none()));
}

#[test]
fn two_predictions_may_claim_the_same_ground_truth() {
    let predictions = vec![
        pred_box(2, 0.9, 40, 40, 60, 60),
        pred_box(2, 0.8, 41, 41, 61, 61),
    ];
    let ground_truths = vec![gt_box(2, 40, 40, 60, 60)];
    let results = match_predictions(&predictions, &ground_truths);
    assert_eq!(results[0].matched.unwrap().0, 0);
    assert_eq!(results[1].matched.unwrap().0, 0);
}

#[test]
fn ties_go_to_the_first_ground_truth() {
    let predictions = vec![pred_box(2, 0.9, 40, 40, 60, 60)];
    let ground_truths = vec![gt_box(2, 40, 40, 60, 60), gt_box(2, 40, 40, 60, 60)];
    let results = match_predictions(&predictions, &ground_truths);
    assert_eq!(results[0].matched.unwrap().0, 0);
}

#[test]
fn report_lists_predictions_ground_truth_and_matches() {
    let predictions = vec![pred_box(2, 0.874, 42, 41, 61, 59)];
    let ground_truths = vec![gt_box(2, 40, 40, 60, 60)];
    let report = detection_report("img_004.png", &predictions, &ground_truths);

    assert!(report.starts_with("File: img_004.png\n"));
    assert!(report.contains("Predictions:\n"));
    assert!(report.contains("- Dent (conf: 0.874): (42, 41) to (61, 59)"));
    assert!(report.contains("Ground Truth:\n"));
    assert!(report.contains("- Dent: (40, 40) to (60, 60)"));
    assert!(report.contains("Prediction Dent matches GT with IoU: 0.775"));
}

#[test]
fn report_flags_unmatched_predictions() {
    let predictions = vec![pred_box(4, 0.6, 0, 0, 10, 10)];
    let report = detection_report("img.png", &predictions, &[]);
    assert!(report.contains("Prediction Crack has no matching GT"));
}

#[test]
fn unknown_class_ids_get_a_fallback_label() {
    let predictions = vec![pred_box(42, 0.6, 0, 0, 10, 10)];
    let report = detection_report("img.png", &predictions, &[]);
    assert!(report.contains("Class 42"));
}

#[test]
fn valid_thresholds_parse() -> anyhow::Result<()> {
    let t = DetectorThresholds::parse("0.25", "0.45")?;
    assert_eq!(t.confidence, 0.25);
    assert_eq!(t.iou, 0.45);
    let bounds = DetectorThresholds::parse("0", "1.0")?;
    assert_eq!(bounds.confidence, 0.0);
    assert_eq!(bounds.iou, 1.0);
    Ok(())
}

#[test]
fn invalid_thresholds_are_rejected() {
    assert!(DetectorThresholds::parse("abc", "0.45").is_err());
    assert!(DetectorThresholds::parse("0.25", "").is_err());
    assert!(DetectorThresholds::parse("1.5", "0.45").is_err());
    assert!(DetectorThresholds::parse("-0.1", "0.45").is_err());
    assert!(DetectorThresholds::parse("NaN", "0.45").is_err());
    assert!(DetectorThresholds::parse("inf", "0.45").is_err());
}

/// Fixed-output detector: returns its canned boxes, filtered by the
/// confidence threshold it was handed.
struct CannedDetector {
    boxes: Vec<PixelBox>,
}

impl Detector for CannedDetector {
    fn detect(
        &self,
        _image: &RgbImage,
        thresholds: &DetectorThresholds,
    ) -> anyhow::Result<Vec<PixelBox>> {
        Ok(self
            .boxes
            .iter()
            .filter(|b| b.confidence.unwrap_or(0.0) >= thresholds.confidence)
            .cloned()
            .collect())
    }
}

#[test]
fn detector_output_feeds_the_matcher() -> anyhow::Result<()> {
    let detector = CannedDetector {
        boxes: vec![
            pred_box(2, 0.9, 42, 41, 61, 59),
            pred_box(4, 0.1, 0, 0, 10, 10),
        ],
    };
    let image = flat_rgb(100, 100, 128);
    let thresholds = DetectorThresholds::parse("0.5", "0.45")?;

    let predictions = detector.detect(&image, &thresholds)?;
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].class_id, 2);

    let ground_truths = vec![gt_box(2, 40, 40, 60, 60)];
    let results = match_predictions(&predictions, &ground_truths);
    let (gt_index, overlap) = results[0].matched.unwrap();
    assert_eq!(gt_index, 0);
    assert!((overlap - 324.0 / 418.0).abs() < 1e-12);
    Ok(())
}
