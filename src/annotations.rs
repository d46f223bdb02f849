//! Ground-truth annotation sidecar files.
//!
//! One text file per image, same path with a `.txt` extension. Each line is
//! one labeled object: `class_id x_center y_center width height`, all five
//! fields floating point, coordinates normalized to [0,1].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::models::PixelBox;

/// One normalized annotation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub class_id: u32,
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
}

/// Sidecar path for an image: same stem, `.txt` extension.
pub fn sidecar_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Parse a single annotation line.
pub fn parse_line(line: &str) -> Result<Annotation> {
    let fields: Vec<f32> = line
        .split_whitespace()
        .map(|field| {
            field
                .parse::<f32>()
                .with_context(|| format!("bad annotation field {:?}", field))
        })
        .collect::<Result<_>>()?;
    if fields.len() != 5 {
        bail!("expected 5 fields, got {}", fields.len());
    }
    Ok(Annotation {
        class_id: fields[0] as u32,
        x_center: fields[1],
        y_center: fields[2],
        width: fields[3],
        height: fields[4],
    })
}

/// Load all annotations for an image.
///
/// A missing sidecar file means zero annotations, not an error. Malformed
/// lines are skipped with a warning so one bad record never hides the rest.
pub fn load_annotations(image_path: &Path) -> Vec<Annotation> {
    let path = sidecar_path(image_path);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return Vec::new(),
    };

    let mut records = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => records.push(record),
            Err(err) => warn!(
                "skipping line {} of {}: {}",
                number + 1,
                path.display(),
                err
            ),
        }
    }
    records
}

/// Convert normalized records to pixel-space boxes for an image of the given
/// dimensions.
pub fn to_pixel_boxes(records: &[Annotation], img_width: u32, img_height: u32) -> Vec<PixelBox> {
    records
        .iter()
        .map(|record| {
            let w = img_width as f32;
            let h = img_height as f32;
            PixelBox::new(
                record.class_id,
                ((record.x_center - record.width / 2.0) * w).round() as i32,
                ((record.y_center - record.height / 2.0) * h).round() as i32,
                ((record.x_center + record.width / 2.0) * w).round() as i32,
                ((record.y_center + record.height / 2.0) * h).round() as i32,
            )
        })
        .collect()
}
