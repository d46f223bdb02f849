//! Ground-truth view composition.
//!
//! Pure coordinate/image transforms for presenting annotated boxes: center
//! alignment, crop-to-box and display zoom. No drawing happens here; the
//! composer returns the transformed canvas plus the transformed box list and
//! leaves rendering to the presentation layer.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::models::PixelBox;

/// Fraction of the box size added around a fit-to-box crop window.
const FIT_PADDING: f32 = 0.2;

/// Multiplicative zoom step per action.
const ZOOM_STEP: f32 = 1.1;
const ZOOM_MIN: f32 = 0.1;
const ZOOM_MAX: f32 = 5.0;

/// Which annotations drive the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSelection {
    /// Every annotation; the first one anchors center-align and fit-to-box.
    All,
    /// A single annotation by index.
    Single(usize),
}

/// Presentation state for the ground-truth panel.
#[derive(Debug, Clone)]
pub struct GroundTruthView {
    /// Side length of the square display canvas.
    pub base_size: u32,
    /// Display magnification; does not affect box coordinates.
    pub scale_factor: f32,
    pub show_labels: bool,
    pub center_align: bool,
    pub fit_to_box: bool,
    pub selection: BoxSelection,
}

impl Default for GroundTruthView {
    fn default() -> Self {
        Self {
            base_size: 300,
            scale_factor: 1.0,
            show_labels: true,
            center_align: true,
            fit_to_box: false,
            selection: BoxSelection::All,
        }
    }
}

/// A composed canvas and the box coordinates valid on it.
#[derive(Debug, Clone)]
pub struct ComposedView {
    pub image: RgbImage,
    pub boxes: Vec<PixelBox>,
}

impl GroundTruthView {
    pub fn zoom_in(&mut self) {
        self.scale_factor = (self.scale_factor * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.scale_factor = (self.scale_factor / ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Canvas side length after zoom.
    pub fn display_size(&self) -> u32 {
        ((self.base_size as f32 * self.scale_factor).round() as u32).max(1)
    }

    /// The subset of boxes the current selection covers.
    pub fn selected<'a>(&self, boxes: &'a [PixelBox]) -> Vec<&'a PixelBox> {
        match self.selection {
            BoxSelection::All => boxes.iter().collect(),
            BoxSelection::Single(index) => boxes.get(index).into_iter().collect(),
        }
    }

    /// Compose the view: center-align, then fit-to-box, each only when
    /// enabled. Box coordinates in the result match the returned canvas.
    pub fn compose(&self, image: &RgbImage, boxes: &[PixelBox]) -> ComposedView {
        let mut canvas = image.clone();
        let mut boxes: Vec<PixelBox> = self.selected(boxes).into_iter().cloned().collect();

        if self.center_align {
            if let Some(anchor) = boxes.first() {
                let (cx, cy) = anchor.center();
                let dx = self.base_size as i32 / 2 - cx;
                let dy = self.base_size as i32 / 2 - cy;
                canvas = translate_onto_canvas(&canvas, self.base_size, dx, dy);
                for b in boxes.iter_mut() {
                    b.translate(dx, dy);
                }
            }
        }

        if self.fit_to_box {
            if let Some(anchor) = boxes.first().cloned() {
                let crop_w = (anchor.width() as f32 * (1.0 + FIT_PADDING)) as i32;
                let crop_h = (anchor.height() as f32 * (1.0 + FIT_PADDING)) as i32;
                let cx = self.base_size as i32 / 2;
                let cy = self.base_size as i32 / 2;

                let x1 = (cx - crop_w / 2).max(0);
                let y1 = (cy - crop_h / 2).max(0);
                let x2 = (x1 + crop_w).min(canvas.width() as i32);
                let y2 = (y1 + crop_h).min(canvas.height() as i32);

                if x2 > x1 && y2 > y1 {
                    canvas = imageops::crop_imm(
                        &canvas,
                        x1 as u32,
                        y1 as u32,
                        (x2 - x1) as u32,
                        (y2 - y1) as u32,
                    )
                    .to_image();
                    for b in boxes.iter_mut() {
                        b.translate(-x1, -y1);
                    }
                }
            }
        }

        ComposedView { image: canvas, boxes }
    }

    /// Resize the composed canvas for display, preserving aspect ratio
    /// within a `display_size()` square. Pure magnification: the box
    /// coordinates of the composed view stay untouched.
    pub fn render(&self, view: &ComposedView) -> RgbImage {
        let target = self.display_size();
        let (w, h) = view.image.dimensions();
        if w == 0 || h == 0 {
            return view.image.clone();
        }
        let scale = (target as f32 / w as f32).min(target as f32 / h as f32);
        let out_w = ((w as f32 * scale).round() as u32).max(1);
        let out_h = ((h as f32 * scale).round() as u32).max(1);
        imageops::resize(&view.image, out_w, out_h, FilterType::CatmullRom)
    }
}

/// Translate an image onto a `size` x `size` canvas; uncovered pixels stay
/// black.
fn translate_onto_canvas(image: &RgbImage, size: u32, dx: i32, dy: i32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let sx = x as i32 - dx;
        let sy = y as i32 - dy;
        if sx >= 0 && sy >= 0 && (sx as u32) < image.width() && (sy as u32) < image.height() {
            *image.get_pixel(sx as u32, sy as u32)
        } else {
            Rgb([0, 0, 0])
        }
    })
}
