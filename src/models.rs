/// Class names for the defect dataset this viewer was built around.
pub const CLASS_NAMES: [&str; 9] = [
    "Door",
    "Fault",
    "Dent",
    "Uneven",
    "Crack",
    "Scratch",
    "SemiScartch",
    "Bent",
    "SoftUneven",
];

/// Human-readable label for a class id. Unknown ids fall back to "Class {id}".
pub fn class_name(class_id: u32) -> String {
    CLASS_NAMES
        .get(class_id as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Class {}", class_id))
}

/// An axis-aligned box in pixel space.
///
/// Coordinates are signed because presentation transforms (center alignment)
/// can move a box partially off-canvas. Invariant: `x1 <= x2` and `y1 <= y2`.
/// Zero-area boxes are valid; they simply overlap nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBox {
    pub class_id: u32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Present on model predictions, absent on ground-truth boxes.
    pub confidence: Option<f32>,
}

impl PixelBox {
    pub fn new(class_id: u32, x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            class_id,
            x1,
            y1,
            x2,
            y2,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x1 += dx;
        self.y1 += dy;
        self.x2 += dx;
        self.y2 += dy;
    }
}
