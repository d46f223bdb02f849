pub mod annotations;
pub mod config;
pub mod filters;
pub mod gtview;
pub mod kernel;
pub mod matching;
pub mod models;
pub mod preprocess;

pub use annotations::{load_annotations, to_pixel_boxes, Annotation};
pub use config::PreprocessConfig;
pub use filters::GalleryFilter;
pub use gtview::{BoxSelection, ComposedView, GroundTruthView};
pub use matching::{iou, match_predictions, Detector, DetectorThresholds, MatchResult};
pub use models::{class_name, PixelBox};
pub use preprocess::{process, PreprocessOutput};
