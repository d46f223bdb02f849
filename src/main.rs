use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::{ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use defectview::annotations::{load_annotations, to_pixel_boxes};
use defectview::config::PreprocessConfig;
use defectview::filters::{slider_to_intensity, GalleryFilter};
use defectview::gtview::{BoxSelection, ComposedView, GroundTruthView};
use defectview::matching::{detection_report, DetectorThresholds};
use defectview::models::PixelBox;
use defectview::preprocess;

#[derive(Parser)]
#[command(name = "defectview")]
#[command(about = "Inspect images, tune preprocessing and compare detections against ground truth")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the preprocessing pipeline on an image
    Preprocess {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Pipeline configuration (JSON); defaults are used when omitted
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output image path
        #[arg(short, long, default_value = "preprocessed.png")]
        out: PathBuf,
    },

    /// Apply one gallery filter blended with the original
    Filter {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Filter: original, bandpass, gabor, laplacian, sobel-x, sobel-y,
        /// scharr-x, scharr-y, prewitt, canny
        #[arg(long)]
        name: GalleryFilter,

        /// Intensity slider step, 1-10 (mapped to 0.2-2.0)
        #[arg(long, default_value_t = 5)]
        step: u8,

        /// Output image path
        #[arg(short, long, default_value = "filtered.png")]
        out: PathBuf,
    },

    /// Compose the ground-truth view and draw the annotation boxes
    Gt {
        /// Path to input image file (annotations read from the .txt sidecar)
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Drive the view from a single annotation index instead of all boxes
        #[arg(long, value_name = "INDEX")]
        select: Option<usize>,

        /// Display canvas side length
        #[arg(long, default_value_t = 300)]
        size: u32,

        /// Center the first selected box on the canvas
        #[arg(long)]
        center: bool,

        /// Crop the canvas to the first selected box (plus padding)
        #[arg(long)]
        fit: bool,

        /// Output image path
        #[arg(short, long, default_value = "ground_truth.png")]
        out: PathBuf,
    },

    /// Match prediction boxes against the annotation sidecar
    Report {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Prediction box as "class,confidence,x1,y1,x2,y2"; repeatable
        #[arg(long = "pred", value_name = "SPEC")]
        predictions: Vec<String>,

        /// Confidence threshold in [0, 1]
        #[arg(long, default_value = "0.25")]
        conf: String,

        /// IoU threshold in [0, 1]
        #[arg(long, default_value = "0.45")]
        iou: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Preprocess {
            image_path,
            config,
            out,
        } => {
            let img = load_image(&image_path)?;
            let cfg = match config {
                Some(path) => PreprocessConfig::load(&path)?,
                None => PreprocessConfig::default(),
            };
            let output = preprocess::process(&img, &cfg);
            if let Some(err) = output.error {
                bail!("preprocessing failed: {:#}", err);
            }
            output.image.save(&out)?;
            println!("Saved {}", out.display());
        }

        Command::Filter {
            image_path,
            name,
            step,
            out,
        } => {
            let img = load_image(&image_path)?.to_rgb8();
            let intensity = slider_to_intensity(step);
            let filtered = name.apply(&img, intensity);
            filtered.save(&out)?;
            println!("Saved {} ({} at intensity {:.1})", out.display(), name.name(), intensity);
        }

        Command::Gt {
            image_path,
            select,
            size,
            center,
            fit,
            out,
        } => {
            let img = load_image(&image_path)?.to_rgb8();
            let records = load_annotations(&image_path);
            let boxes = to_pixel_boxes(&records, img.width(), img.height());

            let view = GroundTruthView {
                base_size: size,
                center_align: center,
                fit_to_box: fit,
                selection: match select {
                    Some(index) => BoxSelection::Single(index),
                    None => BoxSelection::All,
                },
                ..GroundTruthView::default()
            };
            let composed = view.compose(&img, &boxes);

            let mut canvas = composed.image;
            if view.show_labels {
                draw_boxes(&mut canvas, &composed.boxes);
            }
            let rendered = view.render(&ComposedView {
                image: canvas,
                boxes: composed.boxes,
            });
            rendered.save(&out)?;
            println!("Saved {} ({} annotation(s))", out.display(), records.len());
        }

        Command::Report {
            image_path,
            predictions,
            conf,
            iou,
        } => {
            // Reject malformed threshold text before anything runs.
            let thresholds = DetectorThresholds::parse(&conf, &iou)?;

            let img = load_image(&image_path)?;
            let records = load_annotations(&image_path);
            let ground_truths = to_pixel_boxes(&records, img.width(), img.height());

            let predictions: Vec<PixelBox> = predictions
                .iter()
                .map(|spec| parse_prediction(spec))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .filter(|p| p.confidence.unwrap_or(0.0) >= thresholds.confidence)
                .collect();

            let name = image_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            print!("{}", detection_report(&name, &predictions, &ground_truths));
        }
    }

    Ok(())
}

fn load_image(path: &PathBuf) -> Result<image::DynamicImage> {
    ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))
}

/// Parse a "class,confidence,x1,y1,x2,y2" prediction spec.
fn parse_prediction(spec: &str) -> Result<PixelBox> {
    let fields: Vec<&str> = spec.split(',').map(str::trim).collect();
    if fields.len() != 6 {
        bail!("expected class,confidence,x1,y1,x2,y2 but got {:?}", spec);
    }
    let class_id: u32 = fields[0].parse().context("bad class id")?;
    let confidence: f32 = fields[1].parse().context("bad confidence")?;
    let coords: Vec<i32> = fields[2..]
        .iter()
        .map(|f| f.parse::<i32>().context("bad coordinate"))
        .collect::<Result<_>>()?;
    Ok(PixelBox::new(class_id, coords[0], coords[1], coords[2], coords[3]).with_confidence(confidence))
}

fn draw_boxes(canvas: &mut RgbImage, boxes: &[PixelBox]) {
    for b in boxes {
        if b.width() <= 0 || b.height() <= 0 {
            continue;
        }
        let rect = Rect::at(b.x1, b.y1).of_size(b.width() as u32, b.height() as u32);
        draw_hollow_rect_mut(canvas, rect, Rgb([0, 255, 0]));
    }
}
