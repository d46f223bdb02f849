//! Filter gallery: a closed set of stateless filters applied at a variable
//! intensity and alpha-blended with the original image.
//!
//! One scalar drives everything: it scales the operator's kernel size or
//! thresholds (per filter) and also weights the final blend, so a stronger
//! response is also shown more strongly.

pub mod convolve;
pub mod edge;
pub mod frequency;

use std::str::FromStr;

use anyhow::bail;
use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use self::edge::Axis;

/// The gallery's filter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GalleryFilter {
    Original,
    Bandpass,
    Gabor,
    Laplacian,
    SobelX,
    SobelY,
    ScharrX,
    ScharrY,
    Prewitt,
    CannyEdge,
}

impl GalleryFilter {
    pub const ALL: [GalleryFilter; 10] = [
        GalleryFilter::Original,
        GalleryFilter::Bandpass,
        GalleryFilter::Gabor,
        GalleryFilter::Laplacian,
        GalleryFilter::SobelX,
        GalleryFilter::SobelY,
        GalleryFilter::ScharrX,
        GalleryFilter::ScharrY,
        GalleryFilter::Prewitt,
        GalleryFilter::CannyEdge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GalleryFilter::Original => "Original",
            GalleryFilter::Bandpass => "Bandpass Filter",
            GalleryFilter::Gabor => "Gabor Filter",
            GalleryFilter::Laplacian => "Laplacian",
            GalleryFilter::SobelX => "Sobel X",
            GalleryFilter::SobelY => "Sobel Y",
            GalleryFilter::ScharrX => "Scharr X",
            GalleryFilter::ScharrY => "Scharr Y",
            GalleryFilter::Prewitt => "Prewitt",
            GalleryFilter::CannyEdge => "Canny Edge",
        }
    }

    /// Apply the filter at the given intensity and blend the normalized
    /// result with the original.
    pub fn apply(&self, image: &RgbImage, intensity: f32) -> RgbImage {
        if image.width() == 0 || image.height() == 0 {
            return image.clone();
        }
        if matches!(self, GalleryFilter::Original) {
            return image.clone();
        }

        let gray = image::imageops::grayscale(image);
        let filtered = self.raw(&gray, intensity);
        blend_with_original(image, &filtered, intensity)
    }

    /// The filter's raw response, normalized to displayable 8-bit, before
    /// blending.
    pub fn raw(&self, gray: &GrayImage, intensity: f32) -> GrayImage {
        match self {
            GalleryFilter::Original => gray.clone(),
            GalleryFilter::Bandpass => frequency::bandpass(gray, intensity),
            GalleryFilter::Gabor => frequency::gabor(gray, intensity),
            GalleryFilter::Laplacian => edge::laplacian(gray, intensity),
            GalleryFilter::SobelX => edge::sobel(gray, intensity, Axis::X),
            GalleryFilter::SobelY => edge::sobel(gray, intensity, Axis::Y),
            GalleryFilter::ScharrX => edge::scharr(gray, intensity, Axis::X),
            GalleryFilter::ScharrY => edge::scharr(gray, intensity, Axis::Y),
            GalleryFilter::Prewitt => edge::prewitt(gray, intensity),
            GalleryFilter::CannyEdge => edge::canny_edge(gray, intensity),
        }
    }
}

impl FromStr for GalleryFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "original" => GalleryFilter::Original,
            "bandpass" => GalleryFilter::Bandpass,
            "gabor" => GalleryFilter::Gabor,
            "laplacian" => GalleryFilter::Laplacian,
            "sobel-x" => GalleryFilter::SobelX,
            "sobel-y" => GalleryFilter::SobelY,
            "scharr-x" => GalleryFilter::ScharrX,
            "scharr-y" => GalleryFilter::ScharrY,
            "prewitt" => GalleryFilter::Prewitt,
            "canny" => GalleryFilter::CannyEdge,
            other => bail!("unknown filter {:?}", other),
        })
    }
}

/// Map a discrete slider step (1..=10) to a blend/scaling intensity in
/// [0.2, 2.0].
pub fn slider_to_intensity(step: u8) -> f32 {
    step.clamp(1, 10) as f32 / 5.0
}

/// Alpha-blend a single-channel filter result over the original:
/// `(1 - intensity) * original + intensity * filtered`, per channel, after
/// broadcasting the filtered plane to three channels.
pub fn blend_with_original(original: &RgbImage, filtered: &GrayImage, intensity: f32) -> RgbImage {
    debug_assert_eq!(original.dimensions(), filtered.dimensions());
    RgbImage::from_fn(original.width(), original.height(), |x, y| {
        let f = filtered.get_pixel(x, y)[0] as f32;
        let o = original.get_pixel(x, y);
        let mut channels = [0u8; 3];
        for (c, out) in channels.iter_mut().enumerate() {
            let blended = (1.0 - intensity) * o[c] as f32 + intensity * f;
            *out = blended.clamp(0.0, 255.0).round() as u8;
        }
        Rgb(channels)
    })
}
