//! Bright-blob star detection and annotation
//!
//! Detection follows the classic light-blob recipe: threshold the intensity
//! image into a binary mask, label connected components, and keep components
//! above a minimum area. Centroid and characteristic radius come from the
//! component's pixel statistics. The detector is deterministic: the same
//! image and parameters always produce the same detections, in raster order
//! of first appearance.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use imageproc::region_labelling::{connected_components, Connectivity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker color for annotated detections
const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Parameters controlling star detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionParams {
    /// Minimum pixel intensity (0-255) counted as "bright"
    pub min_brightness: u8,

    /// Minimum blob area in pixels; smaller blobs are treated as noise
    pub min_area: u32,

    /// Maximum blob area in pixels (None = unbounded); rejects large bright
    /// regions such as nebulae or overexposed patches
    pub max_area: Option<u32>,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_brightness: 200,
            min_area: 10,
            max_area: None,
        }
    }
}

/// A detected bright point-like feature
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedStar {
    /// Centroid X in pixels
    pub x: f32,
    /// Centroid Y in pixels
    pub y: f32,
    /// Blob area in pixels
    pub area: u32,
    /// Characteristic radius, derived from the area of an equivalent disc
    pub radius: f32,
}

#[derive(Debug, Default)]
struct BlobStats {
    area: u32,
    sum_x: u64,
    sum_y: u64,
}

/// Detect bright, roughly point-like blobs in a grayscale image
#[must_use]
pub fn detect_stars(gray: &GrayImage, params: &DetectionParams) -> Vec<DetectedStar> {
    if gray.width() == 0 || gray.height() == 0 {
        return Vec::new();
    }

    let mask = threshold_mask(gray, params.min_brightness);
    let labels = connected_components(&mask, Connectivity::Eight, Luma([0u8]));

    let mut blobs: BTreeMap<u32, BlobStats> = BTreeMap::new();
    for (x, y, pixel) in labels.enumerate_pixels() {
        let label = pixel.0[0];
        if label == 0 {
            continue;
        }
        let stats = blobs.entry(label).or_default();
        stats.area += 1;
        stats.sum_x += u64::from(x);
        stats.sum_y += u64::from(y);
    }

    let stars: Vec<DetectedStar> = blobs
        .values()
        .filter(|stats| {
            stats.area >= params.min_area
                && params.max_area.map_or(true, |max| stats.area <= max)
        })
        .map(|stats| {
            let area = stats.area as f32;
            DetectedStar {
                x: stats.sum_x as f32 / area,
                y: stats.sum_y as f32 / area,
                area: stats.area,
                radius: (area / std::f32::consts::PI).sqrt(),
            }
        })
        .collect();

    log::debug!(
        "Detected {} blob(s) above area {} at brightness >= {}",
        stars.len(),
        params.min_area,
        params.min_brightness
    );
    stars
}

/// Binary mask of pixels at or above the brightness cutoff
fn threshold_mask(gray: &GrayImage, min_brightness: u8) -> GrayImage {
    let mut mask = GrayImage::new(gray.width(), gray.height());
    for (mask_pixel, src_pixel) in mask.pixels_mut().zip(gray.pixels()) {
        mask_pixel.0[0] = if src_pixel.0[0] >= min_brightness {
            255
        } else {
            0
        };
    }
    mask
}

/// Draw a hollow circle marker at each detection onto a copy of the image
#[must_use]
pub fn annotate_stars(image: &RgbImage, stars: &[DetectedStar]) -> RgbImage {
    let mut annotated = image.clone();
    for star in stars {
        // Keep tiny detections visible
        let radius = (star.radius.ceil() as i32).max(3);
        draw_hollow_circle_mut(
            &mut annotated,
            (star.x.round() as i32, star.y.round() as i32),
            radius,
            MARKER_COLOR,
        );
    }
    annotated
}
