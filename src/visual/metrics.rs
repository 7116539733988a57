//! Pixel metrics for rendered frames
//!
//! Lets rendering tests assert on what actually landed in the buffer:
//! how much of the canvas the plant covers, where it sits, and what
//! colors dominate.

use image::RgbaImage;

use crate::math::Color;

/// Metrics computed from a rendered frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetrics {
    /// Average brightness (0-1)
    pub avg_brightness: f64,
    /// Maximum brightness found
    pub max_brightness: f64,
    /// Fraction of pixels that differ from the background
    pub coverage: f64,
    /// Average saturation of covered pixels (0-1)
    pub avg_saturation: f64,
    /// Histogram of covered pixel hues (12 bins, 30 degrees each), normalized
    pub hue_histogram: [f64; 12],
    /// Most common hue bin (0-11)
    pub peak_hue_bin: usize,
    /// Dominant hue (0-360 degrees, bin center)
    pub dominant_hue: f64,
    /// Inclusive pixel box `(min_x, min_y, max_x, max_y)` of covered pixels
    pub extent: Option<(u32, u32, u32, u32)>,
}

impl FrameMetrics {
    pub fn is_blank(&self) -> bool {
        self.extent.is_none()
    }
}

/// Per-channel distance below which a pixel counts as background
const BACKGROUND_TOLERANCE: u8 = 2;

/// Analyze raw RGBA pixels against the background they were cleared to
pub fn analyze_pixels(pixels: &[u8], width: u32, height: u32, background: Color) -> FrameMetrics {
    let pixel_count = (width as usize) * (height as usize);
    if pixel_count == 0 || pixels.len() < pixel_count * 4 {
        return FrameMetrics::default();
    }

    let mut total_brightness = 0.0;
    let mut max_brightness = 0.0f64;
    let mut covered = 0usize;
    let mut total_saturation = 0.0;
    let mut hue_counts = [0usize; 12];
    let mut extent: Option<(u32, u32, u32, u32)> = None;

    for (i, px) in pixels.chunks_exact(4).take(pixel_count).enumerate() {
        let r = px[0] as f64 / 255.0;
        let g = px[1] as f64 / 255.0;
        let b = px[2] as f64 / 255.0;

        let brightness = 0.299 * r + 0.587 * g + 0.114 * b;
        total_brightness += brightness;
        max_brightness = max_brightness.max(brightness);

        let is_background = px[0].abs_diff(background.r) <= BACKGROUND_TOLERANCE
            && px[1].abs_diff(background.g) <= BACKGROUND_TOLERANCE
            && px[2].abs_diff(background.b) <= BACKGROUND_TOLERANCE;
        if is_background {
            continue;
        }

        covered += 1;
        let (h, s, _v) = rgb_to_hsv(r, g, b);
        total_saturation += s;
        if s > 0.1 {
            hue_counts[((h / 30.0).floor() as usize) % 12] += 1;
        }

        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        extent = Some(match extent {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    let total_hued: usize = hue_counts.iter().sum();
    let mut hue_histogram = [0.0; 12];
    let mut peak_hue_bin = 0;
    for (i, &count) in hue_counts.iter().enumerate() {
        hue_histogram[i] = if total_hued > 0 {
            count as f64 / total_hued as f64
        } else {
            0.0
        };
        if hue_histogram[i] > hue_histogram[peak_hue_bin] {
            peak_hue_bin = i;
        }
    }

    FrameMetrics {
        avg_brightness: total_brightness / pixel_count as f64,
        max_brightness,
        coverage: covered as f64 / pixel_count as f64,
        avg_saturation: if covered > 0 {
            total_saturation / covered as f64
        } else {
            0.0
        },
        hue_histogram,
        peak_hue_bin,
        dominant_hue: peak_hue_bin as f64 * 30.0 + 15.0,
        extent,
    }
}

pub fn analyze_frame(image: &RgbaImage, background: Color) -> FrameMetrics {
    analyze_pixels(image.as_raw(), image.width(), image.height(), background)
}

/// Convert RGB (0-1) to HSV (hue: 0-360, saturation: 0-1, value: 0-1)
fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h = if delta < 0.0001 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };

    (h, s, max)
}
