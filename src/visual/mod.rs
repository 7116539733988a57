//! Pixel-level evaluation of rendered frames

pub mod metrics;

pub use metrics::{analyze_frame, analyze_pixels, FrameMetrics};
