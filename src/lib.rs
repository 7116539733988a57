use image::RgbaImage;
use tracing::info;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod math;
pub mod growth;
pub mod archetype;
pub mod data;
pub mod animation;
pub mod render;
pub mod visual;

pub use error::{GrowthError, Result, SinkError};
pub use data::{AnimationConfig, CanvasConfig, GrowthConfig, PlantConfig};
pub use growth::{Branch, Entity, EntityKind, Fit, SeededRandom, StructureGenerator};
pub use animation::{Flattened, GrowthProjector, GrowthTimeline, PlacedEntity, Playback, Segment};
pub use render::{compose, paint, Frame, FrameProducer, FrameSink, RasterSurface};

use archetype::Archetype;
use growth::{compute_bounds, compute_fit, compute_max_distance};
use math::{Bounds, Color};
use render::DrawSurface;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// A generated plant with everything needed to draw any frame of its growth
pub struct GrowthSession {
    config: GrowthConfig,
    archetype: Box<dyn Archetype>,
    tree: Branch,
    bounds: Bounds,
    fit: Fit,
    max_distance: f64,
    timeline: GrowthTimeline,
}

impl GrowthSession {
    pub fn from_config(config: &GrowthConfig) -> Result<Self> {
        config.validate()?;

        let archetype = archetype::from_config(&config.plant);
        let tree = StructureGenerator::new(archetype.as_ref()).generate(&config.seed)?;
        let bounds = compute_bounds(&tree);
        let canvas = &config.canvas;
        let fit = compute_fit(&bounds, canvas.width as f64, canvas.height as f64, canvas.padding)?;
        let max_distance = compute_max_distance(&tree);
        let timeline = GrowthTimeline::new(max_distance, &config.animation)?;

        info!(
            archetype = archetype.name(),
            seed = %config.seed,
            branches = tree.count(),
            entities = tree.entity_count(),
            max_distance,
            frames = timeline.total_frames,
            "growth session ready"
        );

        Ok(Self {
            config: config.clone(),
            archetype,
            tree,
            bounds,
            fit,
            max_distance,
            timeline,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_config(&GrowthConfig::from_yaml(yaml)?)
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn archetype(&self) -> &dyn Archetype {
        self.archetype.as_ref()
    }

    pub fn tree(&self) -> &Branch {
        &self.tree
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fit(&self) -> Fit {
        self.fit
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn timeline(&self) -> &GrowthTimeline {
        &self.timeline
    }

    /// Visible geometry at an arbitrary growth distance
    pub fn flatten_at(&self, progress: f64) -> Flattened {
        GrowthProjector::new(self.archetype.as_ref(), self.fit).flatten(&self.tree, progress)
    }

    pub fn compose_at(&self, progress: f64) -> Frame {
        compose(&self.archetype.composite_rule(), self.flatten_at(progress), progress)
    }

    /// Composed draw list for timeline frame `index`
    pub fn frame(&self, index: usize) -> Frame {
        self.compose_at(self.timeline.progress_at(index))
    }

    /// Rasterize a composed frame onto the configured canvas
    pub fn render(&self, frame: &Frame) -> RgbaImage {
        let canvas = &self.config.canvas;
        let mut surface = RasterSurface::new(canvas.width, canvas.height);
        surface.clear(canvas.background);
        paint(frame, &mut surface);
        surface.into_image()
    }
}

/// Floats per segment in `segments_at`
pub const SEGMENT_STRIDE: usize = 8;
/// Floats per entity in `entities_at`
pub const ENTITY_STRIDE: usize = 8;

/// `0xRRGGBBAA` as a float, exact for every color
fn pack_color(color: Color) -> f64 {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u32;
    let packed = (color.r as u32) << 24 | (color.g as u32) << 16 | (color.b as u32) << 8 | alpha;
    packed as f64
}

/// start, control, end, width, color
fn pack_segments(frame: &Frame) -> Vec<f64> {
    let mut out = Vec::with_capacity(frame.len() * SEGMENT_STRIDE);
    for s in frame.segments() {
        out.extend_from_slice(&[
            s.start.x,
            s.start.y,
            s.control.x,
            s.control.y,
            s.end.x,
            s.end.y,
            s.width,
            pack_color(s.color),
        ]);
    }
    out
}

/// center, radius, opacity, color, highlight, kind tag, reveal distance
fn pack_entities(frame: &Frame) -> Vec<f64> {
    let mut out = Vec::with_capacity(frame.len() * ENTITY_STRIDE);
    for e in frame.entities() {
        out.extend_from_slice(&[
            e.center.x,
            e.center.y,
            e.radius,
            e.opacity,
            pack_color(e.color),
            pack_color(e.highlight),
            e.kind.tag() as f64,
            e.dist_from_root,
        ]);
    }
    out
}

fn to_js(err: GrowthError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Growth animation state exposed to JavaScript
#[wasm_bindgen]
pub struct PlantGrowth {
    session: GrowthSession,
    playback: Playback,
}

#[wasm_bindgen]
impl PlantGrowth {
    /// Generate a plant from a YAML configuration
    #[wasm_bindgen(constructor)]
    pub fn new(yaml: &str) -> std::result::Result<PlantGrowth, JsValue> {
        let session = GrowthSession::from_yaml(yaml).map_err(to_js)?;
        Ok(Self::from_session(session))
    }

    #[wasm_bindgen]
    pub fn archetype(&self) -> String {
        self.session.archetype().name().to_string()
    }

    #[wasm_bindgen]
    pub fn width(&self) -> u32 {
        u32::from(self.session.config().canvas.width)
    }

    #[wasm_bindgen]
    pub fn height(&self) -> u32 {
        u32::from(self.session.config().canvas.height)
    }

    /// Number of frames in the fixed-rate timeline
    #[wasm_bindgen]
    pub fn frame_count(&self) -> usize {
        self.session.timeline().total_frames
    }

    /// Growth distance shown on `frame`
    #[wasm_bindgen]
    pub fn progress_at(&self, frame: usize) -> f64 {
        self.session.timeline().progress_at(frame)
    }

    /// Draw-ordered segments, `SEGMENT_STRIDE` floats each
    #[wasm_bindgen]
    pub fn segments_at(&self, frame: usize) -> Vec<f64> {
        pack_segments(&self.session.frame(frame))
    }

    /// Draw-ordered entities, `ENTITY_STRIDE` floats each
    #[wasm_bindgen]
    pub fn entities_at(&self, frame: usize) -> Vec<f64> {
        pack_entities(&self.session.frame(frame))
    }

    /// RGBA pixels of timeline frame `frame`
    #[wasm_bindgen]
    pub fn render_rgba(&self, frame: usize) -> Vec<u8> {
        let frame = self.session.frame(frame);
        self.session.render(&frame).into_raw()
    }

    /// RGBA pixels at the interactive playback position
    #[wasm_bindgen]
    pub fn render_current(&self) -> Vec<u8> {
        let frame = self.session.compose_at(self.playback.get_progress());
        self.session.render(&frame).into_raw()
    }

    /// Advance the interactive playback by `dt` seconds
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f64) {
        self.playback.update(dt);
    }

    // === Animation Controls ===

    /// Start the growth animation
    #[wasm_bindgen]
    pub fn start_growth_animation(&mut self) {
        self.playback.start();
    }

    /// Reset and restart the growth animation
    #[wasm_bindgen]
    pub fn reset_growth_animation(&mut self) {
        self.playback.reset();
        self.playback.start();
    }

    /// Complete the growth instantly
    #[wasm_bindgen]
    pub fn complete_growth(&mut self) {
        self.playback.complete_instantly();
    }

    /// Set growth progress manually (0.0 to 1.0)
    #[wasm_bindgen]
    pub fn set_growth_progress(&mut self, fraction: f64) {
        self.playback.set_progress(fraction * self.playback.budget);
    }

    /// Get current growth progress (0.0 to 1.0)
    #[wasm_bindgen]
    pub fn get_growth_progress(&self) -> f64 {
        self.playback.fraction()
    }

    /// Check if growth animation is complete
    #[wasm_bindgen]
    pub fn is_growth_complete(&self) -> bool {
        self.playback.is_complete()
    }

    /// Check if growth animation is playing
    #[wasm_bindgen]
    pub fn is_growth_playing(&self) -> bool {
        self.playback.is_playing()
    }
}

impl PlantGrowth {
    pub fn from_session(session: GrowthSession) -> Self {
        let timeline = session.timeline();
        let playback = Playback::new(timeline.budget, timeline.duration_secs());
        Self { session, playback }
    }

    pub fn session(&self) -> &GrowthSession {
        &self.session
    }
}
