//! Plant archetypes
//!
//! An archetype is the policy the shared generator, projector and
//! compositor consult for everything plant-specific: how branches fork,
//! which clusters they carry, how strokes react to growth, how quickly
//! each kind of cluster fades in and how the frame is layered.

mod pine;
mod orchard;
mod sunflower;

pub use pine::Pine;
pub use orchard::Orchard;
pub use sunflower::Sunflower;

use crate::data::PlantConfig;
use crate::growth::algorithm::{BranchFrame, GrowthStep, MIN_STROKE_WIDTH};
use crate::growth::{Entity, EntityKind, SeededRandom};
use crate::math::{Color, Point};
use crate::render::CompositeRule;

/// How a partially grown branch's stroke width responds to growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokePolicy {
    /// Width swells with the visible fraction of the branch
    Taper,
    /// Full width as soon as any of the branch is visible
    #[default]
    Hold,
}

impl StrokePolicy {
    /// Width multiplier for a branch drawn up to `local_t`
    pub fn width_factor(&self, local_t: f64) -> f64 {
        match self {
            StrokePolicy::Taper => 1.0 - 0.65 * (1.0 - local_t.clamp(0.0, 1.0)),
            StrokePolicy::Hold => 1.0,
        }
    }
}

/// Plant-specific rules consulted by the shared engine
pub trait Archetype: Send + Sync {
    fn name(&self) -> &'static str;

    /// Step that grows the root branch
    fn root_step(&self) -> GrowthStep;

    /// Maximum heading perturbation in degrees for this step
    fn heading_jitter(&self, step: &GrowthStep) -> f64;

    /// Maximum control point displacement as a fraction of length
    fn bow(&self) -> f64;

    fn stroke_width(&self, rng: &mut SeededRandom, step: &GrowthStep) -> f64;

    fn min_width(&self) -> f64 {
        MIN_STROKE_WIDTH
    }

    /// Decorative clusters owned by the branch described by `frame`
    fn attach_entities(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<Entity>;

    /// Child steps; only called while `remaining > 0`
    fn branch_out(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<GrowthStep>;

    fn stroke_policy(&self) -> StrokePolicy;

    fn stroke_color(&self, depth: u32) -> Color;

    /// Growth distance over which a cluster of `kind` fades in
    fn fade_speed(&self, kind: EntityKind) -> f64;

    fn composite_rule(&self) -> CompositeRule;
}

/// Build the archetype a configuration asks for
pub fn from_config(config: &PlantConfig) -> Box<dyn Archetype> {
    match *config {
        PlantConfig::Pine { length, heading, depth } => Box::new(Pine::new(length, heading, depth)),
        PlantConfig::Orchard { length, heading, depth } => {
            Box::new(Orchard::new(length, heading, depth))
        }
        PlantConfig::Sunflower {
            segment_length,
            heading,
            segments,
            petal_count,
            seed_count,
        } => Box::new(Sunflower::new(segment_length, heading, segments, petal_count, seed_count)),
    }
}

/// Highlight lift applied to every base palette color
const HIGHLIGHT_LIFT: f64 = 0.35;

fn pick(rng: &mut SeededRandom, palette: &[Color]) -> Color {
    if palette.is_empty() {
        return Color::default();
    }
    let i = rng.next_int(0, palette.len() as i64) as usize;
    palette[i.min(palette.len() - 1)]
}

fn cluster(center: Point, radius: f64, base: Color, kind: EntityKind, dist_from_root: f64) -> Entity {
    Entity {
        center,
        radius,
        color: base,
        highlight: base.lighten(HIGHLIGHT_LIFT),
        kind,
        dist_from_root,
    }
}

/// Random point jitter inside a square of half-size `amount`
fn jitter(rng: &mut SeededRandom, amount: f64) -> Point {
    Point::new(rng.next_float(-amount, amount), rng.next_float(-amount, amount))
}
