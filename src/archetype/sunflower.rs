use super::{cluster, pick, Archetype, StrokePolicy};
use crate::growth::algorithm::{BranchFrame, GrowthStep};
use crate::growth::{Entity, EntityKind, SeededRandom};
use crate::math::{Color, Point};
use crate::render::{CompositeRule, DrawOrder, Layer, Occlusion};

/// 360 / phi^2 in degrees
pub const GOLDEN_ANGLE: f64 = 137.508;

/// Seed spiral radius grows as SPIRAL_SCALE * sqrt(index)
const SPIRAL_SCALE: f64 = 1.9;
/// Gap between the seed disk and the petal ring
const PETAL_GAP: f64 = 8.0;
/// Growth distance between consecutive petals
const PETAL_STAGGER: f64 = 0.6;
/// Growth distance between the last petal wave and the first seed
const SEED_DELAY: f64 = 6.0;
/// Growth distance between consecutive seeds
const SEED_STAGGER: f64 = 0.35;

const LEAVES: [Color; 3] = [
    Color::rgb(70, 132, 48),
    Color::rgb(88, 150, 56),
    Color::rgb(58, 116, 42),
];

const PETALS: [Color; 3] = [
    Color::rgb(246, 196, 38),
    Color::rgb(250, 178, 28),
    Color::rgb(238, 210, 60),
];

const SEEDS: [Color; 2] = [Color::rgb(82, 52, 26), Color::rgb(60, 38, 20)];

const STALK: Color = Color::rgb(86, 136, 54);

/// Single stalk with alternating leaves, topped by a petal ring around a
/// Fibonacci spiral of seeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sunflower {
    pub segment_length: f64,
    pub heading: f64,
    pub segments: u32,
    pub petal_count: usize,
    pub seed_count: usize,
}

impl Sunflower {
    pub fn new(
        segment_length: f64,
        heading: f64,
        segments: u32,
        petal_count: usize,
        seed_count: usize,
    ) -> Self {
        Self {
            segment_length,
            heading,
            segments,
            petal_count,
            seed_count,
        }
    }

    /// Radius of the seed disk
    pub fn disk_radius(&self) -> f64 {
        SPIRAL_SCALE * (self.seed_count as f64).sqrt()
    }

    fn has_leaf(&self, remaining: u32) -> bool {
        remaining >= 2 && remaining + 2 <= self.segments
    }

    fn leaf(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Entity {
        let side = if frame.step.remaining % 2 == 0 { 1.0 } else { -1.0 };
        let t = rng.next_float(0.45, 0.8);
        let offset = rng.next_float(18.0, 26.0);
        let center = frame.point_at(t) + frame.normal().scale(side * offset);
        let radius = rng.next_float(14.0, 20.0);
        cluster(center, radius, pick(rng, &LEAVES), EntityKind::Leaf, frame.distance_at(t))
    }

    /// Terminal head: petal ring first, then the seed spiral from the center out
    fn head(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<Entity> {
        let center = frame.end;
        let base = frame.end_distance();
        let ring = self.disk_radius() + PETAL_GAP;
        let mut entities = Vec::with_capacity(self.petal_count + self.seed_count);

        let step = 360.0 / self.petal_count.max(1) as f64;
        for i in 0..self.petal_count {
            let angle = i as f64 * step + rng.next_float(-4.0, 4.0);
            let position = center + Point::from_heading(angle).scale(ring);
            let radius = rng.next_float(11.0, 15.0);
            entities.push(cluster(
                position,
                radius,
                pick(rng, &PETALS),
                EntityKind::Petal,
                base + i as f64 * PETAL_STAGGER,
            ));
        }

        for i in 0..self.seed_count {
            let angle = i as f64 * GOLDEN_ANGLE;
            let position = center + Point::from_heading(angle).scale(SPIRAL_SCALE * (i as f64).sqrt());
            let radius = rng.next_float(2.2, 3.0);
            entities.push(cluster(
                position,
                radius,
                pick(rng, &SEEDS),
                EntityKind::Seed,
                base + SEED_DELAY + i as f64 * SEED_STAGGER,
            ));
        }

        entities
    }
}

impl Archetype for Sunflower {
    fn name(&self) -> &'static str {
        "sunflower"
    }

    fn root_step(&self) -> GrowthStep {
        GrowthStep::root(Point::ZERO, self.segment_length, self.heading, self.segments)
    }

    fn heading_jitter(&self, _step: &GrowthStep) -> f64 {
        5.0
    }

    fn bow(&self) -> f64 {
        0.12
    }

    fn stroke_width(&self, rng: &mut SeededRandom, step: &GrowthStep) -> f64 {
        3.0 + step.remaining as f64 * 0.6 + rng.next_float(-0.2, 0.2)
    }

    fn min_width(&self) -> f64 {
        2.0
    }

    fn attach_entities(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<Entity> {
        let remaining = frame.step.remaining;
        if remaining == 0 {
            self.head(rng, frame)
        } else if self.has_leaf(remaining) {
            vec![self.leaf(rng, frame)]
        } else {
            Vec::new()
        }
    }

    fn branch_out(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<GrowthStep> {
        // lean halfway back toward the base heading so the stalk stays upright
        let heading = frame.heading - (frame.heading - self.heading) * 0.5;
        let length = self.segment_length * rng.next_float(0.92, 1.05);
        vec![frame.child(length, heading, frame.step.remaining - 1)]
    }

    fn stroke_policy(&self) -> StrokePolicy {
        StrokePolicy::Hold
    }

    fn stroke_color(&self, _depth: u32) -> Color {
        STALK
    }

    fn fade_speed(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Leaf => 40.0,
            EntityKind::Petal => 30.0,
            EntityKind::Seed => 12.0,
            _ => 30.0,
        }
    }

    fn composite_rule(&self) -> CompositeRule {
        CompositeRule {
            layers: vec![
                Layer::Entities(EntityKind::Leaf, DrawOrder::AscendingY),
                Layer::Segments,
                Layer::Entities(EntityKind::Petal, DrawOrder::AscendingY),
                Layer::Entities(EntityKind::Seed, DrawOrder::Distance),
            ],
            // outer seeds tuck under the lower half of the petal ring
            occlusion: vec![Occlusion {
                hidden: EntityKind::Seed,
                occluder: EntityKind::Petal,
                reach: 0.8,
            }],
        }
    }
}
