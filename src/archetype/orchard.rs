use super::{cluster, jitter, pick, Archetype, StrokePolicy};
use crate::growth::algorithm::{BranchFrame, GrowthStep};
use crate::growth::{Entity, EntityKind, SeededRandom};
use crate::math::{Color, Point};
use crate::render::{CompositeRule, DrawOrder, Layer, Occlusion};

const LEAVES: [Color; 4] = [
    Color::rgb(76, 140, 58),
    Color::rgb(98, 158, 66),
    Color::rgb(60, 120, 50),
    Color::rgb(120, 170, 80),
];

const FRUIT: [Color; 3] = [
    Color::rgb(196, 42, 38),
    Color::rgb(220, 120, 40),
    Color::rgb(170, 30, 60),
];

const BARK: Color = Color::rgb(104, 74, 52);

const FOLIAGE_DEPTH: u32 = 3;
const FRUIT_CHANCE: f64 = 0.1;
const THIRD_FORK_CHANCE: f64 = 0.3;

/// Broad deciduous tree that forks in two (sometimes three) at every level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orchard {
    pub length: f64,
    pub heading: f64,
    pub depth: u32,
}

impl Orchard {
    pub fn new(length: f64, heading: f64, depth: u32) -> Self {
        Self { length, heading, depth }
    }
}

impl Archetype for Orchard {
    fn name(&self) -> &'static str {
        "orchard"
    }

    fn root_step(&self) -> GrowthStep {
        GrowthStep::root(Point::ZERO, self.length, self.heading, self.depth)
    }

    fn heading_jitter(&self, _step: &GrowthStep) -> f64 {
        6.0
    }

    fn bow(&self) -> f64 {
        0.18
    }

    fn stroke_width(&self, rng: &mut SeededRandom, step: &GrowthStep) -> f64 {
        (step.remaining as f64).powf(1.3) * 1.6 + rng.next_float(-0.3, 0.3)
    }

    fn min_width(&self) -> f64 {
        0.8
    }

    fn attach_entities(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<Entity> {
        if frame.step.remaining > FOLIAGE_DEPTH {
            return Vec::new();
        }

        let count = rng.next_int(4, 9);
        (0..count)
            .map(|_| {
                let t = rng.next_float(0.3, 1.0);
                let center = frame.point_at(t) + jitter(rng, 8.0);
                if rng.next_bool(FRUIT_CHANCE) {
                    let radius = rng.next_float(6.0, 9.0);
                    cluster(center, radius, pick(rng, &FRUIT), EntityKind::Fruit, frame.distance_at(t))
                } else {
                    let radius = rng.next_float(8.0, 14.0);
                    cluster(center, radius, pick(rng, &LEAVES), EntityKind::Leaf, frame.distance_at(t))
                }
            })
            .collect()
    }

    fn branch_out(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<GrowthStep> {
        let remaining = frame.step.remaining - 1;
        let length = frame.step.length;

        let left = frame.heading - rng.next_float(18.0, 38.0);
        let right = frame.heading + rng.next_float(18.0, 38.0);
        let mut headings = vec![left, right];
        if rng.next_bool(THIRD_FORK_CHANCE) {
            headings.insert(1, frame.heading + rng.next_float(-8.0, 8.0));
        }

        headings
            .into_iter()
            .map(|heading| frame.child(length * rng.next_float(0.7, 0.82), heading, remaining))
            .collect()
    }

    fn stroke_policy(&self) -> StrokePolicy {
        StrokePolicy::Hold
    }

    fn stroke_color(&self, depth: u32) -> Color {
        // twigs read lighter than the trunk
        let t = (depth as f64 / self.depth.max(1) as f64).clamp(0.0, 1.0);
        BARK.lighten(0.25).lerp(&BARK, t)
    }

    fn fade_speed(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Leaf => 35.0,
            EntityKind::Fruit => 70.0,
            _ => 40.0,
        }
    }

    fn composite_rule(&self) -> CompositeRule {
        CompositeRule {
            layers: vec![
                Layer::Segments,
                Layer::Entities(EntityKind::Leaf, DrawOrder::AscendingY),
                Layer::Entities(EntityKind::Fruit, DrawOrder::AscendingY),
            ],
            occlusion: vec![Occlusion {
                hidden: EntityKind::Leaf,
                occluder: EntityKind::Fruit,
                reach: 0.6,
            }],
        }
    }
}
