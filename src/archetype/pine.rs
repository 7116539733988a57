use super::{cluster, jitter, pick, Archetype, StrokePolicy};
use crate::growth::algorithm::{BranchFrame, GrowthStep};
use crate::growth::{Entity, EntityKind, SeededRandom};
use crate::math::{Color, Point};
use crate::render::{CompositeRule, DrawOrder, Layer, Occlusion};

const NEEDLES: [Color; 4] = [
    Color::rgb(34, 92, 52),
    Color::rgb(28, 78, 46),
    Color::rgb(46, 110, 60),
    Color::rgb(22, 66, 40),
];

const CONES: [Color; 2] = [Color::rgb(120, 78, 44), Color::rgb(98, 62, 36)];

const BARK: Color = Color::rgb(88, 60, 40);

/// Clusters only appear on the outer branches
const FOLIAGE_DEPTH: u32 = 4;
const CONE_CHANCE: f64 = 0.08;

/// Conical conifer: a straight leader with whorls of side branches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pine {
    pub length: f64,
    pub heading: f64,
    pub depth: u32,
}

impl Pine {
    pub fn new(length: f64, heading: f64, depth: u32) -> Self {
        Self { length, heading, depth }
    }
}

impl Archetype for Pine {
    fn name(&self) -> &'static str {
        "pine"
    }

    fn root_step(&self) -> GrowthStep {
        GrowthStep::root(Point::ZERO, self.length, self.heading, self.depth)
    }

    fn heading_jitter(&self, step: &GrowthStep) -> f64 {
        if step.dist_from_root == 0.0 {
            2.0
        } else {
            4.0
        }
    }

    fn bow(&self) -> f64 {
        0.08
    }

    fn stroke_width(&self, rng: &mut SeededRandom, step: &GrowthStep) -> f64 {
        step.remaining as f64 * 2.4 + rng.next_float(-0.4, 0.4)
    }

    fn min_width(&self) -> f64 {
        1.0
    }

    fn attach_entities(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<Entity> {
        if frame.step.remaining > FOLIAGE_DEPTH {
            return Vec::new();
        }

        let count = rng.next_int(3, 7);
        (0..count)
            .map(|_| {
                let t = rng.next_float(0.2, 1.0);
                let center = frame.point_at(t) + jitter(rng, 6.0);
                if rng.next_bool(CONE_CHANCE) {
                    let radius = rng.next_float(9.0, 13.0);
                    cluster(center, radius, pick(rng, &CONES), EntityKind::Cone, frame.distance_at(t))
                } else {
                    let radius = rng.next_float(7.0, 12.0);
                    cluster(center, radius, pick(rng, &NEEDLES), EntityKind::Needle, frame.distance_at(t))
                }
            })
            .collect()
    }

    fn branch_out(&self, rng: &mut SeededRandom, frame: &BranchFrame) -> Vec<GrowthStep> {
        let remaining = frame.step.remaining;
        let length = frame.step.length;

        let leader = frame.child(length * rng.next_float(0.78, 0.86), frame.heading, remaining - 1);
        let mut children = vec![leader];

        let sides = rng.next_int(2, 4) as usize;
        let mut side = if rng.next_bool(0.5) { 1.0 } else { -1.0 };
        for _ in 0..sides {
            let offset = rng.next_float(35.0, 70.0);
            children.push(frame.child(
                length * rng.next_float(0.45, 0.6),
                frame.heading + side * offset,
                remaining.saturating_sub(2),
            ));
            side = -side;
        }

        children
    }

    fn stroke_policy(&self) -> StrokePolicy {
        StrokePolicy::Taper
    }

    fn stroke_color(&self, _depth: u32) -> Color {
        BARK
    }

    fn fade_speed(&self, kind: EntityKind) -> f64 {
        match kind {
            EntityKind::Needle => 25.0,
            EntityKind::Cone => 60.0,
            _ => 30.0,
        }
    }

    fn composite_rule(&self) -> CompositeRule {
        CompositeRule {
            layers: vec![
                Layer::Segments,
                Layer::Entities(EntityKind::Needle, DrawOrder::AscendingY),
                Layer::Entities(EntityKind::Cone, DrawOrder::AscendingY),
            ],
            occlusion: vec![Occlusion {
                hidden: EntityKind::Needle,
                occluder: EntityKind::Cone,
                reach: 0.7,
            }],
        }
    }
}
