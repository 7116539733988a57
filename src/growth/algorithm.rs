use tracing::debug;

use super::random::SeededRandom;
use super::structure::Branch;
use crate::archetype::Archetype;
use crate::error::{GrowthError, Result};
use crate::math::Point;

/// Smallest stroke width any archetype may produce
pub const MIN_STROKE_WIDTH: f64 = 0.5;

/// Inputs for growing one branch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthStep {
    pub start: Point,
    pub length: f64,
    /// Heading in degrees, 0 = +x, -90 = up on canvas
    pub heading: f64,
    /// Remaining depth or segment count; 0 grows no children
    pub remaining: u32,
    pub dist_from_root: f64,
}

impl GrowthStep {
    pub fn root(start: Point, length: f64, heading: f64, remaining: u32) -> Self {
        Self {
            start,
            length,
            heading,
            remaining,
            dist_from_root: 0.0,
        }
    }
}

/// Geometry of a branch after jitter and bow have been applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchFrame {
    pub step: GrowthStep,
    /// Jittered heading actually used for the end point
    pub heading: f64,
    pub end: Point,
    pub control: Point,
    /// Straight start to end distance
    pub length: f64,
}

impl BranchFrame {
    /// Point on the branch curve at parameter t
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let a = self.step.start.lerp(&self.control, t);
        let b = self.control.lerp(&self.end, t);
        a.lerp(&b, t)
    }

    /// Unit start to end direction, zero for degenerate branches
    pub fn direction(&self) -> Point {
        (self.end - self.step.start).normalize()
    }

    /// Unit normal (direction rotated 90 degrees)
    pub fn normal(&self) -> Point {
        self.direction().perpendicular()
    }

    /// Growth distance at which the point at parameter t is reached
    pub fn distance_at(&self, t: f64) -> f64 {
        self.step.dist_from_root + self.length * t
    }

    /// Growth distance at the tip
    pub fn end_distance(&self) -> f64 {
        self.step.dist_from_root + self.length
    }

    /// Step for a child starting at this branch's tip
    pub fn child(&self, length: f64, heading: f64, remaining: u32) -> GrowthStep {
        GrowthStep {
            start: self.end,
            length,
            heading,
            remaining,
            dist_from_root: self.end_distance(),
        }
    }
}

/// Recursive branch generator driven by an archetype policy
pub struct StructureGenerator<'a> {
    archetype: &'a dyn Archetype,
}

impl<'a> StructureGenerator<'a> {
    pub fn new(archetype: &'a dyn Archetype) -> Self {
        Self { archetype }
    }

    /// Grow the whole plant from a seed string
    pub fn generate(&self, seed: &str) -> Result<Branch> {
        let step = self.archetype.root_step();
        validate_root(&step)?;

        let mut rng = SeededRandom::new(seed);
        let root = self.grow_branch(&mut rng, step);

        debug!(
            archetype = self.archetype.name(),
            seed,
            branches = root.count(),
            entities = root.entity_count(),
            "generated plant structure"
        );
        Ok(root)
    }

    /// Grow one branch and, while `remaining > 0`, its subtree
    pub fn grow_branch(&self, rng: &mut SeededRandom, step: GrowthStep) -> Branch {
        let archetype = self.archetype;

        let jitter = archetype.heading_jitter(&step);
        let heading = step.heading + rng.next_float(-jitter, jitter);
        let end = step.start + Point::from_heading(heading).scale(step.length);

        let length = step.start.distance(&end);
        let perp = if length > 0.0 {
            (end - step.start).scale(1.0 / length).perpendicular()
        } else {
            Point::ZERO
        };
        let bow = archetype.bow();
        let control = step.start.midpoint(&end) + perp.scale(rng.next_float(-bow, bow) * length);

        let width = archetype
            .stroke_width(rng, &step)
            .max(archetype.min_width())
            .max(MIN_STROKE_WIDTH);

        let frame = BranchFrame {
            step,
            heading,
            end,
            control,
            length,
        };

        let entities = archetype.attach_entities(rng, &frame);

        let children = if step.remaining > 0 {
            archetype
                .branch_out(rng, &frame)
                .into_iter()
                .map(|child| self.grow_branch(rng, child))
                .collect()
        } else {
            Vec::new()
        };

        Branch {
            start: step.start,
            end,
            control,
            width,
            length,
            dist_from_root: step.dist_from_root,
            depth: step.remaining,
            children,
            entities,
        }
    }
}

fn validate_root(step: &GrowthStep) -> Result<()> {
    if !(step.length.is_finite() && step.length > 0.0) {
        return Err(GrowthError::InvalidGeometry {
            what: "initial segment length",
            value: step.length,
        });
    }
    if !step.heading.is_finite() {
        return Err(GrowthError::InvalidGeometry {
            what: "initial heading",
            value: step.heading,
        });
    }
    if !step.start.is_finite() {
        return Err(GrowthError::InvalidGeometry {
            what: "start point",
            value: f64::NAN,
        });
    }
    if step.remaining == 0 {
        return Err(GrowthError::Config(
            "depth or segment count must be at least 1".to_string(),
        ));
    }
    Ok(())
}
