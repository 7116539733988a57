use tracing::debug;

use super::structure::Branch;
use crate::error::{GrowthError, Result};
use crate::math::{Bounds, Point};

/// Uniform scale plus translation from plant space to canvas space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub scale: f64,
    pub offset: Point,
}

impl Fit {
    pub const IDENTITY: Fit = Fit {
        scale: 1.0,
        offset: Point::ZERO,
    };

    pub fn apply(&self, p: Point) -> Point {
        p.scale(self.scale) + self.offset
    }

    pub fn apply_length(&self, length: f64) -> f64 {
        length * self.scale
    }
}

/// Extent of one branch's curve points and entity circles, children excluded
fn branch_bounds(branch: &Branch) -> Bounds {
    let mut bounds = Bounds::empty();
    bounds.include_point(branch.start);
    bounds.include_point(branch.end);
    bounds.include_point(branch.control);
    for entity in &branch.entities {
        bounds.include_circle(entity.center, entity.radius);
    }
    bounds
}

/// Extent of every branch point and every entity circle in the subtree
pub fn compute_bounds(root: &Branch) -> Bounds {
    root.iter_preorder()
        .map(branch_bounds)
        .fold(Bounds::empty(), |acc, bounds| acc.merge(&bounds))
}

/// Scale and offset that fit `bounds` inside the canvas minus padding,
/// centered horizontally with the lowest point resting on the bottom padding
pub fn compute_fit(bounds: &Bounds, width: f64, height: f64, padding: f64) -> Result<Fit> {
    let bounds_width = bounds.width();
    let bounds_height = bounds.height();
    if !(bounds_width > 0.0 && bounds_height > 0.0)
        || !bounds_width.is_finite()
        || !bounds_height.is_finite()
    {
        return Err(GrowthError::DegenerateBounds {
            width: bounds_width,
            height: bounds_height,
        });
    }

    let available_width = width - 2.0 * padding;
    let available_height = height - 2.0 * padding;
    if !(available_width > 0.0 && available_height > 0.0) {
        return Err(GrowthError::Config(format!(
            "canvas {}x{} leaves no room inside padding {}",
            width, height, padding
        )));
    }

    let scale = (available_width / bounds_width).min(available_height / bounds_height);
    let offset = Point::new(
        (width - bounds_width * scale) / 2.0 - bounds.min_x * scale,
        (height - padding) - bounds.max_y * scale,
    );

    debug!(scale, offset_x = offset.x, offset_y = offset.y, "computed canvas fit");
    Ok(Fit { scale, offset })
}

/// Total growth distance needed to reveal every branch and entity
pub fn compute_max_distance(root: &Branch) -> f64 {
    root.iter_preorder().fold(0.0_f64, |max, branch| {
        let entities = branch
            .entities
            .iter()
            .map(|e| e.dist_from_root)
            .fold(f64::NEG_INFINITY, f64::max);
        max.max(branch.end_distance()).max(entities)
    })
}
