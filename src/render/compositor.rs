//! Frame composition
//!
//! Orders flattened geometry for painter's-algorithm drawing and drops
//! clusters hidden behind a larger cluster in front of them. The occlusion
//! test is a cheap radius-containment check, not real coverage.

use serde::{Deserialize, Serialize};

use crate::animation::{Flattened, PlacedEntity, Segment};
use crate::growth::EntityKind;

/// Sort key within an entity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawOrder {
    /// Back to front by center y (lower on canvas is nearer)
    AscendingY,
    /// In reveal order
    Distance,
}

/// One draw pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Segments,
    Entities(EntityKind, DrawOrder),
}

/// A cluster of kind `hidden` is dropped when a cluster of kind `occluder`
/// lies in front of it (greater y) with its center within
/// `reach * occluder.radius`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occlusion {
    pub hidden: EntityKind,
    pub occluder: EntityKind,
    pub reach: f64,
}

/// Per-archetype layering and occlusion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeRule {
    pub layers: Vec<Layer>,
    pub occlusion: Vec<Occlusion>,
}

/// Single drawing command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    Stroke(Segment),
    Fill(PlacedEntity),
}

/// Ordered draw commands for one growth distance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub progress: f64,
    pub ops: Vec<DrawOp>,
}

impl Frame {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Stroke(s) => Some(s),
            DrawOp::Fill(_) => None,
        })
    }

    pub fn entities(&self) -> impl Iterator<Item = &PlacedEntity> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Fill(e) => Some(e),
            DrawOp::Stroke(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Whether `entity` sits behind one of `occluders`
pub fn is_occluded(entity: &PlacedEntity, occluders: &[&PlacedEntity], reach: f64) -> bool {
    occluders.iter().any(|front| {
        front.center.y > entity.center.y
            && entity.center.distance(&front.center) < reach * front.radius
    })
}

/// Apply `rule` to a flattened frame
pub fn compose(rule: &CompositeRule, flat: Flattened, progress: f64) -> Frame {
    let Flattened { segments, entities } = flat;

    let hidden: Vec<bool> = {
        let fronts: Vec<(&Occlusion, Vec<&PlacedEntity>)> = rule
            .occlusion
            .iter()
            .map(|o| (o, entities.iter().filter(|e| e.kind == o.occluder).collect()))
            .collect();

        let hidden = entities
            .iter()
            .map(|entity| {
                fronts
                    .iter()
                    .any(|(o, front)| o.hidden == entity.kind && is_occluded(entity, front, o.reach))
            })
            .collect();
        hidden
    };

    let mut visible: Vec<Option<PlacedEntity>> = entities
        .into_iter()
        .zip(hidden)
        .map(|(entity, hidden)| if hidden { None } else { Some(entity) })
        .collect();

    let mut ops = Vec::with_capacity(segments.len() + visible.len());
    let mut segments = Some(segments);

    for layer in &rule.layers {
        match *layer {
            Layer::Segments => {
                if let Some(segments) = segments.take() {
                    ops.extend(segments.into_iter().map(DrawOp::Stroke));
                }
            }
            Layer::Entities(kind, order) => {
                let mut group: Vec<PlacedEntity> = visible
                    .iter_mut()
                    .filter(|slot| matches!(slot, Some(e) if e.kind == kind))
                    .filter_map(Option::take)
                    .collect();
                sort_group(&mut group, order);
                ops.extend(group.into_iter().map(DrawOp::Fill));
            }
        }
    }

    // anything the rule did not place is drawn last, in emission order
    if let Some(segments) = segments {
        ops.extend(segments.into_iter().map(DrawOp::Stroke));
    }
    ops.extend(visible.into_iter().flatten().map(DrawOp::Fill));

    Frame { progress, ops }
}

fn sort_group(group: &mut [PlacedEntity], order: DrawOrder) {
    match order {
        DrawOrder::AscendingY => group.sort_by(|a, b| a.center.y.total_cmp(&b.center.y)),
        DrawOrder::Distance => {
            group.sort_by(|a, b| a.dist_from_root.total_cmp(&b.dist_from_root))
        }
    }
}
