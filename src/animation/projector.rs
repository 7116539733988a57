//! Growth flattening
//!
//! Turns the immutable branch tree plus a growth distance into the visible
//! curve segments and faded clusters, already placed in canvas space.
//! Nothing here mutates the tree; every call builds fresh output.

use serde::{Deserialize, Serialize};

use super::easing::{ease, Easing};
use crate::archetype::{Archetype, StrokePolicy};
use crate::growth::{Branch, Entity, EntityKind, Fit};
use crate::math::{Color, Point};

/// Clusters fainter than this are dropped instead of drawn
pub const OPACITY_FLOOR: f64 = 0.01;

/// Visible part of a branch in canvas space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub control: Point,
    pub end: Point,
    pub width: f64,
    pub color: Color,
    /// Fraction of the branch drawn (0.0 to 1.0)
    pub local_t: f64,
    pub depth: u32,
}

/// A cluster placed in canvas space with its current opacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedEntity {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    pub highlight: Color,
    pub kind: EntityKind,
    pub opacity: f64,
    pub dist_from_root: f64,
}

/// Everything visible at one growth distance, in pre-order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flattened {
    pub segments: Vec<Segment>,
    pub entities: Vec<PlacedEntity>,
}

impl Flattened {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.entities.is_empty()
    }
}

/// Projects a branch tree at a given growth distance
pub struct GrowthProjector<'a> {
    archetype: &'a dyn Archetype,
    fit: Fit,
}

impl<'a> GrowthProjector<'a> {
    pub fn new(archetype: &'a dyn Archetype, fit: Fit) -> Self {
        Self { archetype, fit }
    }

    /// Fraction of `branch` revealed at `progress`, clamped to [0, 1]
    pub fn local_t(branch: &Branch, progress: f64) -> f64 {
        let grown = progress - branch.dist_from_root;
        if branch.length > 0.0 {
            (grown / branch.length).clamp(0.0, 1.0)
        } else if grown > 0.0 {
            1.0
        } else {
            0.0
        }
    }

    /// Smoothstep opacity of `entity` at `progress`; zero before its reveal
    pub fn opacity(&self, entity: &Entity, progress: f64) -> f64 {
        if progress <= entity.dist_from_root {
            return 0.0;
        }
        let age = progress - entity.dist_from_root;
        let fade = self.archetype.fade_speed(entity.kind);
        let fraction = if fade > 0.0 { (age / fade).clamp(0.0, 1.0) } else { 1.0 };
        ease(fraction, Easing::Smoothstep)
    }

    /// Visible geometry of the whole tree at `progress`
    pub fn flatten(&self, root: &Branch, progress: f64) -> Flattened {
        let mut out = Flattened::default();
        self.visit(root, progress, &mut out);
        out
    }

    fn visit(&self, branch: &Branch, progress: f64, out: &mut Flattened) {
        let local_t = Self::local_t(branch, progress);

        if local_t > 0.0 {
            out.segments.push(self.segment(branch, local_t));

            for entity in &branch.entities {
                let opacity = self.opacity(entity, progress);
                if opacity < OPACITY_FLOOR {
                    continue;
                }
                out.entities.push(PlacedEntity {
                    center: self.fit.apply(entity.center),
                    radius: self.fit.apply_length(entity.radius),
                    color: entity.color,
                    highlight: entity.highlight,
                    kind: entity.kind,
                    opacity,
                    dist_from_root: entity.dist_from_root,
                });
            }
        }

        // children are visited even when this branch is still hidden
        for child in &branch.children {
            self.visit(child, progress, out);
        }
    }

    fn segment(&self, branch: &Branch, local_t: f64) -> Segment {
        let curve = branch
            .curve()
            .truncate(local_t)
            .transform(self.fit.scale, self.fit.offset);
        let policy: StrokePolicy = self.archetype.stroke_policy();

        Segment {
            start: curve.start,
            control: curve.control,
            end: curve.end,
            width: self.fit.apply_length(branch.width) * policy.width_factor(local_t),
            color: self.archetype.stroke_color(branch.depth),
            local_t,
            depth: branch.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{Orchard, Pine, Sunflower};
    use crate::growth::structure::tests::create_test_tree;
    use crate::growth::{compute_max_distance, StructureGenerator};

    #[test]
    fn test_nothing_visible_at_zero() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let projector = GrowthProjector::new(&orchard, Fit::IDENTITY);
        let flat = projector.flatten(&create_test_tree(), 0.0);
        assert!(flat.is_empty());
    }

    #[test]
    fn test_partial_trunk() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let projector = GrowthProjector::new(&orchard, Fit::IDENTITY);
        let tree = create_test_tree();
        let flat = projector.flatten(&tree, 5.0);

        assert_eq!(flat.segments.len(), 1);
        let seg = &flat.segments[0];
        assert_eq!(seg.local_t, 0.5);
        assert!(seg.end.distance(&tree.curve().evaluate(0.5)) < 1e-9);
        assert!(flat.entities.is_empty());
    }

    #[test]
    fn test_local_t_monotonic_and_saturates() {
        let tree = create_test_tree();
        let child = &tree.children[0];
        let mut prev = 0.0;
        for i in 0..=200 {
            let p = i as f64 * 0.1;
            let t = GrowthProjector::local_t(child, p);
            assert!(t >= prev);
            if prev == 1.0 {
                assert_eq!(t, 1.0);
            }
            prev = t;
        }
        assert_eq!(GrowthProjector::local_t(child, 15.0), 1.0);
        assert_eq!(GrowthProjector::local_t(child, 10.0), 0.0);
    }

    #[test]
    fn test_zero_length_branch_local_t() {
        let mut tree = create_test_tree();
        tree.length = 0.0;
        assert_eq!(GrowthProjector::local_t(&tree, 0.0), 0.0);
        assert_eq!(GrowthProjector::local_t(&tree, 0.1), 1.0);
    }

    #[test]
    fn test_opacity_monotonic_then_full() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let projector = GrowthProjector::new(&orchard, Fit::IDENTITY);
        let tree = create_test_tree();
        let leaf = &tree.children[0].entities[0];
        let fade = orchard.fade_speed(EntityKind::Leaf);

        assert_eq!(projector.opacity(leaf, leaf.dist_from_root), 0.0);
        let mut prev = 0.0;
        for i in 0..=100 {
            let p = leaf.dist_from_root + fade * i as f64 / 100.0;
            let o = projector.opacity(leaf, p);
            assert!(o >= prev);
            prev = o;
        }
        assert_eq!(projector.opacity(leaf, leaf.dist_from_root + fade), 1.0);
        assert_eq!(projector.opacity(leaf, leaf.dist_from_root + fade * 3.0), 1.0);
    }

    #[test]
    fn test_faint_entities_dropped() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let projector = GrowthProjector::new(&orchard, Fit::IDENTITY);
        let tree = create_test_tree();

        // 0.05 past the 15.0 leaf is far below the opacity floor
        let flat = projector.flatten(&tree, 15.05);
        assert!(flat.entities.iter().all(|e| e.dist_from_root < 15.0));
        assert!(flat.entities.iter().all(|e| e.opacity >= OPACITY_FLOOR));
    }

    #[test]
    fn test_fit_applied_to_output() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let fit = Fit { scale: 2.0, offset: Point::new(100.0, 50.0) };
        let projector = GrowthProjector::new(&orchard, fit);
        let tree = create_test_tree();
        let flat = projector.flatten(&tree, 100.0);

        assert_eq!(flat.segments[0].start, Point::new(100.0, 50.0));
        assert_eq!(flat.segments[0].end, Point::new(100.0, 30.0));
        assert_eq!(flat.segments[0].width, 8.0);

        let original = &tree.children[0].entities[0];
        let placed = flat.entities.iter().find(|e| e.dist_from_root == 15.0).unwrap();
        assert_eq!(placed.center, fit.apply(original.center));
        assert_eq!(placed.radius, original.radius * 2.0);
        // the source tree keeps its plant-space values
        assert_eq!(tree.children[0].entities[0].center, Point::new(3.0, -14.0));
    }

    #[test]
    fn test_taper_policy_narrows_partial_strokes() {
        let pine = Pine::new(180.0, -90.0, 4);
        let projector = GrowthProjector::new(&pine, Fit::IDENTITY);
        let tree = create_test_tree();

        let early = projector.flatten(&tree, 2.0).segments[0].width;
        let late = projector.flatten(&tree, 10.0).segments[0].width;
        assert!(early < late);
        assert_eq!(late, tree.width);
    }

    #[test]
    fn test_hidden_parent_still_visits_children() {
        let orchard = Orchard::new(150.0, -90.0, 4);
        let projector = GrowthProjector::new(&orchard, Fit::IDENTITY);
        let mut tree = create_test_tree();
        // push the trunk's reveal past its children
        tree.dist_from_root = 50.0;

        let flat = projector.flatten(&tree, 12.0);
        assert_eq!(flat.segments.len(), 2);
        assert!(flat.segments.iter().all(|s| s.depth == 0));
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let pine = Pine::new(180.0, -90.0, 6);
        let tree = StructureGenerator::new(&pine).generate("idem").unwrap();
        let before = tree.clone();
        let fit = Fit { scale: 0.7, offset: Point::new(300.0, 500.0) };
        let projector = GrowthProjector::new(&pine, fit);
        let p = compute_max_distance(&tree) * 0.6;

        let a = projector.flatten(&tree, p);
        let b = projector.flatten(&tree, p);
        assert_eq!(a, b);
        assert_eq!(tree, before);
    }

    #[test]
    fn test_pine_scenario() {
        let pine = Pine::new(180.0, -90.0, 8);
        let tree = StructureGenerator::new(&pine).generate("test-seed-1").unwrap();
        let projector = GrowthProjector::new(&pine, Fit::IDENTITY);

        assert_eq!(tree.dist_from_root, 0.0);
        let max = compute_max_distance(&tree);
        assert!(max.is_finite() && max > 0.0);

        assert!(projector.flatten(&tree, 0.0).segments.is_empty());

        let done = projector.flatten(&tree, max + 120.0);
        assert_eq!(done.segments.len(), tree.count());
        assert!(done.segments.iter().all(|s| s.local_t == 1.0));
        assert_eq!(done.entities.len(), tree.entity_count());
        assert!(done.entities.iter().all(|e| e.opacity == 1.0));
    }

    #[test]
    fn test_seed_spiral_reveals_in_order() {
        let flower = Sunflower::new(55.0, -90.0, 4, 10, 60);
        let tree = StructureGenerator::new(&flower).generate("order").unwrap();
        let projector = GrowthProjector::new(&flower, Fit::IDENTITY);
        let head = tree.iter_preorder().find(|b| b.depth == 0).unwrap();
        let first_seed = head.entities.iter().find(|e| e.kind == EntityKind::Seed).unwrap();

        let p = first_seed.dist_from_root + 5.0;
        let seeds: Vec<_> = projector
            .flatten(&tree, p)
            .entities
            .into_iter()
            .filter(|e| e.kind == EntityKind::Seed)
            .collect();

        assert!(!seeds.is_empty() && seeds.len() < 60);
        for pair in seeds.windows(2) {
            assert!(pair[0].opacity >= pair[1].opacity, "earlier seeds are more opaque");
        }
    }
}
