use serde::{Deserialize, Serialize};
use crate::math::{Color, Point, QuadBezier};

/// What a decorative cluster depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Needle,
    Cone,
    Leaf,
    Fruit,
    Petal,
    Seed,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Needle,
        EntityKind::Cone,
        EntityKind::Leaf,
        EntityKind::Fruit,
        EntityKind::Petal,
        EntityKind::Seed,
    ];

    /// Stable numeric tag for packed buffers
    pub fn tag(&self) -> u8 {
        match self {
            EntityKind::Needle => 0,
            EntityKind::Cone => 1,
            EntityKind::Leaf => 2,
            EntityKind::Fruit => 3,
            EntityKind::Petal => 4,
            EntityKind::Seed => 5,
        }
    }
}

/// A decorative cluster attached to a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    pub highlight: Color,
    pub kind: EntityKind,
    /// Growth distance at which the entity starts to appear
    pub dist_from_root: f64,
}

/// A curved segment of the plant, owning its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
    pub control: Point,
    pub width: f64,
    /// Straight start to end distance, the arc-length denominator
    pub length: f64,
    /// Sum of ancestor lengths
    pub dist_from_root: f64,
    /// Remaining depth (or segment count) when this branch was grown
    pub depth: u32,
    pub children: Vec<Branch>,
    pub entities: Vec<Entity>,
}

impl Branch {
    pub fn curve(&self) -> QuadBezier {
        QuadBezier::new(self.start, self.control, self.end)
    }

    /// Growth distance at which this branch is fully drawn
    pub fn end_distance(&self) -> f64 {
        self.dist_from_root + self.length
    }

    /// Get all branches in pre-order (self first, then children)
    pub fn iter_preorder(&self) -> impl Iterator<Item = &Branch> {
        PreorderBranchIter { stack: vec![self] }
    }

    /// Total number of branches in subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(|c| c.count()).sum::<usize>()
    }

    /// Total number of entities in subtree
    pub fn entity_count(&self) -> usize {
        self.iter_preorder().map(|b| b.entities.len()).sum()
    }

    /// Longest root-to-tip chain, counting this branch
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(|c| c.height()).max().unwrap_or(0)
    }
}

struct PreorderBranchIter<'a> {
    stack: Vec<&'a Branch>,
}

impl<'a> Iterator for PreorderBranchIter<'a> {
    type Item = &'a Branch;

    fn next(&mut self) -> Option<Self::Item> {
        let branch = self.stack.pop()?;
        for child in branch.children.iter().rev() {
            self.stack.push(child);
        }
        Some(branch)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn leaf_at(x: f64, y: f64, dist: f64) -> Entity {
        Entity {
            center: Point::new(x, y),
            radius: 4.0,
            color: Color::rgb(40, 120, 40),
            highlight: Color::rgb(90, 170, 90),
            kind: EntityKind::Leaf,
            dist_from_root: dist,
        }
    }

    /// Trunk of length 10 with two straight children of length 5
    pub(crate) fn create_test_tree() -> Branch {
        let child = |end_x: f64, entities: Vec<Entity>| Branch {
            start: Point::new(0.0, -10.0),
            end: Point::new(end_x, -14.0),
            control: Point::new(end_x / 2.0, -12.0),
            width: 2.0,
            length: Point::new(0.0, -10.0).distance(&Point::new(end_x, -14.0)),
            dist_from_root: 10.0,
            depth: 0,
            children: vec![],
            entities,
        };

        Branch {
            start: Point::ZERO,
            end: Point::new(0.0, -10.0),
            control: Point::new(0.0, -5.0),
            width: 4.0,
            length: 10.0,
            dist_from_root: 0.0,
            depth: 1,
            children: vec![
                child(3.0, vec![leaf_at(3.0, -14.0, 15.0)]),
                child(-3.0, vec![leaf_at(-3.0, -14.0, 14.0), leaf_at(-1.5, -12.0, 12.5)]),
            ],
            entities: vec![],
        }
    }

    #[test]
    fn test_count_and_height() {
        let tree = create_test_tree();
        assert_eq!(tree.count(), 3);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.entity_count(), 3);
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = create_test_tree();
        let xs: Vec<_> = tree.iter_preorder().map(|b| b.end.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, -3.0]);
    }

    #[test]
    fn test_end_distance() {
        let tree = create_test_tree();
        assert_eq!(tree.end_distance(), 10.0);
        assert_eq!(tree.children[0].end_distance(), 15.0);
    }

    #[test]
    fn test_kind_tags_are_unique() {
        let mut tags: Vec<u8> = EntityKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), EntityKind::ALL.len());
    }
}
