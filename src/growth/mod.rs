//! Plant structure generation
//!
//! Builds the immutable branch tree from a seed and an archetype, and
//! measures it (bounds, canvas fit, total growth distance).

pub mod random;
pub mod structure;
pub mod algorithm;
pub mod fit;

pub use random::SeededRandom;
pub use structure::{Branch, Entity, EntityKind};
pub use algorithm::{BranchFrame, GrowthStep, StructureGenerator};
pub use fit::{compute_bounds, compute_fit, compute_max_distance, Fit};
