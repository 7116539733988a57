//! Growth animation
//!
//! Flattens the static plant at a growth distance, fades clusters in with
//! smooth easing, and schedules the distance over frames and time.

mod easing;
mod projector;
mod timeline;

pub use easing::{ease, Easing};
pub use projector::{Flattened, GrowthProjector, PlacedEntity, Segment, OPACITY_FLOOR};
pub use timeline::{GrowthTimeline, Playback};
