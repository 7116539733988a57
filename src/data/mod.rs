pub mod config;

pub use config::{AnimationConfig, CanvasConfig, GrowthConfig, PlantConfig};
