use serde::{Deserialize, Serialize};
use crate::error::{GrowthError, Result};
use crate::math::Color;

/// Complete input for one growth animation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub seed: String,
    pub canvas: CanvasConfig,
    pub plant: PlantConfig,
    pub animation: AnimationConfig,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            seed: "seed".to_string(),
            canvas: CanvasConfig::default(),
            plant: PlantConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u16,
    pub height: u16,
    pub padding: f64,
    pub background: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
            padding: 60.0,
            background: Color::rgb(12, 14, 20),
        }
    }
}

/// Archetype selection with its recursion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "archetype", rename_all = "lowercase")]
pub enum PlantConfig {
    Pine {
        #[serde(default = "pine_length")]
        length: f64,
        #[serde(default = "upward")]
        heading: f64,
        #[serde(default = "pine_depth")]
        depth: u32,
    },
    Orchard {
        #[serde(default = "orchard_length")]
        length: f64,
        #[serde(default = "upward")]
        heading: f64,
        #[serde(default = "orchard_depth")]
        depth: u32,
    },
    Sunflower {
        #[serde(default = "stalk_length")]
        segment_length: f64,
        #[serde(default = "upward")]
        heading: f64,
        #[serde(default = "stalk_segments")]
        segments: u32,
        #[serde(default = "petal_count")]
        petal_count: usize,
        #[serde(default = "seed_count")]
        seed_count: usize,
    },
}

fn pine_length() -> f64 { 180.0 }
fn pine_depth() -> u32 { 8 }
fn orchard_length() -> f64 { 150.0 }
fn orchard_depth() -> u32 { 7 }
fn stalk_length() -> f64 { 55.0 }
fn stalk_segments() -> u32 { 9 }
fn petal_count() -> usize { 24 }
fn seed_count() -> usize { 160 }
fn upward() -> f64 { -90.0 }

impl Default for PlantConfig {
    fn default() -> Self {
        PlantConfig::Pine {
            length: pine_length(),
            heading: upward(),
            depth: pine_depth(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub fps: u32,
    pub duration_secs: f64,
    /// Extra growth distance after everything is revealed, so the last
    /// clusters finish fading in
    pub trailing_margin: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            duration_secs: 8.0,
            trailing_margin: 120.0,
        }
    }
}

impl GrowthConfig {
    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GrowthConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would lead to empty, NaN or infinite output
    pub fn validate(&self) -> Result<()> {
        let canvas = &self.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(GrowthError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if !(canvas.padding.is_finite() && canvas.padding >= 0.0) {
            return Err(GrowthError::Config(format!("invalid padding {}", canvas.padding)));
        }
        if 2.0 * canvas.padding >= canvas.width.min(canvas.height) as f64 {
            return Err(GrowthError::Config(format!(
                "padding {} leaves no room on a {}x{} canvas",
                canvas.padding, canvas.width, canvas.height
            )));
        }

        let (length, heading, count) = match self.plant {
            PlantConfig::Pine { length, heading, depth } => (length, heading, depth),
            PlantConfig::Orchard { length, heading, depth } => (length, heading, depth),
            PlantConfig::Sunflower { segment_length, heading, segments, .. } => {
                (segment_length, heading, segments)
            }
        };
        if !(length.is_finite() && length > 0.0) {
            return Err(GrowthError::InvalidGeometry {
                what: "initial segment length",
                value: length,
            });
        }
        if !heading.is_finite() {
            return Err(GrowthError::InvalidGeometry {
                what: "initial heading",
                value: heading,
            });
        }
        if count == 0 {
            return Err(GrowthError::Config(
                "depth or segment count must be at least 1".to_string(),
            ));
        }

        let animation = &self.animation;
        if animation.fps == 0 {
            return Err(GrowthError::Config("fps must be at least 1".to_string()));
        }
        if !(animation.duration_secs.is_finite() && animation.duration_secs > 0.0) {
            return Err(GrowthError::Config(format!(
                "invalid duration {}",
                animation.duration_secs
            )));
        }
        if !(animation.trailing_margin.is_finite() && animation.trailing_margin >= 0.0) {
            return Err(GrowthError::Config(format!(
                "invalid trailing margin {}",
                animation.trailing_margin
            )));
        }

        Ok(())
    }
}
