//! Easing functions for fades and playback

/// Easing function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Hermite smoothstep, f*f*(3-2f); used for cluster fade-in
    #[default]
    Smoothstep,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f64, easing: Easing) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::Smoothstep => t * t * (3.0 - 2.0 * t),
    }
}
