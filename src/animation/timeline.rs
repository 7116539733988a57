//! Mapping from frames and wall-clock time to growth distance
//!
//! `GrowthTimeline` is the fixed-rate schedule used for encoded output;
//! `Playback` is the interactive clock the wasm facade drives with `dt`.

use tracing::debug;

use super::easing::{ease, Easing};
use crate::data::AnimationConfig;
use crate::error::{GrowthError, Result};

/// Fixed-rate frame schedule over a growth distance budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthTimeline {
    /// Max structure distance plus the trailing margin
    pub budget: f64,
    pub total_frames: usize,
    pub fps: u32,
}

impl GrowthTimeline {
    pub fn new(max_distance: f64, config: &AnimationConfig) -> Result<Self> {
        if !(max_distance.is_finite() && max_distance >= 0.0) {
            return Err(GrowthError::InvalidGeometry {
                what: "max growth distance",
                value: max_distance,
            });
        }
        if config.fps == 0 || !(config.duration_secs.is_finite() && config.duration_secs > 0.0) {
            return Err(GrowthError::Config(format!(
                "cannot schedule {} fps over {} seconds",
                config.fps, config.duration_secs
            )));
        }

        let total_frames = ((config.fps as f64 * config.duration_secs).round() as usize).max(1);
        let budget = max_distance + config.trailing_margin.max(0.0);

        debug!(total_frames, budget, fps = config.fps, "built growth timeline");
        Ok(Self {
            budget,
            total_frames,
            fps: config.fps,
        })
    }

    /// Growth distance shown on `frame`; frames past the end hold the budget
    pub fn progress_at(&self, frame: usize) -> f64 {
        if self.total_frames <= 1 || frame >= self.total_frames - 1 {
            return self.budget;
        }
        frame as f64 / (self.total_frames - 1) as f64 * self.budget
    }

    pub fn duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps as f64
    }

    /// (frame, progress) pairs in order
    pub fn frames(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.total_frames).map(move |i| (i, self.progress_at(i)))
    }
}

/// Interactive growth clock in distance units
#[derive(Debug, Clone)]
pub struct Playback {
    /// Current growth distance (0.0 = nothing, budget = fully grown)
    pub progress: f64,
    /// Growth distance at completion
    pub budget: f64,
    /// Animation duration in seconds
    pub duration: f64,
    /// Current elapsed time
    pub elapsed: f64,
    /// Whether animation is playing
    pub playing: bool,
    /// Whether animation is complete
    pub complete: bool,
    /// Easing from elapsed fraction to distance fraction
    pub easing: Easing,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            progress: 0.0,
            budget: 0.0,
            duration: 8.0,
            elapsed: 0.0,
            playing: false,
            complete: false,
            easing: Easing::Linear,
        }
    }
}

impl Playback {
    pub fn new(budget: f64, duration: f64) -> Self {
        Self {
            budget: budget.max(0.0),
            duration,
            ..Default::default()
        }
    }

    /// Start the growth animation
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.progress = 0.0;
        self.playing = true;
        self.complete = false;
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.progress = 0.0;
        self.playing = false;
        self.complete = false;
    }

    /// Jump to fully grown state
    pub fn complete_instantly(&mut self) {
        self.progress = self.budget;
        self.elapsed = self.duration;
        self.playing = false;
        self.complete = true;
    }

    /// Advance by `dt` seconds; progress never moves backwards here
    pub fn update(&mut self, dt: f64) {
        if !self.playing || self.complete {
            return;
        }

        self.elapsed += dt.max(0.0);
        let fraction = if self.duration > 0.0 {
            (self.elapsed / self.duration).min(1.0)
        } else {
            1.0
        };
        self.progress = self.progress.max(ease(fraction, self.easing) * self.budget);

        if fraction >= 1.0 {
            self.playing = false;
            self.complete = true;
            self.progress = self.budget;
        }
    }

    /// Jump to a specific growth distance, clamped to the budget
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, self.budget);
        self.elapsed = if self.budget > 0.0 {
            self.progress / self.budget * self.duration
        } else {
            0.0
        };
        self.complete = self.progress >= self.budget;
        self.playing = false;
    }

    /// Get current growth distance
    pub fn get_progress(&self) -> f64 {
        self.progress
    }

    /// Progress as a fraction of the budget (0.0 to 1.0)
    pub fn fraction(&self) -> f64 {
        if self.budget > 0.0 {
            (self.progress / self.budget).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(fps: u32, duration_secs: f64, trailing_margin: f64) -> AnimationConfig {
        AnimationConfig { fps, duration_secs, trailing_margin }
    }

    #[test]
    fn test_timeline_endpoints() {
        let timeline = GrowthTimeline::new(400.0, &config(30, 2.0, 100.0)).unwrap();
        assert_eq!(timeline.total_frames, 60);
        assert_eq!(timeline.budget, 500.0);
        assert_eq!(timeline.progress_at(0), 0.0);
        assert_eq!(timeline.progress_at(59), 500.0);
        assert_eq!(timeline.progress_at(1000), 500.0);
    }

    #[test]
    fn test_timeline_is_linear() {
        let timeline = GrowthTimeline::new(90.0, &config(10, 1.1, 10.0)).unwrap();
        assert_eq!(timeline.total_frames, 11);
        for (frame, progress) in timeline.frames() {
            assert!((progress - frame as f64 * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_frame_shows_everything() {
        let timeline = GrowthTimeline::new(50.0, &config(1, 0.2, 5.0)).unwrap();
        assert_eq!(timeline.total_frames, 1);
        assert_eq!(timeline.progress_at(0), 55.0);
    }

    #[test]
    fn test_timeline_rejects_bad_input() {
        assert!(GrowthTimeline::new(f64::NAN, &config(30, 1.0, 0.0)).is_err());
        assert!(GrowthTimeline::new(10.0, &config(0, 1.0, 0.0)).is_err());
        assert!(GrowthTimeline::new(10.0, &config(30, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_duration_matches_config() {
        let timeline = GrowthTimeline::new(10.0, &config(24, 2.0, 0.0)).unwrap();
        assert_eq!(timeline.total_frames, 48);
        assert!((timeline.duration_secs() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_start() {
        let mut playback = Playback::new(100.0, 5.0);
        playback.start();

        assert!(playback.is_playing());
        assert!(!playback.is_complete());
        assert_eq!(playback.get_progress(), 0.0);
    }

    #[test]
    fn test_playback_progress() {
        let mut playback = Playback::new(200.0, 1.0);
        playback.start();

        playback.update(0.5);
        assert!((playback.get_progress() - 100.0).abs() < 1e-9);
        assert!((playback.fraction() - 0.5).abs() < 1e-9);
        assert!(playback.is_playing());
    }

    #[test]
    fn test_playback_never_rewinds() {
        let mut playback = Playback::new(200.0, 1.0);
        playback.start();
        playback.update(0.4);
        let before = playback.get_progress();
        playback.update(-1.0);
        assert_eq!(playback.get_progress(), before);
    }

    #[test]
    fn test_playback_completion() {
        let mut playback = Playback::new(200.0, 1.0);
        playback.start();
        playback.update(1.5);

        assert!(playback.is_complete());
        assert!(!playback.is_playing());
        assert_eq!(playback.get_progress(), 200.0);
    }

    #[test]
    fn test_reset_and_set_progress() {
        let mut playback = Playback::new(100.0, 2.0);
        playback.start();
        playback.update(1.0);
        playback.reset();

        assert!(!playback.is_playing());
        assert_eq!(playback.get_progress(), 0.0);

        playback.set_progress(75.0);
        assert_eq!(playback.get_progress(), 75.0);
        assert!((playback.elapsed - 1.5).abs() < 1e-9);
        assert!(!playback.is_complete());

        playback.set_progress(500.0);
        assert!(playback.is_complete());
        assert_eq!(playback.get_progress(), 100.0);
    }
}
