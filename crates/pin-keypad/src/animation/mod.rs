//! Host-ticked animation timelines
//!
//! A [`Timeline`] animates one scalar through a finite list of
//! [`Stage`]s, each a (duration, target) pair interpolated from the value
//! at stage start. Nothing here reads a clock: the owner advances time
//! with [`Timeline::tick`]. Dropping a timeline drops its pending stages.
//!
//! ```text
//! play([s0, s1, s2]) ──tick(dt)──→ s0 ──→ s1 ──→ s2 ──→ idle at last target
//! ```

pub mod presets;

pub use presets::{emphasis_pulse, error_zoom_in, shake_sequence};

use std::time::Duration;

/// Interpolation curve applied within each stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Quadratic ease-in-out
    #[default]
    EaseInOut,
}

impl Easing {
    /// Evaluate at normalized time t (0.0-1.0)
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

/// One leg of a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// How long the leg takes
    pub duration: Duration,
    /// Value reached at the end of the leg
    pub target: f32,
}

impl Stage {
    /// Creates a stage
    #[must_use]
    pub const fn new(duration: Duration, target: f32) -> Self {
        Self { duration, target }
    }
}

/// A scalar driven through a sequence of stages
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Value the timeline idles at before anything plays
    rest: f32,
    /// Current value
    value: f32,
    /// Value at the start of the current stage
    from: f32,
    /// Pending stages
    stages: Vec<Stage>,
    /// Index of the stage in progress
    index: usize,
    /// Time spent in the stage in progress
    elapsed: Duration,
    /// Curve used within each stage
    easing: Easing,
}

impl Timeline {
    /// Creates an idle timeline resting at `rest`
    #[must_use]
    pub fn new(rest: f32) -> Self {
        Self {
            rest,
            value: rest,
            from: rest,
            stages: Vec::new(),
            index: 0,
            elapsed: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// Sets the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Starts a new sequence from the current value, replacing any in flight
    pub fn play(&mut self, stages: Vec<Stage>) {
        self.from = self.value;
        self.stages = stages;
        self.index = 0;
        self.elapsed = Duration::ZERO;
    }

    /// Advances time; returns true while stages remain
    pub fn tick(&mut self, dt: Duration) -> bool {
        let mut remaining = dt;

        while let Some(stage) = self.stages.get(self.index).copied() {
            let left = stage.duration.saturating_sub(self.elapsed);
            if remaining < left {
                self.elapsed += remaining;
                let t = self.elapsed.as_secs_f32() / stage.duration.as_secs_f32();
                self.value = self.from + (stage.target - self.from) * self.easing.evaluate(t);
                return true;
            }

            // Stage finished; carry leftover time into the next one
            remaining -= left;
            self.value = stage.target;
            self.from = stage.target;
            self.index += 1;
            self.elapsed = Duration::ZERO;
        }

        self.stages.clear();
        self.index = 0;
        false
    }

    /// Drops pending stages and snaps back to rest
    pub fn cancel(&mut self) {
        self.stages.clear();
        self.index = 0;
        self.elapsed = Duration::ZERO;
        self.value = self.rest;
        self.from = self.rest;
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Returns true while stages remain
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.index < self.stages.len()
    }
}
