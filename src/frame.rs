//! Frame timing.
use bevy_ecs::prelude::*;

use crate::MAX_PHYSICS_STEP;

/// Derives per-frame deltas from a monotonic elapsed time.
///
/// # Examples
/// ```
/// use wayfarer::frame::FrameClock;
/// let mut clock = FrameClock::default();
/// assert_eq!(clock.advance(3.0), 0.0);
/// assert!((clock.advance(3.5) - 0.5).abs() < 1e-6);
/// assert!((clock.physics_delta() - 1.0 / 30.0).abs() < 1e-6);
/// ```
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    last: Option<f32>,
    delta: f32,
    frames: u64,
}

impl FrameClock {
    /// Records the host's elapsed time in seconds and returns the delta.
    ///
    /// The first call yields zero. A clock that runs backwards also yields
    /// zero and keeps the latest time seen.
    pub fn advance(&mut self, elapsed: f32) -> f32 {
        self.delta = match self.last {
            Some(last) if elapsed > last => elapsed - last,
            _ => 0.0,
        };
        self.last = Some(self.last.map_or(elapsed, |last| last.max(elapsed)));
        self.frames += 1;
        self.delta
    }

    /// Delta of the latest frame.
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Delta clamped to the largest stable physics step.
    #[must_use]
    pub fn physics_delta(&self) -> f32 {
        self.delta.min(MAX_PHYSICS_STEP)
    }

    /// Frames advanced so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}
