#![forbid(unsafe_code)]

//! Deterministic scroll-velocity normalization.
//!
//! The core never reads a clock: the host reports each scroll sample
//! together with the number of already-elapsed ticks since the previous
//! one. [`VelocityTracker`] turns those samples into the normalized
//! `[0, 1]` velocity and direction the overscan controller consumes, with
//! exponential decay between samples so a finished fling eases the
//! overscan budget back down instead of snapping.

use crate::overscan::ScrollDirection;
use crate::virtualizer::ScrollMotion;

/// Velocity decay applied per elapsed tick after a sample.
const FRICTION: f64 = 0.95;

/// Tracks scroll velocity across host-supplied samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    /// Offset delta per tick treated as full (1.0) velocity.
    reference_speed: f64,
    last_offset: Option<f64>,
    velocity: f64,
    direction: ScrollDirection,
}

impl VelocityTracker {
    /// Create a tracker.
    ///
    /// `reference_speed` is the per-tick offset delta (in pixels) mapped to
    /// full velocity; non-finite or non-positive values fall back to 1.
    #[must_use]
    pub fn new(reference_speed: f64) -> Self {
        let reference_speed = if reference_speed.is_finite() && reference_speed > 0.0 {
            reference_speed
        } else {
            1.0
        };
        Self {
            reference_speed,
            last_offset: None,
            velocity: 0.0,
            direction: ScrollDirection::Still,
        }
    }

    /// Record a scroll sample and return the motion for this tick.
    ///
    /// `elapsed_ticks` is the host-measured tick count since the previous
    /// sample; values below 1 are floored to 1 so a burst of same-tick
    /// events cannot divide by zero.
    pub fn sample(&mut self, offset: f64, elapsed_ticks: f64) -> ScrollMotion {
        let offset = if offset.is_finite() { offset } else { 0.0 };
        let elapsed = if elapsed_ticks.is_finite() {
            elapsed_ticks.max(1.0)
        } else {
            1.0
        };

        let delta = match self.last_offset {
            Some(last) => offset - last,
            None => 0.0,
        };
        self.last_offset = Some(offset);

        // Decay the carried velocity for the ticks that passed, then blend
        // in the fresh sample. max keeps a fast fling from being masked by
        // its own decayed history.
        let decayed = self.velocity * FRICTION.powf(elapsed);
        let fresh = (delta.abs() / (self.reference_speed * elapsed)).clamp(0.0, 1.0);
        self.velocity = decayed.max(fresh);

        self.direction = if delta == 0.0 {
            // Preserve the previous direction while coasting; overscan
            // should stay biased toward where the fling was headed.
            if self.velocity > 0.0 {
                self.direction
            } else {
                ScrollDirection::Still
            }
        } else {
            ScrollDirection::from_delta(delta)
        };

        self.motion()
    }

    /// The motion as of the last sample.
    #[must_use]
    pub fn motion(&self) -> ScrollMotion {
        ScrollMotion {
            velocity: self.velocity,
            direction: self.direction,
        }
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.last_offset = None;
        self.velocity = 0.0;
        self.direction = ScrollDirection::Still;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_is_still() {
        let mut tracker = VelocityTracker::new(100.0);
        let motion = tracker.sample(500.0, 1.0);
        assert_eq!(motion.velocity, 0.0);
        assert_eq!(motion.direction, ScrollDirection::Still);
    }

    #[test]
    fn fast_forward_scroll_saturates() {
        let mut tracker = VelocityTracker::new(100.0);
        tracker.sample(0.0, 1.0);
        let motion = tracker.sample(500.0, 1.0);
        assert_eq!(motion.velocity, 1.0);
        assert_eq!(motion.direction, ScrollDirection::Forward);
    }

    #[test]
    fn backward_scroll_reports_backward() {
        let mut tracker = VelocityTracker::new(100.0);
        tracker.sample(1000.0, 1.0);
        let motion = tracker.sample(950.0, 1.0);
        assert_eq!(motion.direction, ScrollDirection::Backward);
        assert_eq!(motion.velocity, 0.5);
    }

    #[test]
    fn velocity_decays_while_coasting() {
        let mut tracker = VelocityTracker::new(100.0);
        tracker.sample(0.0, 1.0);
        tracker.sample(200.0, 1.0);
        let coasting = tracker.sample(200.0, 10.0);
        assert!(coasting.velocity < 1.0);
        assert!(coasting.velocity > 0.0);
        // Direction persists while velocity remains.
        assert_eq!(coasting.direction, ScrollDirection::Forward);
    }

    #[test]
    fn reset_clears_history() {
        let mut tracker = VelocityTracker::new(100.0);
        tracker.sample(0.0, 1.0);
        tracker.sample(500.0, 1.0);
        tracker.reset();
        assert_eq!(tracker.motion(), ScrollMotion::still());
    }

    #[test]
    fn degenerate_reference_speed_falls_back() {
        let mut tracker = VelocityTracker::new(0.0);
        tracker.sample(0.0, 1.0);
        let motion = tracker.sample(3.0, 1.0);
        assert_eq!(motion.velocity, 1.0);
    }
}
