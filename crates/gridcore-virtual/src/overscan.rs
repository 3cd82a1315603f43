#![forbid(unsafe_code)]

//! Adaptive overscan: scroll velocity in, render-ahead budget out.
//!
//! Overscan masks pop-in by materializing items beyond the viewport. A
//! stationary grid needs only a small cushion; a fast fling needs a deep
//! one on the side the content is arriving from. Both functions here are
//! pure and total: non-finite inputs coerce to zero instead of poisoning
//! the window math downstream.

use gridcore_core::OverscanConfig;

/// Direction of scroll motion along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    /// Toward lower indices.
    Backward,
    /// No motion.
    #[default]
    Still,
    /// Toward higher indices.
    Forward,
}

impl ScrollDirection {
    /// Classify an offset delta. Non-finite deltas count as still.
    #[must_use]
    pub fn from_delta(delta: f64) -> Self {
        if !delta.is_finite() || delta == 0.0 {
            Self::Still
        } else if delta > 0.0 {
            Self::Forward
        } else {
            Self::Backward
        }
    }
}

/// Lead/trail allocation of one overscan budget.
///
/// `lead + trail == overscan` exactly: `trail` is always computed by
/// subtraction rather than a second multiplication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverscanSplit {
    /// Items materialized before the visible window.
    pub lead: f64,
    /// Items materialized after the visible window.
    pub trail: f64,
}

/// Coerce a possibly hostile float to a finite value, defaulting to 0.
#[inline]
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Ease scroll velocity into an overscan budget between `config.min` and
/// `config.max`.
///
/// `velocity` is taken by magnitude and clamped to `[0, 1]` before the
/// easing curve `1 - (1 - v)^gamma` is applied. Equal bounds (within
/// `f64::EPSILON`) short-circuit to that bound. The result is always within
/// `[min(min, max), max(min, max)]`, including for reversed bounds.
#[must_use]
pub fn compute_overscan(velocity: f64, config: OverscanConfig) -> f64 {
    let min = finite_or_zero(config.min);
    let max = finite_or_zero(config.max);
    if (max - min).abs() <= f64::EPSILON {
        return min;
    }
    let gamma = if config.gamma.is_finite() && config.gamma > 0.0 {
        config.gamma
    } else {
        OverscanConfig::DEFAULT_GAMMA
    };

    let v = finite_or_zero(velocity).abs().clamp(0.0, 1.0);
    let eased = 1.0 - (1.0 - v).powf(gamma);
    let lo = min.min(max);
    let hi = min.max(max);
    (min + (max - min) * eased).clamp(lo, hi)
}

/// Split an overscan budget across the leading and trailing edges.
///
/// The trailing edge of the motion is where fresh content arrives, so it
/// gets 75% of the budget; the opposite edge keeps 25%. No motion splits
/// evenly. Negative or non-finite budgets are treated as zero.
#[must_use]
pub fn split_lead_trail(overscan: f64, direction: ScrollDirection) -> OverscanSplit {
    let overscan = finite_or_zero(overscan).max(0.0);
    let lead = match direction {
        ScrollDirection::Forward => overscan * 0.25,
        ScrollDirection::Backward => overscan * 0.75,
        ScrollDirection::Still => overscan * 0.5,
    };
    OverscanSplit {
        lead,
        trail: overscan - lead,
    }
}

/// Resolve the integer overscan item counts for one tick.
///
/// Budget is eased from velocity, split by direction, then rounded up so a
/// fractional budget still materializes the partially covered item.
#[must_use]
pub fn resolve_overscan_buckets(
    velocity: f64,
    direction: ScrollDirection,
    config: OverscanConfig,
) -> (usize, usize) {
    let split = split_lead_trail(compute_overscan(velocity, config), direction);
    (split.lead.ceil() as usize, split.trail.ceil() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- compute_overscan ---

    #[test]
    fn overscan_at_rest_is_min() {
        let cfg = OverscanConfig::new(2.0, 12.0);
        assert_eq!(compute_overscan(0.0, cfg), 2.0);
    }

    #[test]
    fn overscan_at_full_velocity_is_max() {
        let cfg = OverscanConfig::new(2.0, 12.0);
        let full = compute_overscan(1.0, cfg);
        assert!((full - 12.0).abs() < 1e-9);
    }

    #[test]
    fn overscan_equal_bounds_short_circuit() {
        let cfg = OverscanConfig::new(4.0, 4.0);
        assert_eq!(compute_overscan(0.5, cfg), 4.0);
    }

    #[test]
    fn overscan_velocity_magnitude_and_clamp() {
        let cfg = OverscanConfig::new(2.0, 12.0);
        assert_eq!(compute_overscan(-0.3, cfg), compute_overscan(0.3, cfg));
        assert_eq!(compute_overscan(7.0, cfg), compute_overscan(1.0, cfg));
    }

    #[test]
    fn overscan_non_finite_inputs_coerce() {
        let cfg = OverscanConfig::new(2.0, 12.0);
        assert_eq!(compute_overscan(f64::NAN, cfg), 2.0);
        let bad = OverscanConfig::new(f64::NAN, 12.0);
        let out = compute_overscan(0.5, bad);
        assert!(out.is_finite());
        assert!((0.0..=12.0).contains(&out));
    }

    #[test]
    fn overscan_reversed_bounds_stay_bounded() {
        let cfg = OverscanConfig::new(12.0, 2.0);
        for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let out = compute_overscan(v, cfg);
            assert!((2.0..=12.0).contains(&out), "v={v} out={out}");
        }
    }

    // --- split_lead_trail ---

    #[test]
    fn split_biases_trailing_edge() {
        let fwd = split_lead_trail(8.0, ScrollDirection::Forward);
        assert_eq!(fwd.lead, 2.0);
        assert_eq!(fwd.trail, 6.0);

        let back = split_lead_trail(8.0, ScrollDirection::Backward);
        assert_eq!(back.lead, 6.0);
        assert_eq!(back.trail, 2.0);

        let still = split_lead_trail(8.0, ScrollDirection::Still);
        assert_eq!(still.lead, 4.0);
        assert_eq!(still.trail, 4.0);
    }

    #[test]
    fn split_coerces_degenerate_budget() {
        assert_eq!(
            split_lead_trail(f64::NAN, ScrollDirection::Forward),
            OverscanSplit {
                lead: 0.0,
                trail: 0.0
            }
        );
        assert_eq!(
            split_lead_trail(-3.0, ScrollDirection::Still),
            OverscanSplit {
                lead: 0.0,
                trail: 0.0
            }
        );
    }

    #[test]
    fn direction_from_delta() {
        assert_eq!(ScrollDirection::from_delta(5.0), ScrollDirection::Forward);
        assert_eq!(ScrollDirection::from_delta(-0.5), ScrollDirection::Backward);
        assert_eq!(ScrollDirection::from_delta(0.0), ScrollDirection::Still);
        assert_eq!(ScrollDirection::from_delta(f64::NAN), ScrollDirection::Still);
    }

    #[test]
    fn buckets_round_up_fractions() {
        let cfg = OverscanConfig::new(3.0, 3.0);
        let (lead, trail) = resolve_overscan_buckets(0.0, ScrollDirection::Still, cfg);
        assert_eq!((lead, trail), (2, 2));
    }

    // --- properties ---

    proptest! {
        #[test]
        fn overscan_monotone_and_bounded(
            (a, b) in (0.0f64..1.0, 0.0f64..1.0),
            min in 0.0f64..32.0,
            extra in 0.0f64..32.0,
        ) {
            let cfg = OverscanConfig::new(min, min + extra);
            let (lo, hi) = (a.min(b), a.max(b));
            let at_lo = compute_overscan(lo, cfg);
            let at_hi = compute_overscan(hi, cfg);
            prop_assert!(at_lo <= at_hi + 1e-12);
            prop_assert!(at_lo >= min - 1e-12 && at_hi <= min + extra + 1e-12);
        }

        #[test]
        fn split_sums_exactly(overscan in 0.0f64..128.0, dir in 0i8..3) {
            let direction = match dir {
                0 => ScrollDirection::Backward,
                1 => ScrollDirection::Still,
                _ => ScrollDirection::Forward,
            };
            let split = split_lead_trail(overscan, direction);
            prop_assert_eq!(split.lead + split.trail, overscan);
        }
    }
}
