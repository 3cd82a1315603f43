#![forbid(unsafe_code)]

//! Per-axis visible-window derivation.
//!
//! [`AxisVirtualizer`] turns a scroll offset plus an
//! [`AxisContext`] into a [`VirtualizerState`]: the `[start_index,
//! end_index)` slice the host should materialize. Two regimes exist per
//! tick:
//!
//! - **Disabled** — the full range renders (small datasets, accessibility
//!   fallbacks): `start_index = 0`, `end_index = total_count`, no overscan.
//! - **Enabled** — the visible window is derived from the clamped offset
//!   and widened by velocity-adaptive overscan.
//!
//! `compute_range` is a pure function of its arguments; calling it twice
//! with identical inputs yields structurally equal output.

use gridcore_core::{AxisContext, VirtualizerState};

use crate::overscan::{ScrollDirection, resolve_overscan_buckets};
use crate::scroll_limit::clamp_scroll_offset;

/// Scroll motion observed by the host for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMotion {
    /// Normalized scroll velocity in `[0, 1]`.
    pub velocity: f64,
    /// Direction of travel.
    pub direction: ScrollDirection,
}

impl ScrollMotion {
    /// Motion at rest.
    #[must_use]
    pub const fn still() -> Self {
        Self {
            velocity: 0.0,
            direction: ScrollDirection::Still,
        }
    }
}

/// Strategy for clamping a raw scroll offset before window derivation.
///
/// The default clamps against the strict content-driven limit; hosts with
/// padding or native-limit reconciliation inject their own (backed by
/// [`crate::scroll_limit`]).
pub trait ScrollClamp {
    /// Clamp `offset` for the given context.
    fn clamp_scroll(&self, offset: f64, ctx: &AxisContext) -> f64;
}

/// Default clamp: `[0, max(0, content_size - viewport_size)]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentLimitClamp;

impl ScrollClamp for ContentLimitClamp {
    fn clamp_scroll(&self, offset: f64, ctx: &AxisContext) -> f64 {
        let viewport = if ctx.viewport_size.is_finite() {
            ctx.viewport_size.max(0.0)
        } else {
            0.0
        };
        clamp_scroll_offset(offset, (ctx.content_size() - viewport).max(0.0))
    }
}

/// Derives the materialized index window for one axis.
#[derive(Debug, Clone, Default)]
pub struct AxisVirtualizer<C: ScrollClamp = ContentLimitClamp> {
    clamp: C,
}

impl AxisVirtualizer<ContentLimitClamp> {
    /// Virtualizer with the default content-limit clamp.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clamp: ContentLimitClamp,
        }
    }
}

impl<C: ScrollClamp> AxisVirtualizer<C> {
    /// Virtualizer with a host-supplied clamp strategy.
    #[must_use]
    pub const fn with_clamp(clamp: C) -> Self {
        Self { clamp }
    }

    /// Compute the index window for one tick.
    #[must_use]
    pub fn compute_range(
        &self,
        offset: f64,
        motion: ScrollMotion,
        ctx: &AxisContext,
    ) -> VirtualizerState {
        if ctx.total_count == 0 {
            return VirtualizerState::empty();
        }
        let clamped = self.clamp.clamp_scroll(offset, ctx);

        if !ctx.virtualization_enabled {
            return VirtualizerState {
                start_index: 0,
                end_index: ctx.total_count,
                visible_count: ctx.total_count,
                pool_size: ctx.total_count,
                overscan_leading: 0,
                overscan_trailing: 0,
                offset: clamped,
            };
        }

        let item = ctx.item_size();
        let visible_count =
            ((ctx.viewport_size.max(0.0) / item).floor() as usize).clamp(1, ctx.total_count);

        let first = ((clamped / item).floor() as usize).min(ctx.total_count - 1);
        let visible_end = (first + visible_count).min(ctx.total_count);

        let (lead, trail) = resolve_overscan_buckets(motion.velocity, motion.direction, ctx.overscan);
        let start_index = first.saturating_sub(lead);
        let end_index = (visible_end + trail).min(ctx.total_count);

        let state = VirtualizerState {
            start_index,
            end_index,
            visible_count,
            pool_size: end_index - start_index,
            overscan_leading: first - start_index,
            overscan_trailing: end_index - visible_end,
            offset: clamped,
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            axis = ?ctx.axis,
            start = state.start_index,
            end = state.end_index,
            lead = state.overscan_leading,
            trail = state.overscan_trailing,
            offset = state.offset,
            "axis window computed"
        );

        state
    }

    /// Left/top offset of an item, for scroll-to-index.
    ///
    /// `index` is clamped into `[0, total_count - 1]` first; an empty axis
    /// yields 0.
    #[must_use]
    pub fn offset_for_index(&self, index: usize, ctx: &AxisContext) -> f64 {
        if ctx.total_count == 0 {
            return 0.0;
        }
        index.min(ctx.total_count - 1) as f64 * ctx.item_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcore_core::{Axis, OverscanConfig};

    fn ctx(total: usize, item: f64, viewport: f64) -> AxisContext {
        AxisContext {
            axis: Axis::Row,
            viewport_size: viewport,
            scroll_offset: 0.0,
            virtualization_enabled: true,
            estimated_item_size: item,
            total_count: total,
            overscan: OverscanConfig::new(2.0, 12.0),
        }
    }

    // --- disabled regime ---

    #[test]
    fn disabled_renders_full_range() {
        let mut c = ctx(40, 20.0, 200.0);
        c.virtualization_enabled = false;
        let virt = AxisVirtualizer::new();
        let state = virt.compute_range(0.0, ScrollMotion::still(), &c);
        assert_eq!(state.start_index, 0);
        assert_eq!(state.end_index, 40);
        assert_eq!(state.pool_size, 40);
        assert_eq!(state.overscan_leading, 0);
        assert_eq!(state.overscan_trailing, 0);
    }

    // --- enabled regime ---

    #[test]
    fn window_follows_offset() {
        let c = ctx(100, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        let state = virt.compute_range(1000.0, ScrollMotion::still(), &c);
        assert_eq!(state.visible_count, 10);
        assert_eq!(state.offset, 1000.0);
        // First visible row is 50; overscan min 2 splits 1/1 at rest.
        assert_eq!(state.start_index, 49);
        assert_eq!(state.end_index, 61);
        assert_eq!(state.pool_size, state.end_index - state.start_index);
    }

    #[test]
    fn window_clamps_at_limit() {
        let c = ctx(100, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        // Content 2000, viewport 200: limit 1800.
        let state = virt.compute_range(99_999.0, ScrollMotion::still(), &c);
        assert_eq!(state.offset, 1800.0);
        assert_eq!(state.end_index, 100);
        assert_eq!(state.pool_size, state.end_index - state.start_index);
    }

    #[test]
    fn window_at_origin_has_no_leading_overscan() {
        let c = ctx(100, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        let state = virt.compute_range(-50.0, ScrollMotion::still(), &c);
        assert_eq!(state.start_index, 0);
        assert_eq!(state.overscan_leading, 0);
        assert!(state.overscan_trailing > 0);
    }

    #[test]
    fn forward_motion_deepens_trailing_overscan() {
        let c = ctx(1000, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        let fast = ScrollMotion {
            velocity: 1.0,
            direction: ScrollDirection::Forward,
        };
        let state = virt.compute_range(5000.0, fast, &c);
        assert!(state.overscan_trailing > state.overscan_leading);

        let back = ScrollMotion {
            velocity: 1.0,
            direction: ScrollDirection::Backward,
        };
        let state = virt.compute_range(5000.0, back, &c);
        assert!(state.overscan_leading > state.overscan_trailing);
    }

    #[test]
    fn visible_count_is_at_least_one() {
        let c = ctx(100, 500.0, 200.0);
        let virt = AxisVirtualizer::new();
        let state = virt.compute_range(0.0, ScrollMotion::still(), &c);
        assert_eq!(state.visible_count, 1);
    }

    // --- edge cases ---

    #[test]
    fn empty_axis_yields_empty_window() {
        let c = ctx(0, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        assert_eq!(
            virt.compute_range(100.0, ScrollMotion::still(), &c),
            VirtualizerState::empty()
        );
    }

    #[test]
    fn zero_item_size_floors_to_one() {
        let c = ctx(100, 0.0, 50.0);
        let virt = AxisVirtualizer::new();
        let state = virt.compute_range(10.0, ScrollMotion::still(), &c);
        assert_eq!(state.visible_count, 50);
        assert!(state.end_index <= 100);
    }

    #[test]
    fn compute_range_is_idempotent() {
        let c = ctx(100, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        let motion = ScrollMotion {
            velocity: 0.4,
            direction: ScrollDirection::Forward,
        };
        let a = virt.compute_range(730.0, motion, &c);
        let b = virt.compute_range(730.0, motion, &c);
        assert_eq!(a, b);
    }

    // --- offset_for_index ---

    #[test]
    fn offset_for_index_is_left_inverse() {
        let c = ctx(100, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        assert_eq!(virt.offset_for_index(0, &c), 0.0);
        assert_eq!(virt.offset_for_index(37, &c), 740.0);
        // Clamped into [0, total - 1].
        assert_eq!(virt.offset_for_index(500, &c), 99.0 * 20.0);
    }

    #[test]
    fn offset_for_index_on_empty_axis() {
        let c = ctx(0, 20.0, 200.0);
        let virt = AxisVirtualizer::new();
        assert_eq!(virt.offset_for_index(5, &c), 0.0);
    }
}
