#![forbid(unsafe_code)]

//! Per-axis virtualization data model.
//!
//! An [`AxisContext`] is built fresh by the host on every scroll tick from
//! already-measured metrics; the virtualizer derives a [`VirtualizerState`]
//! from it and both are discarded afterwards. Neither type has identity
//! across ticks.

/// A grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Vertical axis: items are rows.
    Row,
    /// Horizontal axis: items are columns.
    Column,
}

/// Adaptive overscan tuning for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverscanConfig {
    /// Overscan item count at rest.
    pub min: f64,
    /// Overscan item count at full scroll velocity.
    pub max: f64,
    /// Easing exponent for velocity-to-overscan mapping.
    pub gamma: f64,
}

impl OverscanConfig {
    /// Default easing exponent.
    pub const DEFAULT_GAMMA: f64 = 0.9;

    /// Create a config with the default easing exponent.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            gamma: Self::DEFAULT_GAMMA,
        }
    }

    /// Override the easing exponent.
    #[must_use]
    pub const fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }
}

impl Default for OverscanConfig {
    fn default() -> Self {
        Self::new(2.0, 12.0)
    }
}

/// Read-only input to one virtualization computation.
///
/// The host owns measurement; everything here is already in pixels or item
/// counts. Produced once per tick and never mutated by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisContext {
    /// Which axis is being virtualized.
    pub axis: Axis,
    /// Viewport extent along the axis, in pixels.
    pub viewport_size: f64,
    /// Raw scroll offset along the axis, in pixels.
    pub scroll_offset: f64,
    /// Whether virtualization is active; when false the full range renders.
    pub virtualization_enabled: bool,
    /// Estimated extent of one item along the axis, in pixels.
    pub estimated_item_size: f64,
    /// Total number of items on the axis.
    pub total_count: usize,
    /// Overscan tuning.
    pub overscan: OverscanConfig,
}

impl AxisContext {
    /// Effective item size: non-finite or non-positive sizes floor to 1.
    ///
    /// Keeps every downstream division and window walk finite.
    #[inline]
    #[must_use]
    pub fn item_size(&self) -> f64 {
        if self.estimated_item_size.is_finite() && self.estimated_item_size > 0.0 {
            self.estimated_item_size
        } else {
            1.0
        }
    }

    /// Total content extent along the axis, in pixels.
    #[inline]
    #[must_use]
    pub fn content_size(&self) -> f64 {
        self.total_count as f64 * self.item_size()
    }
}

/// Derived index window for one axis, immutable per tick.
///
/// Invariants: `start_index <= end_index <= total_count` and
/// `pool_size == end_index - start_index`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualizerState {
    /// First materialized index (inclusive).
    pub start_index: usize,
    /// One past the last materialized index (exclusive).
    pub end_index: usize,
    /// Items that fit in the viewport.
    pub visible_count: usize,
    /// Materialized item count (`end_index - start_index`).
    pub pool_size: usize,
    /// Overscan items applied before `start_index`.
    pub overscan_leading: usize,
    /// Overscan items applied after the visible window.
    pub overscan_trailing: usize,
    /// Clamped scroll offset the window was computed from, in pixels.
    pub offset: f64,
}

impl VirtualizerState {
    /// An empty window at offset zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            start_index: 0,
            end_index: 0,
            visible_count: 0,
            pool_size: 0,
            overscan_leading: 0,
            overscan_trailing: 0,
            offset: 0.0,
        }
    }

    /// The materialized index range.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start_index..self.end_index
    }

    /// Whether nothing is materialized.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }
}
