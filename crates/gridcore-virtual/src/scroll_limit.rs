#![forbid(unsafe_code)]

//! Maximum scroll offset math.
//!
//! The strict lower bound on any axis is `max(0, content - viewport)`.
//! Hosts extend it with trailing overscan and padding, and reconcile it
//! against the scroll limit the native scroll container reports — native
//! dimensions drift during resize storms, so the reconciliation produces a
//! stable envelope instead of oscillating with them.

/// Inputs for the vertical scroll-limit computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VerticalLimitInput {
    /// Viewport height in pixels.
    pub viewport_size: f64,
    /// Total row count.
    pub total_count: usize,
    /// Row height in pixels.
    pub item_size: f64,
    /// Rows that fit in the viewport.
    pub visible_count: usize,
    /// Trailing overscan row count.
    pub overscan_trailing: usize,
    /// Extra scrollable space after the last row.
    pub trailing_padding: f64,
    /// Host chrome (footers, horizontal scrollbars) at the bottom edge.
    pub edge_padding: f64,
    /// Limit reported by the native scroll container, if any.
    pub native_scroll_limit: Option<f64>,
}

/// Inputs for the horizontal scroll-limit computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HorizontalLimitInput {
    /// Viewport width in pixels, including pinned regions.
    pub viewport_size: f64,
    /// Total column count, excluding pinned columns.
    pub total_count: usize,
    /// Column width in pixels.
    pub item_size: f64,
    /// Width frozen to the left edge.
    pub pinned_left_width: f64,
    /// Width frozen to the right edge.
    pub pinned_right_width: f64,
    /// Limit reported by the native scroll container, if any.
    pub native_scroll_limit: Option<f64>,
    /// Allowed disagreement with the native limit before reconciliation.
    pub tolerance_px: f64,
}

#[inline]
fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// Strict content-driven minimum: `max(0, total * item - viewport)`.
#[inline]
fn content_limit(total_count: usize, item_size: f64, viewport: f64) -> f64 {
    (total_count as f64 * item_size - viewport).max(0.0)
}

/// Maximum vertical scroll offset.
///
/// The result never drops below the strict content-driven minimum, even if
/// the host's native limit under-reports.
#[must_use]
pub fn vertical_scroll_limit(input: &VerticalLimitInput) -> f64 {
    let viewport = finite_or_zero(input.viewport_size).max(0.0);
    let item = finite_or_zero(input.item_size).max(0.0);
    let base = content_limit(input.total_count, item, viewport);

    let overscan_extent = input.overscan_trailing as f64 * item;
    let viewport_slack = (viewport - input.visible_count as f64 * item).max(0.0);
    let extended = base
        + overscan_extent
        + viewport_slack
        + finite_or_zero(input.trailing_padding).max(0.0)
        + finite_or_zero(input.edge_padding).max(0.0);
    let extended = extended.max(base);

    match input.native_scroll_limit {
        Some(native) if finite_or_zero(native) > 0.0 => extended.min(native).max(base),
        _ => extended,
    }
}

/// Maximum horizontal scroll offset.
///
/// Pinned-left/right widths are removed from the viewport before the
/// content limit is computed: pinned columns never scroll, so they consume
/// viewport without consuming scrollable content. The native limit is then
/// reconciled within `tolerance_px`: when native over-reports by more than
/// the tolerance the virtualization-derived bound (plus tolerance) wins;
/// when native under-reports it wins outright.
#[must_use]
pub fn horizontal_scroll_limit(input: &HorizontalLimitInput) -> f64 {
    let viewport = finite_or_zero(input.viewport_size).max(0.0);
    let pinned = finite_or_zero(input.pinned_left_width).max(0.0)
        + finite_or_zero(input.pinned_right_width).max(0.0);
    let scrollable_viewport = (viewport - pinned).max(0.0);
    let item = finite_or_zero(input.item_size).max(0.0);
    let base = content_limit(input.total_count, item, scrollable_viewport);

    let tolerance = finite_or_zero(input.tolerance_px).max(0.0);
    match input.native_scroll_limit {
        Some(native) if finite_or_zero(native) > 0.0 => {
            if native > base {
                #[cfg(feature = "tracing")]
                if native > base + tolerance {
                    tracing::debug!(
                        native,
                        base,
                        tolerance,
                        "native scroll limit over-reports; clamping"
                    );
                }
                native.min(base + tolerance)
            } else {
                native
            }
        }
        _ => base,
    }
}

/// Clamp a scroll offset into `[0, limit]`.
///
/// `NaN` offsets become 0; a non-finite or non-positive limit pins the
/// offset to 0.
#[must_use]
pub fn clamp_scroll_offset(offset: f64, limit: f64) -> f64 {
    let offset = finite_or_zero(offset);
    if !limit.is_finite() || limit <= 0.0 {
        return 0.0;
    }
    offset.clamp(0.0, limit)
}
