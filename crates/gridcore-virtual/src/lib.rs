#![forbid(unsafe_code)]

//! Virtualization primitives for efficient rendering of large grids.
//!
//! Everything here is a pure function of already-measured metrics: the host
//! owns pixel measurement and the scroll-event listener, builds an
//! [`AxisContext`](gridcore_core::AxisContext) once per tick, and renders
//! whatever window the virtualizer hands back.
//!
//! # Core pieces
//!
//! - [`overscan`] — velocity-adaptive render-ahead budget and its
//!   lead/trail split.
//! - [`virtualizer`] — visible index window derivation per axis.
//! - [`scroll_limit`] — maximum scroll offset math, including pinned
//!   regions and native-limit reconciliation.
//! - [`velocity`] — deterministic velocity normalization from successive
//!   offset samples.

pub mod overscan;
pub mod scroll_limit;
pub mod velocity;
pub mod virtualizer;

pub use overscan::{OverscanSplit, ScrollDirection, compute_overscan, split_lead_trail};
pub use scroll_limit::{
    HorizontalLimitInput, VerticalLimitInput, clamp_scroll_offset, horizontal_scroll_limit,
    vertical_scroll_limit,
};
pub use velocity::VelocityTracker;
pub use virtualizer::{AxisVirtualizer, ContentLimitClamp, ScrollClamp, ScrollMotion};
