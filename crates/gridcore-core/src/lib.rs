#![forbid(unsafe_code)]

//! Core: coordinates, bounds, cell values, and the per-axis virtualization
//! data model shared by every GridCore crate.

pub mod axis;
pub mod column;
pub mod geometry;
pub mod logging;
pub mod value;

pub use axis::{Axis, AxisContext, OverscanConfig, VirtualizerState};
pub use column::ColumnFlags;
pub use geometry::{CellCoord, GridBounds};
pub use value::CellValue;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn, warn_span};
