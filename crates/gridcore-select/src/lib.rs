#![forbid(unsafe_code)]

//! Selection geometry: anchor/focus rectangles and multi-range sets.
//!
//! A selection gesture has a fixed **anchor** and a moving **focus**; the
//! active range is their bounding box, normalized so `start <= end` on both
//! axes. Non-contiguous multi-select keeps a canonical set of independent
//! rectangles on top ([`SelectionSet`]). Everything here is pure and total
//! over a [`GridBounds`](gridcore_core::GridBounds): out-of-bounds points
//! are clamped, never rejected.

pub mod range;
pub mod set;

pub use range::{CellRect, SelectionRange};
pub use set::SelectionSet;
