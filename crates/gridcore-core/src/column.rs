#![forbid(unsafe_code)]

//! Per-column capability flags.

use bitflags::bitflags;

bitflags! {
    /// Capabilities of one grid column, supplied by the host's column model.
    ///
    /// The mutation engine skips writes into columns without `EDITABLE` and
    /// never touches `SELECTION` columns; the scroll-limit calculator
    /// excludes `PINNED_LEFT`/`PINNED_RIGHT` widths from the scrollable
    /// viewport.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ColumnFlags: u8 {
        /// Cell values in this column may be written by move/fill.
        const EDITABLE = 1 << 0;
        /// Frozen to the left edge; outside horizontal scroll math.
        const PINNED_LEFT = 1 << 1;
        /// Frozen to the right edge; outside horizontal scroll math.
        const PINNED_RIGHT = 1 << 2;
        /// Selection-checkbox style column; blocked for all mutation.
        const SELECTION = 1 << 3;
    }
}

impl ColumnFlags {
    /// Whether move/fill may write this column.
    #[inline]
    #[must_use]
    pub const fn accepts_writes(&self) -> bool {
        self.contains(Self::EDITABLE) && !self.contains(Self::SELECTION)
    }

    /// Whether the column is pinned to either edge.
    #[inline]
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.intersects(Self::PINNED_LEFT.union(Self::PINNED_RIGHT))
    }
}
