#![forbid(unsafe_code)]

//! Column model seam: capability flags, field tokens, computed columns.

use std::fmt;

use gridcore_core::{CellValue, ColumnFlags};

use crate::store::CellReader;

/// Recompute hook for one derived column.
///
/// `inputs` name the upstream dependency tokens; the engine recomputes the
/// column only when the closure of a mutation's written fields intersects
/// them. `compute` reads through a [`CellReader`] that already reflects the
/// mutation's pending writes.
///
/// Recompute runs once per mutation in column-index order. An `inputs`
/// entry may name another computed column's token, but that upstream
/// column must sit at a lower index than this one, or `compute` reads its
/// value from before the current mutation.
pub struct ComputedColumn {
    /// The column's own dependency token, e.g. `computed:total`.
    pub token: String,
    /// Upstream dependency tokens.
    pub inputs: Vec<String>,
    /// Value function for one row.
    pub compute: Box<dyn Fn(&dyn CellReader, usize) -> CellValue>,
}

impl ComputedColumn {
    /// Build a hook from its token, inputs, and value function.
    #[must_use]
    pub fn new(
        token: impl Into<String>,
        inputs: Vec<String>,
        compute: impl Fn(&dyn CellReader, usize) -> CellValue + 'static,
    ) -> Self {
        Self {
            token: token.into(),
            inputs,
            compute: Box::new(compute),
        }
    }
}

impl fmt::Debug for ComputedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedColumn")
            .field("token", &self.token)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

/// Host-supplied column metadata.
pub trait ColumnModel {
    /// Number of columns.
    fn column_count(&self) -> usize;

    /// Capability flags of one column. Out-of-range columns are empty,
    /// which blocks writes.
    fn flags(&self, column: usize) -> ColumnFlags;

    /// Dependency token of the field behind one column, if it participates
    /// in dependency tracking.
    fn field_token(&self, column: usize) -> Option<&str>;

    /// Recompute hook, for derived columns.
    fn computed(&self, column: usize) -> Option<&ComputedColumn>;
}

/// One column definition for [`BasicColumns`].
#[derive(Debug, Default)]
pub struct ColumnDef {
    /// Capability flags.
    pub flags: ColumnFlags,
    /// Dependency token of the backing field.
    pub field: Option<String>,
    /// Recompute hook for derived columns.
    pub computed: Option<ComputedColumn>,
}

impl ColumnDef {
    /// An editable data column backed by `field`.
    #[must_use]
    pub fn editable(field: impl Into<String>) -> Self {
        Self {
            flags: ColumnFlags::EDITABLE,
            field: Some(field.into()),
            computed: None,
        }
    }

    /// A read-only column backed by `field`.
    #[must_use]
    pub fn read_only(field: impl Into<String>) -> Self {
        Self {
            flags: ColumnFlags::empty(),
            field: Some(field.into()),
            computed: None,
        }
    }

    /// A selection-checkbox column; blocked for all mutation.
    #[must_use]
    pub fn selection() -> Self {
        Self {
            flags: ColumnFlags::SELECTION,
            field: None,
            computed: None,
        }
    }

    /// A derived column driven by `hook`; its field token is the hook's.
    #[must_use]
    pub fn derived(hook: ComputedColumn) -> Self {
        Self {
            flags: ColumnFlags::empty(),
            field: Some(hook.token.clone()),
            computed: Some(hook),
        }
    }

    /// Add flags, builder style.
    #[must_use]
    pub fn with_flags(mut self, flags: ColumnFlags) -> Self {
        self.flags |= flags;
        self
    }
}

/// Vec-backed [`ColumnModel`].
#[derive(Debug, Default)]
pub struct BasicColumns {
    columns: Vec<ColumnDef>,
}

impl BasicColumns {
    /// Model over an ordered column list.
    #[must_use]
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }
}

impl ColumnModel for BasicColumns {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn flags(&self, column: usize) -> ColumnFlags {
        self.columns
            .get(column)
            .map(|c| c.flags)
            .unwrap_or_default()
    }

    fn field_token(&self, column: usize) -> Option<&str> {
        self.columns.get(column)?.field.as_deref()
    }

    fn computed(&self, column: usize) -> Option<&ComputedColumn> {
        self.columns.get(column)?.computed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{BasicColumns, ColumnDef, ColumnModel, ComputedColumn};
    use gridcore_core::{CellValue, ColumnFlags};

    #[test]
    fn basic_columns_expose_defs() {
        let cols = BasicColumns::new(vec![
            ColumnDef::selection(),
            ColumnDef::editable("price"),
            ColumnDef::read_only("sku"),
        ]);
        assert_eq!(cols.column_count(), 3);
        assert!(cols.flags(0).contains(ColumnFlags::SELECTION));
        assert!(cols.flags(1).accepts_writes());
        assert!(!cols.flags(2).accepts_writes());
        assert_eq!(cols.field_token(1), Some("price"));
        assert_eq!(cols.field_token(0), None);
    }

    #[test]
    fn out_of_range_column_blocks_writes() {
        let cols = BasicColumns::new(vec![ColumnDef::editable("a")]);
        assert!(!cols.flags(9).accepts_writes());
        assert!(cols.field_token(9).is_none());
    }

    #[test]
    fn derived_column_carries_hook_token_as_field() {
        let hook = ComputedColumn::new("computed:total", vec!["price".into()], |_, _| {
            CellValue::Null
        });
        let cols = BasicColumns::new(vec![ColumnDef::derived(hook)]);
        assert_eq!(cols.field_token(0), Some("computed:total"));
        assert!(cols.computed(0).is_some());
    }
}
