//! Item organizer
//!
//! Column descriptors for the item table, the builder that assembles them
//! and the helpers that sort, hide and filter by them.

pub mod column;
pub mod columns;
pub mod cells;
pub mod custom_stats;
pub mod table;

pub use column::{
    Cell, ColumnDef, ColumnGroup, Header, PlugChoice, PlugSelectedFn, PlugSelection, SortDirection,
    Value,
};
pub use columns::{build_columns, ColumnInputs};
pub use custom_stats::CustomStatDef;
pub use table::{filter_for_cell, sort_items, ColumnVisibility, SortState};
