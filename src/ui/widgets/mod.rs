//! UI widgets

pub mod item_table;

pub use item_table::{column_width, render_table_help, ItemTableWidget, TableCursor};
