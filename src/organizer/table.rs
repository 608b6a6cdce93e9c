//! Sorting, column visibility and cell filters for a built column list

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::items::Item;

use super::column::{ColumnDef, SortDirection, Value};

/// Which column the table is sorted by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self { column_id: column_id.into(), direction }
    }

    /// Sort state after the user picks `column`: the same column flips
    /// direction, another column starts at its default direction
    pub fn toggled_for(&self, column: &ColumnDef) -> Self {
        if column.id == self.column_id {
            Self::new(column.id.clone(), self.direction.toggled())
        } else {
            Self::new(column.id.clone(), column.default_sort.unwrap_or_default())
        }
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new("name", SortDirection::Asc)
    }
}

/// Stable sort of `items` by the sorted column.
///
/// Unknown and unsortable columns leave the order untouched.
pub fn sort_items<'a>(items: &mut [&'a Item], columns: &[ColumnDef], sort: &SortState) {
    let Some(column) = columns.iter().find(|c| c.id == sort.column_id) else {
        log::debug!("Sort column {} not in table", sort.column_id);
        return;
    };
    if column.no_sort {
        return;
    }

    let mut keyed: Vec<(Value, &'a Item)> =
        items.iter().map(|item| (column.value_of(item), *item)).collect();
    keyed.sort_by(|(a, _), (b, _)| sort.direction.apply(column.compare(a, b)));

    for (slot, (_, item)) in items.iter_mut().zip(keyed) {
        *slot = item;
    }
}

/// Search expression matching an item's value in a column
pub fn filter_for_cell(column: &ColumnDef, item: &Item) -> Option<String> {
    column.filter_for(&column.value_of(item), item)
}

/// Hidden columns, by selection ID so a group hides as one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: HashSet<String>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_hidden<I, S>(hidden: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { hidden: hidden.into_iter().map(Into::into).collect() }
    }

    pub fn is_visible(&self, column: &ColumnDef) -> bool {
        column.no_hide || !self.hidden.contains(column.selection_id())
    }

    /// Flip a column's visibility. Returns false for columns that cannot
    /// be hidden.
    pub fn toggle(&mut self, column: &ColumnDef) -> bool {
        if column.no_hide {
            return false;
        }
        let id = column.selection_id().to_string();
        if !self.hidden.remove(&id) {
            self.hidden.insert(id);
        }
        true
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    /// The columns to draw, in table order
    pub fn visible_columns<'a>(&self, columns: &'a [ColumnDef]) -> Vec<&'a ColumnDef> {
        columns.iter().filter(|c| self.is_visible(c)).collect()
    }

    /// Hidden selection IDs, sorted, for saving
    pub fn hidden_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.hidden.iter().cloned().collect();
        ids.sort();
        ids
    }
}
