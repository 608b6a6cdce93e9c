//! Column descriptors for the item table
//!
//! A `ColumnDef` says how to pull a sortable value out of an item, how to
//! draw it, how to order it and which search filter matches it. Columns are
//! built fresh for every table and never mutated afterwards.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::items::{Item, ItemId, StatHash};

/// A column's value for one item, used for sorting and filtering
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Truthiness as the search filters see it
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Text(_) => 3,
        }
    }

    /// Default ordering: missing values first, numbers numerically, text
    /// lexicographically
    pub fn default_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.total_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Related columns shown under one header and toggled together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    pub id: String,
    pub header: String,
}

impl ColumnGroup {
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self { id: id.into(), header: header.into() }
    }
}

/// Column header content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Text(String),
    /// A glyph, with a label for menus and tooltips
    Icon { glyph: String, label: String },
}

impl Header {
    pub fn text(text: impl Into<String>) -> Self {
        Header::Text(text.into())
    }

    pub fn icon(glyph: impl Into<String>, label: impl Into<String>) -> Self {
        Header::Icon { glyph: glyph.into(), label: label.into() }
    }

    /// What the table header shows
    pub fn display(&self) -> &str {
        match self {
            Header::Text(text) => text,
            Header::Icon { glyph, .. } => glyph,
        }
    }

    /// Plain-text name of the column
    pub fn label(&self) -> &str {
        match self {
            Header::Text(text) => text,
            Header::Icon { label, .. } => label,
        }
    }
}

/// One selectable plug inside a perk cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlugChoice {
    pub socket_index: u32,
    pub plug_hash: u32,
}

/// Reported when the user picks a plug in a perk cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlugSelection {
    pub item_id: ItemId,
    pub socket_index: u32,
    pub plug_hash: u32,
}

/// Rendered cell content
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub line: Line<'static>,
    /// Plugs the user can pick from this cell
    pub choices: Vec<PlugChoice>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self { line: Line::from(text.into()), choices: Vec::new() }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self { line: Line::from(Span::styled(text.into(), style)), choices: Vec::new() }
    }

    pub fn from_spans(spans: Vec<Span<'static>>) -> Self {
        Self { line: Line::from(spans), choices: Vec::new() }
    }

    /// Plain text of the cell, without styling
    pub fn plain(&self) -> String {
        self.line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.line.spans.iter().all(|s| s.content.is_empty())
    }
}

pub type ValueFn = Rc<dyn Fn(&Item) -> Value>;
pub type CellFn = Rc<dyn Fn(&Value, &Item) -> Option<Cell>>;
pub type Comparator = Rc<dyn Fn(&Value, &Value) -> Ordering>;
pub type FilterFn = Rc<dyn Fn(&Value, &Item) -> Option<String>>;
pub type PlugSelectedFn = Rc<dyn Fn(PlugSelection)>;

/// Build a comparator ordering values by a derived key
pub fn compare_by<K: Ord>(key: impl Fn(&Value) -> K + 'static) -> impl Fn(&Value, &Value) -> Ordering {
    move |a, b| key(a).cmp(&key(b))
}

/// A column of the item table
#[derive(Clone)]
pub struct ColumnDef {
    /// Unique within a table
    pub id: String,
    pub header: Header,
    /// Name shown in the column picker, when the header is an icon
    pub dropdown_label: Option<String>,
    pub column_group: Option<ColumnGroup>,
    /// Stat this column was generated for
    pub stat_hash: Option<StatHash>,
    pub default_sort: Option<SortDirection>,
    pub no_sort: bool,
    pub no_hide: bool,
    /// Width hint, e.g. `minmax(200px, 1fr)` or a character count
    pub grid_width: Option<String>,
    value: ValueFn,
    cell: Option<CellFn>,
    sort: Option<Comparator>,
    filter: Option<FilterFn>,
    on_plug_selected: Option<PlugSelectedFn>,
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("column_group", &self.column_group.as_ref().map(|g| &g.id))
            .field("stat_hash", &self.stat_hash)
            .field("default_sort", &self.default_sort)
            .field("has_cell", &self.cell.is_some())
            .field("has_sort", &self.sort.is_some())
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

impl ColumnDef {
    pub fn new(
        id: impl Into<String>,
        header: Header,
        value: impl Fn(&Item) -> Value + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header,
            dropdown_label: None,
            column_group: None,
            stat_hash: None,
            default_sort: None,
            no_sort: false,
            no_hide: false,
            grid_width: None,
            value: Rc::new(value),
            cell: None,
            sort: None,
            filter: None,
            on_plug_selected: None,
        }
    }

    // ===== BUILDER =====

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn dropdown_label(mut self, label: impl Into<String>) -> Self {
        self.dropdown_label = Some(label.into());
        self
    }

    pub fn group(mut self, group: &ColumnGroup) -> Self {
        self.column_group = Some(group.clone());
        self
    }

    pub fn stat_hash(mut self, stat_hash: StatHash) -> Self {
        self.stat_hash = Some(stat_hash);
        self
    }

    pub fn value(mut self, value: impl Fn(&Item) -> Value + 'static) -> Self {
        self.value = Rc::new(value);
        self
    }

    pub fn cell(mut self, cell: impl Fn(&Value, &Item) -> Option<Cell> + 'static) -> Self {
        self.cell = Some(Rc::new(cell));
        self
    }

    pub fn sort(mut self, sort: impl Fn(&Value, &Value) -> Ordering + 'static) -> Self {
        self.sort = Some(Rc::new(sort));
        self
    }

    pub fn default_sort(mut self, direction: SortDirection) -> Self {
        self.default_sort = Some(direction);
        self
    }

    pub fn filter(mut self, filter: impl Fn(&Value, &Item) -> Option<String> + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    pub fn no_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    pub fn no_sort(mut self) -> Self {
        self.no_sort = true;
        self
    }

    pub fn no_hide(mut self) -> Self {
        self.no_hide = true;
        self
    }

    pub fn grid_width(mut self, width: impl Into<String>) -> Self {
        self.grid_width = Some(width.into());
        self
    }

    pub fn on_plug_selected(mut self, callback: Option<PlugSelectedFn>) -> Self {
        self.on_plug_selected = callback;
        self
    }

    // ===== QUERIES =====

    /// ID used to decide whether this column is shown
    pub fn selection_id(&self) -> &str {
        self.column_group.as_ref().map(|g| g.id.as_str()).unwrap_or(&self.id)
    }

    /// Name of the column for menus
    pub fn label(&self) -> &str {
        self.dropdown_label.as_deref().unwrap_or_else(|| self.header.label())
    }

    pub fn value_of(&self, item: &Item) -> Value {
        (self.value)(item)
    }

    /// Render the cell for an item. Columns without a cell renderer show the
    /// value as text.
    pub fn cell_for(&self, item: &Item) -> Option<Cell> {
        let value = self.value_of(item);
        match &self.cell {
            Some(cell) => cell(&value, item),
            None if value.is_none() => None,
            None => Some(Cell::text(value.to_string())),
        }
    }

    /// Order two values of this column, ascending
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match &self.sort {
            Some(sort) => sort(a, b),
            None => a.default_cmp(b),
        }
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    /// Search expression matching `value` in this column
    pub fn filter_for(&self, value: &Value, item: &Item) -> Option<String> {
        self.filter.as_ref().and_then(|filter| filter(value, item))
    }

    /// Report a plug pick from this column's cell. Only perk sockets with
    /// several options accept a pick.
    pub fn select_plug(&self, item: &Item, choice: PlugChoice) -> bool {
        let Some(callback) = &self.on_plug_selected else {
            return false;
        };
        let selectable = item.sockets.iter().any(|s| {
            s.socket_index == choice.socket_index
                && s.is_selectable()
                && s.plug_options.iter().any(|p| p.hash == choice.plug_hash)
        });
        if selectable {
            callback(PlugSelection {
                item_id: item.id,
                socket_index: choice.socket_index,
                plug_hash: choice.plug_hash,
            });
        }
        selectable
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::items::{ItemsType, Plug, PlugCategory, Socket};

    #[test]
    fn test_value_ordering() {
        assert_eq!(Value::None.default_cmp(&Value::Int(0)), Ordering::Less);
        assert_eq!(Value::Int(3).default_cmp(&Value::Float(2.5)), Ordering::Greater);
        assert_eq!(Value::from("a").default_cmp(&Value::from("b")), Ordering::Less);
        assert_eq!(Value::Bool(false).default_cmp(&Value::Bool(true)), Ordering::Less);
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<u32>), Value::None);
        assert_eq!(Value::from(Some(5u32)), Value::Int(5));
    }

    #[test]
    fn test_selection_id_prefers_group() {
        let group = ColumnGroup::new("stats", "Stats");
        let plain = ColumnDef::new("name", Header::text("Name"), |i| i.name.as_str().into());
        let grouped = ColumnDef::new("stat1", Header::text("Impact"), |_| Value::None).group(&group);

        assert_eq!(plain.selection_id(), "name");
        assert_eq!(grouped.selection_id(), "stats");
    }

    #[test]
    fn test_default_cell_shows_value() {
        let item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        let column = ColumnDef::new("name", Header::text("Name"), |i| i.name.as_str().into());
        assert_eq!(column.cell_for(&item).map(|c| c.plain()).as_deref(), Some("Fatebringer"));

        let empty = ColumnDef::new("nothing", Header::text("Nothing"), |_| Value::None);
        assert!(empty.cell_for(&item).is_none());
    }

    #[test]
    fn test_compare_by() {
        let by_len = compare_by(|v: &Value| v.as_text().map(|s| s.len()).unwrap_or(0));
        assert_eq!(by_len(&Value::from("aaa"), &Value::from("b")), Ordering::Greater);
    }

    #[test]
    fn test_select_plug_requires_choice() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        let callback: PlugSelectedFn = Rc::new(move |selection| sink.borrow_mut().push(selection));

        let mut item = Item::new(7, "Fatebringer", ItemsType::Weapon);
        item.sockets = vec![
            Socket::perk(1, vec![
                Plug::new(20, "Outlaw", PlugCategory::Trait),
                Plug::new(21, "Rapid Hit", PlugCategory::Trait),
            ]),
            Socket::perk(2, vec![Plug::new(30, "Explosive Payload", PlugCategory::Trait)]),
        ];

        let column = ColumnDef::new("perks", Header::text("Perks"), |_| Value::None)
            .on_plug_selected(Some(callback));

        assert!(column.select_plug(&item, PlugChoice { socket_index: 1, plug_hash: 21 }));
        // Single-option sockets are not a choice
        assert!(!column.select_plug(&item, PlugChoice { socket_index: 2, plug_hash: 30 }));
        // Unknown plug
        assert!(!column.select_plug(&item, PlugChoice { socket_index: 1, plug_hash: 99 }));

        assert_eq!(
            picked.borrow().as_slice(),
            &[PlugSelection { item_id: 7, socket_index: 1, plug_hash: 21 }]
        );
    }
}
