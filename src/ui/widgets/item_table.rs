//! Item table widget for ratatui
//!
//! Draws the organizer's columns over a list of items, scrolling both ways
//! to keep the cursor cell on screen.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell as TableCell, Row, Table, Widget},
};

use crate::items::Item;
use crate::organizer::{ColumnDef, SortDirection, SortState};

/// Widest a free-text column gets
const MAX_WIDE_WIDTH: usize = 40;
/// Widest any other column gets
const MAX_WIDTH: usize = 28;

/// Cursor over the table's visible cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCursor {
    pub row: usize,
    pub col: usize,
}

impl TableCursor {
    pub fn move_up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn move_down(&mut self, rows: usize) {
        if self.row + 1 < rows {
            self.row += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.col = self.col.saturating_sub(1);
    }

    pub fn move_right(&mut self, cols: usize) {
        if self.col + 1 < cols {
            self.col += 1;
        }
    }

    /// Pull the cursor back inside a table of the given size
    pub fn clamp(&mut self, rows: usize, cols: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
    }
}

/// Display width of a column: header or widest cell, capped
pub fn column_width(column: &ColumnDef, items: &[&Item]) -> u16 {
    let cap = if column.grid_width.is_some() { MAX_WIDE_WIDTH } else { MAX_WIDTH };
    let header = column.header.display().chars().count() + 2;
    let widest = items
        .iter()
        .filter_map(|item| column.cell_for(item))
        .map(|cell| cell.line.width())
        .max()
        .unwrap_or(0);
    header.max(widest).clamp(1, cap) as u16
}

/// First column to draw so that `cursor_col` fits in `available` cells
pub fn first_visible_column(widths: &[u16], cursor_col: usize, available: u16) -> usize {
    if widths.is_empty() {
        return 0;
    }
    let last = cursor_col.min(widths.len() - 1);
    let mut first = 0;
    loop {
        let used: u16 = widths[first..=last].iter().map(|w| w + 1).sum();
        if used <= available || first >= last {
            return first;
        }
        first += 1;
    }
}

/// Widget for rendering the item table
pub struct ItemTableWidget<'a> {
    columns: &'a [&'a ColumnDef],
    items: &'a [&'a Item],
    cursor: TableCursor,
    sort: Option<&'a SortState>,
    title: &'a str,
}

impl<'a> ItemTableWidget<'a> {
    pub fn new(columns: &'a [&'a ColumnDef], items: &'a [&'a Item]) -> Self {
        Self {
            columns,
            items,
            cursor: TableCursor::default(),
            sort: None,
            title: "Items",
        }
    }

    pub fn cursor(mut self, cursor: TableCursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn sort(mut self, sort: &'a SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn header_cell(&self, column: &ColumnDef, is_cursor_col: bool) -> TableCell<'static> {
        let mut text = column.header.display().to_string();
        if let Some(sort) = self.sort.filter(|s| s.column_id == column.id) {
            text.push(match sort.direction {
                SortDirection::Asc => '▲',
                SortDirection::Desc => '▼',
            });
        }

        let mut style = Style::default().fg(Color::Rgb(220, 200, 140)).add_modifier(Modifier::BOLD);
        if is_cursor_col {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        TableCell::from(Line::from(text)).style(style)
    }
}

impl<'a> Widget for ItemTableWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.columns.is_empty() || inner.height < 2 {
            return;
        }

        let widths: Vec<u16> = self.columns.iter().map(|c| column_width(c, self.items)).collect();
        let first_col = first_visible_column(&widths, self.cursor.col, inner.width);

        // Header takes one line
        let body_height = inner.height.saturating_sub(1) as usize;
        let first_row = (self.cursor.row + 1).saturating_sub(body_height);

        let shown = first_col..self.columns.len();
        let header = Row::new(
            shown
                .clone()
                .map(|i| self.header_cell(self.columns[i], i == self.cursor.col)),
        );

        let rows = self
            .items
            .iter()
            .enumerate()
            .skip(first_row)
            .take(body_height)
            .map(|(r, item)| {
                let cells = shown.clone().map(|c| {
                    let line = self.columns[c]
                        .cell_for(item)
                        .map(|cell| cell.line)
                        .unwrap_or_default();
                    let mut cell = TableCell::from(line);
                    if r == self.cursor.row && c == self.cursor.col {
                        cell = cell.style(Style::default().bg(Color::Rgb(70, 70, 90)).add_modifier(Modifier::BOLD));
                    }
                    cell
                });
                let mut row = Row::new(cells);
                if r == self.cursor.row {
                    row = row.style(Style::default().bg(Color::Rgb(35, 35, 45)));
                }
                row
            });

        let constraints: Vec<Constraint> = widths[first_col..]
            .iter()
            .map(|w| Constraint::Length(*w))
            .collect();

        Table::new(rows, constraints)
            .header(header)
            .column_spacing(1)
            .render(inner, buf);
    }
}

/// Render help text for the table controls
pub fn render_table_help(area: Rect, buf: &mut Buffer) {
    let help = [
        ("↑↓←→", "Move"),
        ("s", "Sort"),
        ("h/H", "Hide/Show all"),
        ("f", "Filter"),
        ("Enter", "Pick perk"),
        ("w/a/g", "Weapons/Armor/Ghosts"),
        ("v", "Version"),
        ("q", "Quit"),
    ];

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::DarkGray);

    let mut x = area.x;
    for (key, desc) in help {
        let needed = (key.chars().count() + desc.chars().count() + 3) as u16;
        if x + needed > area.x + area.width {
            break;
        }
        buf.set_string(x, area.y, key, key_style);
        x += key.chars().count() as u16 + 1;
        buf.set_string(x, area.y, desc, desc_style);
        x += desc.chars().count() as u16 + 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemsType;
    use crate::organizer::{Header, Value};

    #[test]
    fn test_cursor_bounds() {
        let mut cursor = TableCursor::default();
        cursor.move_up();
        cursor.move_left();
        assert_eq!(cursor, TableCursor { row: 0, col: 0 });

        cursor.move_down(2);
        cursor.move_down(2);
        cursor.move_right(3);
        assert_eq!(cursor, TableCursor { row: 1, col: 1 });

        cursor.clamp(1, 1);
        assert_eq!(cursor, TableCursor { row: 0, col: 0 });
    }

    #[test]
    fn test_column_width() {
        let name = ColumnDef::new("name", Header::text("Name"), |i| i.name.as_str().into());
        let a = Item::new(1, "Ace", ItemsType::Weapon);
        let b = Item::new(2, "Vision of Confluence", ItemsType::Weapon);
        assert_eq!(column_width(&name, &[&a]), 6);
        assert_eq!(column_width(&name, &[&a, &b]), 20);

        let empty = ColumnDef::new("x", Header::text(""), |_| Value::None);
        assert_eq!(column_width(&empty, &[&a]), 2);
    }

    #[test]
    fn test_first_visible_column() {
        let widths = [10, 10, 10, 10];
        assert_eq!(first_visible_column(&widths, 0, 25), 0);
        assert_eq!(first_visible_column(&widths, 1, 25), 0);
        assert_eq!(first_visible_column(&widths, 3, 25), 2);
        // A column wider than the screen still shows from itself
        assert_eq!(first_visible_column(&[50, 50], 1, 25), 1);
    }

    #[test]
    fn test_renders_headers_and_cells() {
        let name = ColumnDef::new("name", Header::text("Name"), |i| i.name.as_str().into());
        let power = ColumnDef::new("power", Header::text("Power"), |i| i.power.into());
        let columns = [&name, &power];
        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.power = 1810;
        let items = [&item];
        let sort = SortState::new("power", SortDirection::Desc);

        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        ItemTableWidget::new(&columns, &items).sort(&sort).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Name"));
        assert!(text.contains("Power▼"));
        assert!(text.contains("Fatebringer"));
        assert!(text.contains("1810"));
    }
}
