//! Main UI Application
//!
//! Holds the organizer's view state (which table, sort, hidden columns,
//! cursor) and maps key presses onto it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::data::{OrganizerConfig, VaultData};
use crate::i18n::Strings;
use crate::items::{Item, ItemId, ItemsType, SchemaVersion};
use crate::organizer::{
    build_columns, filter_for_cell, sort_items, ColumnDef, ColumnVisibility, PlugSelectedFn,
    PlugSelection, SortState,
};

use super::widgets::{render_table_help, ItemTableWidget, TableCursor};

/// Main UI application
pub struct App {
    vault: VaultData,
    strings: Rc<Strings>,
    items_type: ItemsType,
    version: SchemaVersion,
    /// Every column of the current table, hidden ones included
    columns: Vec<ColumnDef>,
    /// Item IDs of the current table, in display order
    rows: Vec<ItemId>,
    visibility: ColumnVisibility,
    sort: SortState,
    cursor: TableCursor,
    /// Position in the current cell's plug choices
    choice_index: Option<usize>,
    /// Plug picks reported by the perk columns, not yet applied
    picked: Rc<RefCell<Vec<PlugSelection>>>,
    status: String,
}

impl App {
    pub fn new(vault: VaultData, config: &OrganizerConfig) -> Self {
        let mut app = Self {
            vault,
            strings: Rc::new(Strings::with_overrides(&config.strings)),
            items_type: config.items_type,
            version: config.version,
            columns: Vec::new(),
            rows: Vec::new(),
            visibility: config.visibility(),
            sort: config.sort.clone(),
            cursor: TableCursor::default(),
            choice_index: None,
            picked: Rc::new(RefCell::new(Vec::new())),
            status: String::new(),
        };
        app.rebuild();
        app
    }

    // ===== STATE =====

    /// Rebuild columns and rows for the current table
    fn rebuild(&mut self) {
        let picked = self.picked.clone();
        let on_plug_selected: PlugSelectedFn =
            Rc::new(move |selection: PlugSelection| picked.borrow_mut().push(selection));

        let inputs = self.vault.column_inputs(
            self.items_type,
            self.version,
            self.strings.clone(),
            Some(on_plug_selected),
        );
        self.columns = build_columns(&inputs);
        self.refresh_rows();
        self.clamp_cursor();
        log::info!(
            "Showing {} {:?}: {} items, {} columns",
            self.items_type.name(),
            self.version,
            self.rows.len(),
            self.columns.len()
        );
    }

    fn refresh_rows(&mut self) {
        let mut items = self.vault.items_of(self.items_type, self.version);
        sort_items(&mut items, &self.columns, &self.sort);
        self.rows = items.iter().map(|i| i.id).collect();
    }

    fn clamp_cursor(&mut self) {
        let cols = self.visible_columns().len();
        self.cursor.clamp(self.rows.len(), cols);
    }

    pub fn items_type(&self) -> ItemsType {
        self.items_type
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.visibility.visible_columns(&self.columns)
    }

    /// Items of the current table, in display order
    pub fn row_items(&self) -> Vec<&Item> {
        let by_id: HashMap<ItemId, &Item> = self.vault.items.iter().map(|i| (i.id, i)).collect();
        self.rows.iter().filter_map(|id| by_id.get(id).copied()).collect()
    }

    fn current_column(&self) -> Option<&ColumnDef> {
        self.visible_columns().get(self.cursor.col).copied()
    }

    fn current_item(&self) -> Option<&Item> {
        let id = self.rows.get(self.cursor.row)?;
        self.vault.items.iter().find(|i| i.id == *id)
    }

    /// Settings to persist from this session
    pub fn config(&self, base: &OrganizerConfig) -> OrganizerConfig {
        OrganizerConfig {
            items_type: self.items_type,
            version: self.version,
            hidden_columns: self.visibility.hidden_ids(),
            sort: self.sort.clone(),
            ..base.clone()
        }
    }

    // ===== INPUT =====

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        let rows = self.rows.len();
        let cols = self.visible_columns().len();

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(|c| c.move_up()),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(|c| c.move_down(rows)),
            KeyCode::Left => self.move_cursor(|c| c.move_left()),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(|c| c.move_right(cols)),
            KeyCode::Char('s') => self.sort_by_current(),
            KeyCode::Char('h') => self.hide_current(),
            KeyCode::Char('H') => {
                self.visibility.show_all();
                self.status = "All columns shown".to_string();
            }
            KeyCode::Char('f') => self.filter_current(),
            KeyCode::Enter => self.cycle_plug_choice(),
            KeyCode::Char('w') => self.switch_items_type(ItemsType::Weapon),
            KeyCode::Char('a') => self.switch_items_type(ItemsType::Armor),
            KeyCode::Char('g') => self.switch_items_type(ItemsType::Ghost),
            KeyCode::Char('v') => {
                self.version = match self.version {
                    SchemaVersion::V1 => SchemaVersion::V2,
                    SchemaVersion::V2 => SchemaVersion::V1,
                };
                self.rebuild();
                self.status = format!("Schema {:?}", self.version);
            }
            _ => {}
        }

        Ok(false)
    }

    fn move_cursor(&mut self, step: impl FnOnce(&mut TableCursor)) {
        step(&mut self.cursor);
        self.choice_index = None;
    }

    fn sort_by_current(&mut self) {
        let Some(column) = self.current_column() else {
            return;
        };
        let label = column.label().to_string();
        if column.no_sort {
            self.status = format!("{} can't be sorted", label);
            return;
        }

        let sort = self.sort.toggled_for(column);
        self.status = format!("Sorted by {} ({:?})", label, sort.direction);
        self.sort = sort;
        self.refresh_rows();
    }

    fn hide_current(&mut self) {
        let Some(column) = self.current_column() else {
            return;
        };
        let label = column
            .column_group
            .as_ref()
            .map(|g| g.header.clone())
            .unwrap_or_else(|| column.label().to_string());
        let column = column.clone();

        self.status = if self.visibility.toggle(&column) {
            format!("Hid {}", label)
        } else {
            format!("{} can't be hidden", label)
        };
        self.clamp_cursor();
    }

    fn filter_current(&mut self) {
        let (Some(column), Some(item)) = (self.current_column(), self.current_item()) else {
            return;
        };
        self.status = match filter_for_cell(column, item) {
            Some(filter) => filter,
            None => format!("No filter for {}", column.label()),
        };
    }

    /// Pick the next plug choice of the current perk cell
    fn cycle_plug_choice(&mut self) {
        let (Some(column), Some(item)) = (self.current_column(), self.current_item()) else {
            return;
        };
        let choices = column.cell_for(item).map(|c| c.choices).unwrap_or_default();
        if choices.is_empty() {
            self.status = "Nothing to pick here".to_string();
            return;
        }

        let index = self.choice_index.map(|i| (i + 1) % choices.len()).unwrap_or(0);
        let accepted = column.select_plug(item, choices[index]);
        self.choice_index = Some(index);

        if !accepted {
            self.status = "That perk can't be picked".to_string();
        }
        self.apply_picked();
    }

    /// Plug reported picks into the vault's items
    fn apply_picked(&mut self) {
        let picked: Vec<PlugSelection> = self.picked.borrow_mut().drain(..).collect();
        for selection in picked {
            let Some(item) = self.vault.items.iter_mut().find(|i| i.id == selection.item_id) else {
                continue;
            };
            let Some(socket) = item
                .sockets
                .iter_mut()
                .find(|s| s.socket_index == selection.socket_index)
            else {
                continue;
            };
            if let Some(index) = socket.plug_options.iter().position(|p| p.hash == selection.plug_hash) {
                socket.plugged = Some(index);
                self.status = format!("{}: {}", item.name, socket.plug_options[index].name);
                log::debug!("Plugged {:?}", selection);
            }
        }
    }

    fn switch_items_type(&mut self, items_type: ItemsType) {
        if self.items_type == items_type {
            return;
        }
        self.items_type = items_type;
        self.cursor = TableCursor::default();
        self.choice_index = None;
        self.rebuild();
        self.status = items_type.name().to_string();
    }

    // ===== RENDERING =====

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        frame.render_widget(Paragraph::new(self.tabs_line()), chunks[0]);

        let columns = self.visible_columns();
        let items = self.row_items();
        let title = format!(" {} ({}) ", self.items_type.name(), items.len());
        frame.render_widget(
            ItemTableWidget::new(&columns, &items)
                .cursor(self.cursor)
                .sort(&self.sort)
                .title(&title),
            chunks[1],
        );

        let status = Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::Rgb(150, 200, 255)));
        frame.render_widget(status, chunks[2]);

        render_table_help(chunks[3], frame.buffer_mut());
    }

    fn tabs_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for items_type in [ItemsType::Weapon, ItemsType::Armor, ItemsType::Ghost] {
            let style = if items_type == self.items_type {
                Style::default().fg(Color::Black).bg(Color::Rgb(220, 200, 140)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", items_type.name()), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!("[{:?}]", self.version),
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_vault;
    use crate::items::{Plug, PlugCategory, Socket};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_input(key(code)).unwrap()
    }

    fn no_hidden() -> OrganizerConfig {
        OrganizerConfig { hidden_columns: Vec::new(), ..OrganizerConfig::default() }
    }

    /// Move the cursor onto a column by ID
    fn focus(app: &mut App, id: &str) {
        let col = app.visible_columns().iter().position(|c| c.id == id).unwrap();
        app.cursor.col = col;
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(sample_vault(1), &no_hidden());
        assert!(!press(&mut app, KeyCode::Down));
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app
            .handle_input(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap());
    }

    #[test]
    fn test_switch_tables() {
        let mut app = App::new(sample_vault(1), &no_hidden());
        assert_eq!(app.items_type(), ItemsType::Weapon);
        assert!(app.row_items().iter().all(|i| i.items_type == ItemsType::Weapon));

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.items_type(), ItemsType::Armor);
        assert!(app.visible_columns().iter().any(|c| c.id == "energy"));

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.version(), SchemaVersion::V1);
        assert!(app.row_items().iter().all(|i| i.version() == SchemaVersion::V1));
        assert!(app.visible_columns().iter().any(|c| c.id == "quality"));
    }

    #[test]
    fn test_sort_key_toggles() {
        let mut app = App::new(sample_vault(2), &no_hidden());
        focus(&mut app, "power");
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.sort_state().column_id, "power");

        let powers: Vec<u32> = app.row_items().iter().map(|i| i.power).collect();
        assert!(powers.windows(2).all(|w| w[0] >= w[1]));

        press(&mut app, KeyCode::Char('s'));
        let powers: Vec<u32> = app.row_items().iter().map(|i| i.power).collect();
        assert!(powers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_hide_group() {
        let mut app = App::new(sample_vault(3), &no_hidden());
        focus(&mut app, "stat4043523819");
        press(&mut app, KeyCode::Char('h'));
        assert!(!app.visible_columns().iter().any(|c| c.selection_id() == "stats"));
        assert_eq!(app.config(&OrganizerConfig::default()).hidden_columns, vec!["stats"]);

        press(&mut app, KeyCode::Char('H'));
        assert!(app.visible_columns().iter().any(|c| c.selection_id() == "stats"));
    }

    #[test]
    fn test_filter_key_sets_status() {
        let mut app = App::new(sample_vault(4), &no_hidden());
        focus(&mut app, "name");
        press(&mut app, KeyCode::Char('f'));
        assert!(app.status().starts_with("name:"));

        focus(&mut app, "recency");
        press(&mut app, KeyCode::Char('f'));
        assert!(app.status().starts_with("No filter"));
    }

    #[test]
    fn test_enter_picks_plugs() {
        let mut vault = VaultData::default();
        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.sockets = vec![Socket::perk(
            1,
            vec![
                Plug::new(20, "Outlaw", PlugCategory::Trait),
                Plug::new(21, "Rapid Hit", PlugCategory::Trait),
            ],
        )];
        vault.items.push(item);

        let mut app = App::new(vault, &no_hidden());
        focus(&mut app, "perks");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.vault.items[0].sockets[0].plugged, Some(0));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.vault.items[0].sockets[0].plugged, Some(1));
        assert_eq!(app.status(), "Fatebringer: Rapid Hit");

        focus(&mut app, "name");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status(), "Nothing to pick here");
    }
}
