//! Cell renderers for the item table

use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::items::{
    BreakerType, DamageType, Item, ItemStat, KillTracker, Loadout, Socket, Store, TagValue, Tier,
};

use super::column::{Cell, PlugChoice};

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Format a 0.0 - 1.0 fraction as a whole percentage, capped at 100%
pub fn percent(fraction: f64) -> String {
    let pct = (100.0 * fraction).floor().clamp(0.0, 100.0);
    format!("{}%", pct as i64)
}

/// Color scale for roll quality percentages
pub fn quality_color(pct: i64) -> Color {
    match pct {
        p if p <= 85 => Color::Rgb(210, 45, 45),
        p if p <= 90 => Color::Rgb(210, 100, 45),
        p if p <= 95 => Color::Rgb(210, 210, 45),
        p if p <= 99 => Color::Rgb(45, 210, 45),
        _ => Color::Rgb(45, 183, 210),
    }
}

/// Percentage colored by roll quality
pub fn quality_cell(value: i64, color_pct: i64) -> Cell {
    Cell::styled(format!("{}%", value), Style::default().fg(quality_color(color_pct)))
}

pub fn tier_cell(tier: Tier) -> Cell {
    Cell::styled(tier.name(), Style::default().fg(rgb(tier.color())))
}

pub fn element_cell(element: DamageType) -> Cell {
    Cell::styled(format!("● {}", element.name()), Style::default().fg(rgb(element.color())))
}

pub fn breaker_cell(breaker: BreakerType) -> Cell {
    Cell::styled(breaker.glyph().to_string(), Style::default().fg(Color::Rgb(255, 200, 80)))
}

pub fn tag_cell(tag: TagValue) -> Cell {
    Cell::styled(tag.glyph().to_string(), Style::default().fg(rgb(tag.color())))
}

pub fn wish_list_cell(wanted: bool) -> Cell {
    if wanted {
        Cell::styled("👍", Style::default().fg(Color::Rgb(100, 255, 100)))
    } else {
        Cell::styled("👎", Style::default().fg(Color::Rgb(255, 90, 90)))
    }
}

pub fn kill_tracker_cell(tracker: &KillTracker) -> Cell {
    Cell::from_spans(vec![
        Span::styled(tracker.kind.glyph().to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", tracker.count)),
    ])
}

/// Unix timestamp as a local-agnostic date and time
pub fn crafted_date_cell(crafted_date: i64) -> Option<Cell> {
    let date = chrono::DateTime::from_timestamp(crafted_date, 0)?;
    Some(Cell::text(date.format("%Y-%m-%d %H:%M").to_string()))
}

/// Stat value, with the bonus over the base roll highlighted
pub fn stat_cell(stat: &ItemStat, base_only: bool) -> Cell {
    if base_only {
        return Cell::text(stat.base.to_string());
    }

    let bonus = stat.value - stat.base;
    if bonus > 0 {
        Cell::from_spans(vec![
            Span::raw(stat.value.to_string()),
            Span::styled(format!(" +{}", bonus), Style::default().fg(Color::Rgb(255, 220, 80))),
        ])
    } else {
        Cell::text(stat.value.to_string())
    }
}

/// Plug options of each socket, sockets separated by bars.
///
/// The plugged option of a multi-option perk socket is highlighted, enhanced
/// perks are marked, and every option of a multi-option socket becomes a
/// pickable choice.
pub fn perks_cell(sockets: &[&Socket]) -> Option<Cell> {
    if sockets.is_empty() {
        return None;
    }

    let mut spans = Vec::new();
    let mut choices = Vec::new();

    for (i, socket) in sockets.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }

        let selectable = socket.plug_options.len() > 1;
        let perk_choice = socket.is_selectable();

        for (j, plug) in socket.plug_options.iter().enumerate() {
            if j > 0 {
                spans.push(Span::styled("/", Style::default().fg(Color::DarkGray)));
            }

            let mut style = Style::default();
            if perk_choice && socket.plugged == Some(j) {
                style = style.fg(Color::Rgb(120, 200, 255)).add_modifier(Modifier::BOLD);
            } else if selectable {
                style = style.fg(Color::Gray);
            }

            let name = if plug.enhanced {
                format!("⇑{}", plug.name)
            } else {
                plug.name.clone()
            };
            spans.push(Span::styled(name, style));

            if selectable {
                choices.push(PlugChoice { socket_index: socket.socket_index, plug_hash: plug.hash });
            }
        }
    }

    let mut cell = Cell::from_spans(spans);
    cell.choices = choices;
    Some(cell)
}

/// Talent grid of a first-generation item, one group per grid column
pub fn legacy_perks_cell(item: &Item) -> Option<Cell> {
    let grid = item.talent_grid()?;

    let mut columns: BTreeMap<u32, Vec<_>> = BTreeMap::new();
    for node in grid.nodes.iter().filter(|n| n.column > 0) {
        columns.entry(node.column).or_default().push(node);
    }
    if columns.is_empty() {
        return None;
    }

    let mut spans = Vec::new();
    for (i, nodes) in columns.values().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        let exclusive = nodes.len() > 1 && nodes[0].exclusive_in_column;
        for (j, node) in nodes.iter().enumerate() {
            if j > 0 {
                spans.push(Span::styled("/", Style::default().fg(Color::DarkGray)));
            }
            let style = if exclusive && node.unlocked {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(node.name.clone(), style));
            if node.in_progress() {
                spans.push(Span::styled(
                    format!(" ({})", percent(node.progress() as f64)),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }

    Some(Cell::from_spans(spans))
}

/// Names of the loadouts an item is in, sorted by name
pub fn loadouts_cell(loadouts: &[Loadout]) -> Option<Cell> {
    if loadouts.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Loadout> = loadouts.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut spans = Vec::new();
    for (i, loadout) in sorted.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        if loadout.in_game {
            spans.push(Span::styled("⌂ ", Style::default().fg(Color::Rgb(255, 200, 80))));
        }
        spans.push(Span::styled(loadout.name.clone(), Style::default().fg(Color::Rgb(150, 200, 255))));
    }
    Some(Cell::from_spans(spans))
}

/// The store holding an item; unknown stores show their raw ID
pub fn location_cell(store: Option<&Store>, owner: &str) -> Cell {
    match store {
        Some(store) => Cell::from_spans(vec![
            Span::styled(store.glyph.to_string(), Style::default().fg(Color::Rgb(255, 200, 80))),
            Span::raw(format!(" {}", store.class_name)),
        ]),
        None => Cell::text(owner.to_string()),
    }
}
