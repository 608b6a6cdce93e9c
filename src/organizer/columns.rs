//! The item table's columns
//!
//! `build_columns` turns a display context (which items, which stats, the
//! user's tags, notes, wishlists and loadouts, the schema version) into the
//! ordered list of columns the table shows. It is a pure function: it only
//! wires the lookups it is given into column closures.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::i18n::Strings;
use crate::items::annotations::tag_sort_order;
use crate::items::sockets::{archetype_socket, intrinsic_sockets, perk_string, sockets_for};
use crate::items::stats::{self, stat_filter_name, stat_label_key, stat_sort_order, recoil_value};
use crate::items::{
    Item, ItemId, ItemsType, Loadout, LoadoutsByItem, SchemaVersion, Socket, SocketFilter, StatHash,
    StatInfo, Store, TagValue, WishListRoll,
};
use crate::search::quote_filter_string;

use super::cells;
use super::column::{
    compare_by, Cell, ColumnDef, ColumnGroup, Header, PlugSelectedFn, SortDirection, Value,
};
use super::custom_stats::{create_custom_stat_columns, CustomStatDef};

pub type TagFn = Rc<dyn Fn(&Item) -> Option<TagValue>>;
pub type NotesFn = Rc<dyn Fn(&Item) -> Option<String>>;
pub type WishListFn = Rc<dyn Fn(&Item) -> Option<WishListRoll>>;

/// Width hint for free-text columns
const WIDE_COLUMN: &str = "minmax(200px, 1fr)";

/// Everything the column builder needs to know about the table it builds for
#[derive(Clone)]
pub struct ColumnInputs {
    pub items_type: ItemsType,
    /// Display metadata of every stat to show a column for
    pub stat_infos: BTreeMap<StatHash, StatInfo>,
    pub get_tag: TagFn,
    pub get_notes: NotesFn,
    pub wish_list: WishListFn,
    /// A wishlist is loaded, so its notes are worth a column
    pub has_wish_list: bool,
    pub custom_stat_defs: Vec<CustomStatDef>,
    pub loadouts_by_item: Rc<LoadoutsByItem>,
    pub new_items: Rc<HashSet<ItemId>>,
    pub stores: Rc<Vec<Store>>,
    pub version: SchemaVersion,
    /// Called when the user picks a plug in a perk cell
    pub on_plug_selected: Option<PlugSelectedFn>,
    pub strings: Rc<Strings>,
}

impl ColumnInputs {
    /// Inputs with no stats, annotations or loadouts
    pub fn new(items_type: ItemsType, version: SchemaVersion) -> Self {
        Self {
            items_type,
            stat_infos: BTreeMap::new(),
            get_tag: Rc::new(|_| None),
            get_notes: Rc::new(|_| None),
            wish_list: Rc::new(|_| None),
            has_wish_list: false,
            custom_stat_defs: Vec::new(),
            loadouts_by_item: Rc::new(LoadoutsByItem::new()),
            new_items: Rc::new(HashSet::new()),
            stores: Rc::new(Vec::new()),
            version,
            on_plug_selected: None,
            strings: Rc::new(Strings::default()),
        }
    }
}

/// Compare comma-separated perk lists segment by segment; the first
/// differing segment decides
pub fn compare_perk_strings(a: &str, b: &str) -> Ordering {
    a.split(',')
        .zip(b.split(','))
        .map(|(a, b)| a.cmp(b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Comparator for perk-string columns; missing values compare as empty
pub fn perk_string_sort(a: &Value, b: &Value) -> Ordering {
    compare_perk_strings(a.as_text().unwrap_or(""), b.as_text().unwrap_or(""))
}

/// Sort key for the loadouts column: loadout count, zero-padded so plain
/// string comparison orders by count first, then the sorted loadout names
pub fn loadouts_sort_key(loadouts: &[Loadout]) -> Option<String> {
    if loadouts.is_empty() {
        return None;
    }
    let mut names: Vec<&str> = loadouts.iter().map(|l| l.name.as_str()).collect();
    names.sort_unstable();
    // 99999 loadouts ought to be enough for anyone
    Some(format!("{:05}:{}", loadouts.len(), names.join(",")))
}

fn exact_perk_filter(value: &Value, _item: &Item) -> Option<String> {
    match value.as_text() {
        Some(perks) if !perks.is_empty() => Some(format!("exactperk:{}", quote_filter_string(perks))),
        _ => None,
    }
}

fn is_filter(flag: &str) -> impl Fn(&Value, &Item) -> Option<String> {
    let flag = flag.to_string();
    move |value, _| {
        let negate = if value.is_truthy() { "" } else { "-" };
        Some(format!("{}is:{}", negate, flag))
    }
}

fn at_least_filter(keyword: &str) -> impl Fn(&Value, &Item) -> Option<String> {
    let keyword = keyword.to_string();
    move |value, _| (!value.is_none()).then(|| format!("{}:>={}", keyword, value))
}

fn equals_filter(keyword: &str) -> impl Fn(&Value, &Item) -> Option<String> {
    let keyword = keyword.to_string();
    move |value, _| (!value.is_none()).then(|| format!("{}:{}", keyword, value))
}

fn text_filter(keyword: &str) -> impl Fn(&Value, &Item) -> Option<String> {
    let keyword = keyword.to_string();
    move |value, _| match value.as_text() {
        Some(text) if !text.is_empty() => Some(format!("{}:{}", keyword, quote_filter_string(text))),
        _ => None,
    }
}

/// Stat value as the stat columns sort it
fn stat_sort_value(stat_hash: StatHash, raw: Option<i32>) -> Value {
    match raw {
        Some(value) if stat_hash == stats::RECOIL_DIRECTION => Value::Float(recoil_value(value)),
        Some(value) => Value::Int(value as i64),
        None => Value::Int(0),
    }
}

fn stat_header(stat_hash: StatHash, info: &StatInfo, strings: &Strings) -> Header {
    if let Some(icon) = &info.icon {
        return Header::icon(icon.clone(), info.name.clone());
    }
    match stat_label_key(stat_hash) {
        Some(key) => Header::text(strings.t(key)),
        None => Header::text(info.name.clone()),
    }
}

/// One column per stat, minus stats covered by a custom stat column, in
/// canonical stat order
fn stat_columns(inputs: &ColumnInputs, group: &ColumnGroup) -> Vec<ColumnDef> {
    let custom_stat_hashes: HashSet<StatHash> =
        inputs.custom_stat_defs.iter().map(|c| c.stat_hash).collect();

    let mut stat_hashes: Vec<StatHash> = inputs
        .stat_infos
        .keys()
        .copied()
        .filter(|hash| !custom_stat_hashes.contains(hash))
        .collect();
    stat_hashes.sort_by_key(|&hash| stat_sort_order(hash));

    stat_hashes
        .into_iter()
        .map(|stat_hash| {
            let info = &inputs.stat_infos[&stat_hash];
            let filter_name = stat_filter_name(stat_hash);
            ColumnDef::new(
                format!("stat{}", stat_hash),
                stat_header(stat_hash, info, &inputs.strings),
                move |item| stat_sort_value(stat_hash, item.stat(stat_hash).map(|s| s.value)),
            )
            .stat_hash(stat_hash)
            .group(group)
            .cell(move |_, item| item.stat(stat_hash).map(|stat| cells::stat_cell(stat, false)))
            .default_sort(if info.lower_better { SortDirection::Asc } else { SortDirection::Desc })
            .filter(move |value, item| {
                let name = filter_name?;
                let op = if name == "rof" { "=" } else { ">=" };
                // Recoil sorts on a normalized score; filter on the raw stat
                let shown = if stat_hash == stats::RECOIL_DIRECTION {
                    item.stat(stat_hash)?.value.to_string()
                } else {
                    value.to_string()
                };
                Some(format!("stat:{}:{}{}", name, op, shown))
            })
        })
        .collect()
}

/// Base-roll mirror of each stat column
fn base_stat_columns(stat_columns: &[ColumnDef], group: &ColumnGroup) -> Vec<ColumnDef> {
    stat_columns
        .iter()
        .filter_map(|column| {
            let stat_hash = column.stat_hash?;
            let filter_name = stat_filter_name(stat_hash);
            Some(
                column
                    .clone()
                    .id(format!("base{}", stat_hash))
                    .group(group)
                    .value(move |item| stat_sort_value(stat_hash, item.stat(stat_hash).map(|s| s.base)))
                    .cell(move |_, item| item.stat(stat_hash).map(|stat| cells::stat_cell(stat, true)))
                    .filter(move |value, item| {
                        let name = filter_name?;
                        let shown = if stat_hash == stats::RECOIL_DIRECTION {
                            item.stat(stat_hash)?.base.to_string()
                        } else {
                            value.to_string()
                        };
                        Some(format!("basestat:{}:>={}", name, shown))
                    }),
            )
        })
        .collect()
}

/// Per-stat roll quality of first-generation armor
fn stat_quality_columns(inputs: &ColumnInputs, group: &ColumnGroup) -> Vec<ColumnDef> {
    let mut stat_hashes: Vec<StatHash> = inputs.stat_infos.keys().copied().collect();
    stat_hashes.sort_by_key(|&hash| stat_sort_order(hash));

    stat_hashes
        .into_iter()
        .map(|stat_hash| {
            let info = &inputs.stat_infos[&stat_hash];
            ColumnDef::new(
                format!("quality_{}", stat_hash),
                Header::text(inputs.strings.t_with(
                    "Organizer.Columns.StatQualityStat",
                    &[("stat", info.name.as_str())],
                )),
                move |item| {
                    let pct = item
                        .stat_quality(stat_hash)
                        .filter(|q| q.scaled_min > 0)
                        .map(|q| (100.0 * q.scaled_min as f64 / q.split.max(1) as f64).round() as i64)
                        .unwrap_or(0);
                    Value::Int(pct)
                },
            )
            .stat_hash(stat_hash)
            .group(group)
            .cell(move |value, item| {
                let color_pct = item.stat_quality(stat_hash).map(|q| q.quality_min as i64).unwrap_or(0);
                Some(cells::quality_cell(value.as_int().unwrap_or(0), color_pct))
            })
        })
        .collect()
}

fn trait_sockets(item: &Item) -> Vec<&Socket> {
    sockets_for(item, SocketFilter::Traits)
}

fn origin_sockets(item: &Item) -> Vec<&Socket> {
    sockets_for(item, SocketFilter::Origin)
}

fn shader_sockets(item: &Item) -> Vec<&Socket> {
    sockets_for(item, SocketFilter::Shaders)
}

/// A perk-family column: value is the perk string, cells are pickable
fn perk_column(
    id: &str,
    header: String,
    sockets: fn(&Item) -> Vec<&Socket>,
    on_plug_selected: &Option<PlugSelectedFn>,
) -> ColumnDef {
    ColumnDef::new(id, Header::text(header), move |item| perk_string(&sockets(item)).into())
        .cell(move |_, item| cells::perks_cell(&sockets(item)))
        .sort(perk_string_sort)
        .filter(exact_perk_filter)
        .on_plug_selected(on_plug_selected.clone())
}

/// Perk names of an item, from sockets or a first-generation talent grid
fn general_perk_string(item: &Item) -> Option<String> {
    match item.talent_grid() {
        Some(grid) => {
            let names: Vec<&str> = grid
                .nodes
                .iter()
                .filter(|n| n.column > 0)
                .map(|n| n.name.as_str())
                .collect();
            (!names.is_empty()).then(|| names.join(","))
        }
        None => perk_string(&sockets_for(item, SocketFilter::All)),
    }
}

/// Build the item table's columns, in display order
pub fn build_columns(inputs: &ColumnInputs) -> Vec<ColumnDef> {
    let s = &inputs.strings;
    let is_weapon = inputs.items_type == ItemsType::Weapon;
    let is_armor = inputs.items_type == ItemsType::Armor;
    let is_ghost = inputs.items_type == ItemsType::Ghost;
    let v1 = inputs.version == SchemaVersion::V1;
    let v2 = inputs.version == SchemaVersion::V2;

    let stats_group = ColumnGroup::new("stats", s.t("Organizer.Columns.Stats"));
    let base_stats_group = ColumnGroup::new("baseStats", s.t("Organizer.Columns.BaseStats"));
    let stat_quality_group = ColumnGroup::new("statQuality", s.t("Organizer.Columns.StatQuality"));

    let stat_columns = stat_columns(inputs, &stats_group);
    let base_stat_columns = if v2 {
        base_stat_columns(&stat_columns, &base_stats_group)
    } else {
        Vec::new()
    };
    let stat_quality_columns = if v1 && is_armor {
        stat_quality_columns(inputs, &stat_quality_group)
    } else {
        Vec::new()
    };
    let custom_stat_columns = if v2 && is_armor {
        create_custom_stat_columns(&inputs.custom_stat_defs, &stats_group)
    } else {
        Vec::new()
    };

    let get_tag = inputs.get_tag.clone();
    let get_notes = inputs.get_notes.clone();
    let wish_list = inputs.wish_list.clone();
    let wish_list_notes = inputs.wish_list.clone();
    let new_items = inputs.new_items.clone();
    let loadouts_by_item = inputs.loadouts_by_item.clone();
    let loadouts_for_cell = inputs.loadouts_by_item.clone();
    let loadouts_for_filter = inputs.loadouts_by_item.clone();
    let stores = inputs.stores.clone();

    let leading = [
        Some(
            ColumnDef::new("icon", Header::text(s.t("Organizer.Columns.Icon")), |item| {
                item.icon.as_str().into()
            })
            .cell(|_, item| {
                let (r, g, b) = item.tier.color();
                let mut spans = vec![Span::styled("■", Style::default().fg(Color::Rgb(r, g, b)))];
                // Crafted weapons get the shaped overlay
                if item.crafted().is_some() {
                    spans.push(Span::styled("◈", Style::default().fg(Color::Rgb(255, 90, 60))));
                }
                Some(Cell::from_spans(spans))
            })
            .no_sort()
            .no_hide(),
        ),
        Some(
            ColumnDef::new("name", Header::text(s.t("Organizer.Columns.Name")), |item| {
                item.name.as_str().into()
            })
            .filter(text_filter("name")),
        ),
        (!is_ghost).then(|| {
            ColumnDef::new("power", Header::icon("✦", s.t("Organizer.Columns.Power")), |item| {
                item.power.into()
            })
            .dropdown_label(s.t("Organizer.Columns.Power"))
            .default_sort(SortDirection::Desc)
            .filter(at_least_filter("power"))
        }),
        is_weapon.then(|| {
            ColumnDef::new("dmg", Header::text(s.t("Organizer.Columns.Damage")), |item| {
                item.element.map(|e| e.name()).into()
            })
            .cell(|_, item| item.element.map(cells::element_cell))
            .filter(|_, item| item.element.map(|e| format!("is:{}", e.short_name())))
        }),
        ((is_armor || is_ghost) && v2).then(|| {
            ColumnDef::new("energy", Header::text(s.t("Organizer.Columns.Energy")), |item| {
                item.energy_capacity().into()
            })
            .default_sort(SortDirection::Desc)
            .filter(at_least_filter("energycapacity"))
        }),
        Some(
            ColumnDef::new("locked", Header::icon("🔒", s.t("Organizer.Columns.Locked")), |item| {
                item.locked.into()
            })
            .dropdown_label(s.t("Organizer.Columns.Locked"))
            .cell(|value, _| value.is_truthy().then(|| Cell::text("🔒")))
            .default_sort(SortDirection::Desc)
            .filter(is_filter("locked")),
        ),
        Some(
            ColumnDef::new("tag", Header::text(s.t("Organizer.Columns.Tag")), move |item| {
                get_tag(item).map(|t| t.name()).unwrap_or("").into()
            })
            .cell(|value, _| value.as_text().and_then(TagValue::from_name).map(cells::tag_cell))
            .sort(compare_by(|value: &Value| tag_sort_order(value.as_text().unwrap_or(""))))
            .filter(|value, _| {
                let tag = value.as_text().filter(|t| !t.is_empty()).unwrap_or("none");
                Some(format!("tag:{}", tag))
            }),
        ),
        Some(
            ColumnDef::new("new", Header::text(s.t("Organizer.Columns.New")), move |item| {
                new_items.contains(&item.id).into()
            })
            .cell(|value, _| {
                value
                    .is_truthy()
                    .then(|| Cell::styled("●", Style::default().fg(Color::Rgb(255, 220, 80))))
            })
            .default_sort(SortDirection::Desc)
            .filter(is_filter("new")),
        ),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("crafted", Header::text(s.t("Organizer.Columns.Crafted")), |item| {
                item.crafted().map(|c| c.crafted_date).into()
            })
            .cell(|value, _| match value {
                Value::Int(date) if *date != 0 => cells::crafted_date_cell(*date),
                _ => None,
            })
            .default_sort(SortDirection::Desc)
            .filter(is_filter("crafted"))
        }),
        // Present but blank; the value keeps a stable per-item order
        Some(
            ColumnDef::new("recency", Header::text(s.t("Organizer.Columns.Recency")), |item| {
                item.id.into()
            })
            .cell(|_, _| Some(Cell::default())),
        ),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("wishList", Header::text(s.t("Organizer.Columns.WishList")), move |item| {
                wish_list(item).map(|roll| !roll.is_undesirable).into()
            })
            .cell(|value, _| value.as_bool().map(cells::wish_list_cell))
            .sort(compare_by(|value: &Value| match value.as_bool() {
                None => 0,
                Some(true) => -1,
                Some(false) => 1,
            }))
            .filter(|value, _| {
                let filter = match value.as_bool() {
                    Some(true) => "is:wishlist",
                    Some(false) => "is:trashlist",
                    None => "-is:wishlist",
                };
                Some(filter.to_string())
            })
        }),
        Some(
            ColumnDef::new("tier", Header::text(s.t("Organizer.Columns.Tier")), |item| {
                item.tier.name().into()
            })
            .cell(|_, item| Some(cells::tier_cell(item.tier)))
            .filter(|_, item| Some(format!("is:{}", item.tier.filter_name()))),
        ),
        (v2 && is_armor).then(|| {
            ColumnDef::new("modslot", Header::text(s.t("Organizer.Columns.ModSlot")), |item| {
                let tags: Vec<&str> = item.mod_slots().iter().map(|m| m.slot_tag.as_str()).collect();
                (!tags.is_empty()).then(|| tags.join(",")).into()
            })
            .cell(|value, item| {
                value.as_text()?;
                let names: Vec<&str> = item.mod_slots().iter().map(|m| m.name.as_str()).collect();
                Some(Cell::text(names.join(", ")))
            })
            .filter(|value, _| {
                let tags = value.as_text()?;
                let filters: Vec<String> = tags.split(',').map(|m| format!("modslot:{}", m)).collect();
                Some(filters.join(" "))
            })
        }),
        v1.then(|| {
            ColumnDef::new(
                "percentComplete",
                Header::text(s.t("Organizer.Columns.PercentComplete")),
                |item| item.percent_complete().map(|p| p as f64).into(),
            )
            .cell(|value, _| match value {
                Value::Float(p) => Some(Cell::text(cells::percent(*p))),
                _ => None,
            })
            .filter(|value, _| match value {
                Value::Float(p) => Some(format!("percentage:>={}", (p * 100.0).floor() as i64)),
                _ => None,
            })
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("archetype", Header::text(s.t("Organizer.Columns.Archetype")), |item| {
                archetype_socket(item).and_then(|s| s.plugged()).map(|p| p.name.as_str()).into()
            })
            .cell(|_, item| {
                let plugged = archetype_socket(item)?.plugged()?;
                Some(Cell::styled(plugged.name.clone(), Style::default().add_modifier(Modifier::ITALIC)))
            })
            .filter(exact_perk_filter)
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("breaker", Header::text(s.t("Organizer.Columns.Breaker")), |item| {
                item.breaker().map(|b| b.name()).into()
            })
            .cell(|_, item| item.breaker().map(cells::breaker_cell))
            .filter(|_, item| item.breaker().map(|b| format!("breaker:{}", b.filter_name())))
        }),
        (v2 && is_armor).then(|| {
            perk_column(
                "intrinsics",
                s.t("Organizer.Columns.Intrinsics"),
                intrinsic_sockets,
                &inputs.on_plug_selected,
            )
        }),
        Some({
            let header = match (inputs.version, is_weapon) {
                (SchemaVersion::V2, true) => s.t("Organizer.Columns.OtherPerks"),
                (SchemaVersion::V2, false) => s.t("Organizer.Columns.PerksMods"),
                (SchemaVersion::V1, _) => s.t("Organizer.Columns.Perks"),
            };
            ColumnDef::new("perks", Header::text(header), |item| general_perk_string(item).into())
                .cell(|_, item| {
                    if item.talent_grid().is_some() {
                        cells::legacy_perks_cell(item)
                    } else {
                        cells::perks_cell(&sockets_for(item, SocketFilter::All))
                    }
                })
                .sort(perk_string_sort)
                .filter(exact_perk_filter)
                .on_plug_selected(inputs.on_plug_selected.clone())
        }),
        (v2 && is_weapon).then(|| {
            perk_column(
                "traits",
                s.t("Organizer.Columns.Traits"),
                trait_sockets,
                &inputs.on_plug_selected,
            )
        }),
        (v2 && is_weapon).then(|| {
            perk_column(
                "originTrait",
                s.t("Organizer.Columns.OriginTraits"),
                origin_sockets,
                &inputs.on_plug_selected,
            )
        }),
        v2.then(|| {
            perk_column(
                "shaders",
                s.t("Organizer.Columns.Shaders"),
                shader_sockets,
                &inputs.on_plug_selected,
            )
        }),
    ];

    let legacy_quality = (v1 && is_armor).then(|| {
        ColumnDef::new("quality", Header::text(s.t("Organizer.Columns.Quality")), |item| {
            Value::Int(item.quality().map(|q| q.min as i64).unwrap_or(0))
        })
        .cell(|value, _| {
            let pct = value.as_int().unwrap_or(0);
            Some(cells::quality_cell(pct, pct))
        })
        .filter(at_least_filter("quality"))
    });

    let trailing = [
        (v2 && is_weapon).then(|| {
            ColumnDef::new(
                "masterworkTier",
                Header::text(s.t("Organizer.Columns.MasterworkTier")),
                |item| item.masterwork().map(|m| m.tier).into(),
            )
            .default_sort(SortDirection::Desc)
            .filter(at_least_filter("masterwork"))
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new(
                "masterworkStat",
                Header::text(s.t("Organizer.Columns.MasterworkStat")),
                |item| item.masterwork().map(|m| m.stat_names_label()).into(),
            )
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("level", Header::text(s.t("Organizer.Columns.Level")), |item| {
                item.crafted().map(|c| c.level).into()
            })
            .default_sort(SortDirection::Desc)
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new(
                "harmonizable",
                Header::text(s.t("Organizer.Columns.Harmonizable")),
                |item| item.is_harmonizable().into(),
            )
            .cell(|value, _| {
                value
                    .is_truthy()
                    .then(|| Cell::styled("◈", Style::default().fg(Color::Rgb(255, 90, 60))))
            })
        }),
        (v2 && is_weapon).then(|| {
            ColumnDef::new("killTracker", Header::text(s.t("Organizer.Columns.KillTracker")), |item| {
                item.kill_tracker().map(|k| k.count).into()
            })
            .cell(|_, item| item.kill_tracker().map(cells::kill_tracker_cell))
            .default_sort(SortDirection::Desc)
        }),
        v2.then(|| {
            ColumnDef::new("source", Header::text(s.t("Organizer.Columns.Source")), |item| {
                item.source().into()
            })
            .filter(equals_filter("source"))
        }),
        Some(
            ColumnDef::new("year", Header::text(s.t("Organizer.Columns.Year")), |item| {
                item.year.into()
            })
            .filter(equals_filter("year")),
        ),
        v2.then(|| {
            ColumnDef::new("season", Header::text(s.t("Organizer.Columns.Season")), |item| {
                item.season().into()
            })
            .filter(equals_filter("season"))
        }),
        v2.then(|| {
            ColumnDef::new("event", Header::text(s.t("Organizer.Columns.Event")), |item| {
                item.event().map(|e| e.name()).into()
            })
            .filter(|_, item| item.event().map(|e| format!("event:{}", e.short_name())))
        }),
        Some(
            ColumnDef::new("location", Header::text(s.t("Organizer.Columns.Location")), |item| {
                item.owner.as_str().into()
            })
            .cell(move |_, item| {
                let store = stores.iter().find(|s| s.id == item.owner);
                Some(cells::location_cell(store, &item.owner))
            }),
        ),
        Some(
            ColumnDef::new("loadouts", Header::text(s.t("Organizer.Columns.Loadouts")), move |item| {
                loadouts_by_item
                    .get(&item.id)
                    .and_then(|loadouts| loadouts_sort_key(loadouts))
                    .into()
            })
            .cell(move |_, item| {
                loadouts_for_cell
                    .get(&item.id)
                    .and_then(|loadouts| cells::loadouts_cell(loadouts))
            })
            .filter(move |value, item| {
                let loadouts = loadouts_for_filter.get(&item.id)?;
                // A clicked loadout ID picks that loadout, otherwise the first by name
                let picked = value
                    .as_text()
                    .and_then(|id| loadouts.iter().find(|l| l.id == id))
                    .or_else(|| loadouts.iter().min_by(|a, b| a.name.cmp(&b.name)))?;
                Some(format!("inloadout:{}", quote_filter_string(&picked.name)))
            }),
        ),
        Some(
            ColumnDef::new("notes", Header::text(s.t("Organizer.Columns.Notes")), move |item| {
                get_notes(item).unwrap_or_default().into()
            })
            .cell(|value, _| {
                let notes = value.as_text().filter(|n| !n.is_empty())?;
                Some(Cell::styled(notes.to_string(), Style::default().add_modifier(Modifier::ITALIC)))
            })
            .grid_width(WIDE_COLUMN)
            .filter(text_filter("notes")),
        ),
        (is_weapon && inputs.has_wish_list).then(|| {
            ColumnDef::new(
                "wishListNote",
                Header::text(s.t("Organizer.Columns.WishListNotes")),
                move |item| {
                    wish_list_notes(item)
                        .and_then(|roll| roll.notes)
                        .map(|notes| notes.trim().to_string())
                        .unwrap_or_default()
                        .into()
                },
            )
            .grid_width(WIDE_COLUMN)
            .filter(text_filter("wishlistnotes"))
        }),
    ];

    let columns: Vec<ColumnDef> = leading
        .into_iter()
        .flatten()
        .chain(stat_columns)
        .chain(base_stat_columns)
        .chain(stat_quality_columns)
        .chain(legacy_quality)
        .chain(custom_stat_columns)
        .chain(trailing.into_iter().flatten())
        .collect();

    log::debug!(
        "Built {} columns for {:?} ({:?})",
        columns.len(),
        inputs.items_type,
        inputs.version
    );
    columns
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::items::{
        ItemDetails, ItemStat, LegacyDetails, ModernDetails, Plug, PlugCategory, QualityRange,
        Socket, StatQuality,
    };
    use crate::organizer::column::{PlugChoice, PlugSelection};

    fn ids(columns: &[ColumnDef]) -> Vec<&str> {
        columns.iter().map(|c| c.id.as_str()).collect()
    }

    fn column<'a>(columns: &'a [ColumnDef], id: &str) -> &'a ColumnDef {
        columns
            .iter()
            .find(|c| c.id == id)
            .unwrap_or_else(|| panic!("missing column {}", id))
    }

    fn rpm_inputs(items_type: ItemsType, version: SchemaVersion) -> ColumnInputs {
        let mut inputs = ColumnInputs::new(items_type, version);
        inputs.stat_infos.insert(stats::RPM, StatInfo::new("Rounds Per Minute"));
        inputs
    }

    fn full_inputs(items_type: ItemsType, version: SchemaVersion) -> ColumnInputs {
        let mut inputs = rpm_inputs(items_type, version);
        inputs.stat_infos.insert(stats::IMPACT, StatInfo::new("Impact"));
        inputs.stat_infos.insert(stats::RECOIL_DIRECTION, StatInfo::new("Recoil Direction"));
        inputs.stat_infos.insert(stats::MOBILITY, StatInfo::new("Mobility"));
        inputs.stat_infos.insert(1001, StatInfo::new("PvP Total"));
        inputs.custom_stat_defs = vec![CustomStatDef::new(1001, "PvP Total", "pvp")];
        inputs.has_wish_list = true;
        inputs
    }

    #[test]
    fn test_weapon_columns_in_order() {
        let columns = build_columns(&rpm_inputs(ItemsType::Weapon, SchemaVersion::V2));
        assert_eq!(
            ids(&columns),
            vec![
                "icon", "name", "power", "dmg", "locked", "tag", "new", "crafted", "recency",
                "wishList", "tier", "archetype", "breaker", "perks", "traits", "originTrait",
                "shaders", "stat4284893193", "base4284893193", "masterworkTier", "masterworkStat",
                "level", "harmonizable", "killTracker", "source", "year", "season", "event",
                "location", "loadouts", "notes",
            ]
        );
    }

    #[test]
    fn test_wish_list_notes_need_a_wish_list() {
        let mut inputs = rpm_inputs(ItemsType::Weapon, SchemaVersion::V2);
        inputs.has_wish_list = true;
        let columns = build_columns(&inputs);
        assert_eq!(ids(&columns).last(), Some(&"wishListNote"));

        inputs.items_type = ItemsType::Armor;
        assert!(!ids(&build_columns(&inputs)).contains(&"wishListNote"));
    }

    #[test]
    fn test_column_ids_unique() {
        for items_type in [ItemsType::Weapon, ItemsType::Armor, ItemsType::Ghost] {
            for version in [SchemaVersion::V1, SchemaVersion::V2] {
                let columns = build_columns(&full_inputs(items_type, version));
                let unique: HashSet<&str> = ids(&columns).into_iter().collect();
                assert_eq!(unique.len(), columns.len(), "{:?} {:?}", items_type, version);
            }
        }
    }

    #[test]
    fn test_version_gating() {
        let modern_only = [
            "energy", "crafted", "masterworkTier", "harmonizable", "killTracker", "source",
            "season", "event",
        ];
        for items_type in [ItemsType::Weapon, ItemsType::Armor, ItemsType::Ghost] {
            let v1 = build_columns(&full_inputs(items_type, SchemaVersion::V1));
            for id in modern_only {
                assert!(!ids(&v1).contains(&id), "{} present in V1 {:?}", id, items_type);
            }

            let v2 = build_columns(&full_inputs(items_type, SchemaVersion::V2));
            for column in &v2 {
                assert_ne!(column.id, "percentComplete");
                assert_ne!(column.id, "quality");
                assert!(!column.id.starts_with("quality_"));
            }
        }

        let legacy_armor = build_columns(&full_inputs(ItemsType::Armor, SchemaVersion::V1));
        let legacy_ids = ids(&legacy_armor);
        assert!(legacy_ids.contains(&"percentComplete"));
        assert!(legacy_ids.contains(&"quality"));
        assert!(legacy_ids.contains(&"quality_2996146975"));
        assert!(!legacy_ids.iter().any(|id| id.starts_with("base")));
    }

    #[test]
    fn test_ghost_gating() {
        let columns = build_columns(&full_inputs(ItemsType::Ghost, SchemaVersion::V2));
        let ids = ids(&columns);
        for id in [
            "power", "dmg", "archetype", "breaker", "traits", "originTrait", "masterworkTier",
            "killTracker", "modslot", "intrinsics", "wishListNote",
        ] {
            assert!(!ids.contains(&id), "{} present for ghosts", id);
        }
        // Energy is shared between armor and ghosts
        assert!(ids.contains(&"energy"));
    }

    #[test]
    fn test_custom_stats_replace_their_stat_column() {
        let columns = build_columns(&full_inputs(ItemsType::Armor, SchemaVersion::V2));
        let ids = ids(&columns);
        assert!(!ids.contains(&"stat1001"));

        let custom = ids.iter().position(|id| *id == "customstat_pvp1001").unwrap();
        let last_base = ids.iter().rposition(|id| id.starts_with("base")).unwrap();
        let source = ids.iter().position(|id| *id == "source").unwrap();
        assert!(last_base < custom && custom < source);

        // Weapons never get custom stat columns
        let weapon = build_columns(&full_inputs(ItemsType::Weapon, SchemaVersion::V2));
        assert!(!weapon.iter().any(|c| c.id.starts_with("customstat_")));
    }

    #[test]
    fn test_stat_columns_follow_stat_order() {
        let columns = build_columns(&full_inputs(ItemsType::Weapon, SchemaVersion::V2));
        let stat_ids: Vec<&str> = ids(&columns)
            .into_iter()
            .filter(|id| id.starts_with("stat"))
            .collect();
        assert_eq!(
            stat_ids,
            vec!["stat4284893193", "stat4043523819", "stat2715839340", "stat2996146975"]
        );
        assert_eq!(column(&columns, "stat4284893193").selection_id(), "stats");
        assert_eq!(column(&columns, "base4284893193").selection_id(), "baseStats");
    }

    #[test]
    fn test_missing_stat_is_zero() {
        let columns = build_columns(&full_inputs(ItemsType::Weapon, SchemaVersion::V2));
        let item = Item::new(1, "Bare", ItemsType::Weapon);
        for column in columns.iter().filter(|c| c.id.starts_with("stat") || c.id.starts_with("base")) {
            assert_eq!(column.value_of(&item), Value::Int(0), "{}", column.id);
            assert!(column.cell_for(&item).is_none(), "{}", column.id);
        }
    }

    #[test]
    fn test_stat_values_and_filters() {
        let columns = build_columns(&full_inputs(ItemsType::Weapon, SchemaVersion::V2));
        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.stats = vec![
            ItemStat::new(stats::RPM, 140, 140),
            ItemStat::new(stats::IMPACT, 84, 80),
            ItemStat::new(stats::RECOIL_DIRECTION, 75, 70),
        ];

        let rpm = column(&columns, "stat4284893193");
        let value = rpm.value_of(&item);
        assert_eq!(value, Value::Int(140));
        assert_eq!(rpm.filter_for(&value, &item).as_deref(), Some("stat:rof:=140"));
        assert_eq!(rpm.default_sort, Some(SortDirection::Desc));
        assert_eq!(rpm.header, Header::text("RPM"));

        let impact = column(&columns, "stat4043523819");
        assert_eq!(impact.filter_for(&Value::Int(84), &item).as_deref(), Some("stat:impact:>=84"));
        assert_eq!(impact.cell_for(&item).map(|c| c.plain()).as_deref(), Some("84 +4"));

        let base_impact = column(&columns, "base4043523819");
        assert_eq!(base_impact.value_of(&item), Value::Int(80));
        assert_eq!(
            base_impact.filter_for(&Value::Int(80), &item).as_deref(),
            Some("basestat:impact:>=80")
        );

        let recoil = column(&columns, "stat2715839340");
        assert_eq!(recoil.value_of(&item), Value::Float(recoil_value(75)));
        let value = recoil.value_of(&item);
        assert_eq!(recoil.filter_for(&value, &item).as_deref(), Some("stat:recoil:>=75"));
    }

    #[test]
    fn test_lower_better_sorts_ascending() {
        let mut inputs = ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2);
        let mut charge = StatInfo::new("Charge Time");
        charge.lower_better = true;
        inputs.stat_infos.insert(stats::CHARGE_TIME, charge);
        let columns = build_columns(&inputs);
        assert_eq!(column(&columns, "stat2961396640").default_sort, Some(SortDirection::Asc));
    }

    #[test]
    fn test_perk_string_sort() {
        let a_b = Value::from("a,b");
        let a_c = Value::from("a,c");
        assert_eq!(perk_string_sort(&a_b, &a_c), Ordering::Less);
        assert_eq!(perk_string_sort(&a_c, &a_b), Ordering::Greater);
        assert_eq!(perk_string_sort(&Value::from("x"), &Value::from("x")), Ordering::Equal);
        // A shared prefix is not an ordering
        assert_eq!(perk_string_sort(&Value::from("a"), &a_b), Ordering::Equal);
        assert_eq!(perk_string_sort(&Value::None, &Value::from("")), Ordering::Equal);
    }

    #[test]
    fn test_loadouts_sort_key() {
        let one = vec![Loadout::new("l1", "Zzz")];
        let three = vec![
            Loadout::new("l2", "Raid"),
            Loadout::new("l3", "Aaa"),
            Loadout::new("l4", "Trials"),
        ];
        let one_key = loadouts_sort_key(&one).unwrap();
        let three_key = loadouts_sort_key(&three).unwrap();
        assert_eq!(one_key, "00001:Zzz");
        assert_eq!(three_key, "00003:Aaa,Raid,Trials");
        assert!(one_key < three_key);
        assert_eq!(loadouts_sort_key(&[]), None);
    }

    #[test]
    fn test_loadouts_column() {
        let mut inputs = ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2);
        let mut by_item = HashMap::new();
        by_item.insert(1, vec![Loadout::new("l2", "Trials Week"), Loadout::new("l1", "Raid")]);
        inputs.loadouts_by_item = Rc::new(by_item);
        let columns = build_columns(&inputs);
        let loadouts = column(&columns, "loadouts");

        let item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        let value = loadouts.value_of(&item);
        assert_eq!(value, Value::from("00002:Raid,Trials Week"));
        assert_eq!(loadouts.filter_for(&value, &item).as_deref(), Some("inloadout:Raid"));
        assert_eq!(
            loadouts.filter_for(&Value::from("l2"), &item).as_deref(),
            Some("inloadout:\"Trials Week\"")
        );
        assert_eq!(loadouts.cell_for(&item).map(|c| c.plain()).as_deref(), Some("Raid, Trials Week"));

        let other = Item::new(2, "Other", ItemsType::Weapon);
        assert_eq!(loadouts.value_of(&other), Value::None);
        assert_eq!(loadouts.filter_for(&Value::None, &other), None);
    }

    #[test]
    fn test_annotation_columns() {
        let mut inputs = ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2);
        inputs.get_tag = Rc::new(|item: &Item| (item.id == 1).then_some(TagValue::Favorite));
        inputs.get_notes = Rc::new(|item: &Item| (item.id == 1).then(|| "god roll pvp".to_string()));
        inputs.wish_list = Rc::new(|item: &Item| match item.id {
            1 => Some(WishListRoll { is_undesirable: false, notes: Some("  outlaw + kill clip ".into()) }),
            2 => Some(WishListRoll { is_undesirable: true, notes: None }),
            _ => None,
        });
        inputs.has_wish_list = true;
        inputs.new_items = Rc::new([2].into_iter().collect());
        let columns = build_columns(&inputs);

        let tagged = Item::new(1, "Fatebringer", ItemsType::Weapon);
        let trash = Item::new(2, "Trash", ItemsType::Weapon);
        let unknown = Item::new(3, "Unknown", ItemsType::Weapon);

        let tag = column(&columns, "tag");
        assert_eq!(tag.value_of(&tagged), Value::from("favorite"));
        assert_eq!(tag.filter_for(&tag.value_of(&tagged), &tagged).as_deref(), Some("tag:favorite"));
        assert_eq!(tag.filter_for(&tag.value_of(&trash), &trash).as_deref(), Some("tag:none"));
        // Tagged items sort ahead of untagged ones
        assert_eq!(tag.compare(&tag.value_of(&tagged), &tag.value_of(&trash)), Ordering::Less);

        let wish = column(&columns, "wishList");
        let filters: Vec<Option<String>> = [&tagged, &trash, &unknown]
            .iter()
            .map(|item| wish.filter_for(&wish.value_of(item), item))
            .collect();
        assert_eq!(
            filters,
            vec![
                Some("is:wishlist".to_string()),
                Some("is:trashlist".to_string()),
                Some("-is:wishlist".to_string()),
            ]
        );
        // Wishlisted, then unknown, then trash
        let mut values = vec![wish.value_of(&trash), wish.value_of(&unknown), wish.value_of(&tagged)];
        values.sort_by(|a, b| wish.compare(a, b));
        assert_eq!(values, vec![Value::Bool(true), Value::None, Value::Bool(false)]);

        let notes = column(&columns, "notes");
        assert_eq!(
            notes.filter_for(&notes.value_of(&tagged), &tagged).as_deref(),
            Some("notes:\"god roll pvp\"")
        );
        assert_eq!(notes.filter_for(&notes.value_of(&trash), &trash), None);

        let wish_notes = column(&columns, "wishListNote");
        assert_eq!(wish_notes.value_of(&tagged), Value::from("outlaw + kill clip"));

        let new = column(&columns, "new");
        assert_eq!(new.filter_for(&new.value_of(&trash), &trash).as_deref(), Some("is:new"));
        assert_eq!(new.filter_for(&new.value_of(&tagged), &tagged).as_deref(), Some("-is:new"));
    }

    #[test]
    fn test_simple_filters() {
        let columns = build_columns(&ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2));
        let mut item = Item::new(1, "Ace of Spades", ItemsType::Weapon);
        item.power = 1810;
        item.locked = true;
        item.element = Some(crate::items::DamageType::Solar);
        item.year = Some(3);

        let filter = |id: &str| {
            let column = column(&columns, id);
            column.filter_for(&column.value_of(&item), &item)
        };
        assert_eq!(filter("name").as_deref(), Some("name:\"Ace of Spades\""));
        assert_eq!(filter("power").as_deref(), Some("power:>=1810"));
        assert_eq!(filter("dmg").as_deref(), Some("is:solar"));
        assert_eq!(filter("locked").as_deref(), Some("is:locked"));
        assert_eq!(filter("tier").as_deref(), Some("is:common"));
        assert_eq!(filter("year").as_deref(), Some("year:3"));
        assert_eq!(filter("crafted").as_deref(), Some("-is:crafted"));
        assert_eq!(filter("source"), None);
        assert_eq!(filter("breaker"), None);
    }

    #[test]
    fn test_recency_is_blank() {
        let columns = build_columns(&ColumnInputs::new(ItemsType::Armor, SchemaVersion::V2));
        let recency = column(&columns, "recency");
        let item = Item::new(42, "Helm", ItemsType::Armor);
        assert_eq!(recency.value_of(&item), Value::Int(42));
        assert!(recency.cell_for(&item).unwrap().is_blank());
        assert!(!recency.has_filter());
    }

    #[test]
    fn test_perk_columns() {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = picked.clone();
        let mut inputs = ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2);
        inputs.on_plug_selected = Some(Rc::new(move |selection: PlugSelection| sink.borrow_mut().push(selection)));
        let columns = build_columns(&inputs);

        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.sockets = vec![
            Socket::single(0, Plug::new(10, "Aggressive Frame", PlugCategory::Frame)),
            Socket::perk(1, vec![
                Plug::new(20, "Explosive Payload", PlugCategory::Trait),
                Plug::new(21, "Firefly", PlugCategory::Trait),
            ]),
            Socket::single(2, Plug::new(30, "Souldrinker", PlugCategory::OriginTrait)),
        ];

        let archetype = column(&columns, "archetype");
        assert_eq!(archetype.value_of(&item), Value::from("Aggressive Frame"));
        assert_eq!(
            archetype.filter_for(&archetype.value_of(&item), &item).as_deref(),
            Some("exactperk:\"Aggressive Frame\"")
        );

        let perks = column(&columns, "perks");
        assert_eq!(perks.value_of(&item), Value::from("Explosive Payload,Firefly"));
        let cell = perks.cell_for(&item).unwrap();
        assert_eq!(cell.choices.len(), 2);
        assert!(perks.select_plug(&item, cell.choices[1]));
        assert_eq!(picked.borrow()[0].plug_hash, 21);

        let traits = column(&columns, "traits");
        assert_eq!(traits.value_of(&item), Value::from("Aggressive Frame"));
        // Frames are not a choice
        assert!(!traits.select_plug(&item, PlugChoice { socket_index: 0, plug_hash: 10 }));

        let origin = column(&columns, "originTrait");
        assert_eq!(origin.value_of(&item), Value::from("Souldrinker"));

        let shaders = column(&columns, "shaders");
        assert_eq!(shaders.value_of(&item), Value::None);
        assert_eq!(shaders.filter_for(&Value::None, &item), None);
    }

    #[test]
    fn test_legacy_armor_columns() {
        let mut inputs = ColumnInputs::new(ItemsType::Armor, SchemaVersion::V1);
        inputs.stat_infos.insert(stats::INTELLECT, StatInfo::new("Intellect"));
        let columns = build_columns(&inputs);

        let mut item = Item::new_legacy(1, "Helm of Saint-14", ItemsType::Armor);
        item.details = ItemDetails::Legacy(LegacyDetails {
            percent_complete: 0.5,
            quality: Some(QualityRange { min: 92, max: 96 }),
            stat_quality: vec![StatQuality {
                stat_hash: stats::INTELLECT,
                scaled_min: 45,
                split: 60,
                quality_min: 88,
            }],
            talent_grid: None,
        });

        let quality = column(&columns, "quality_144602215");
        assert_eq!(quality.header, Header::text("Intellect Quality"));
        assert_eq!(quality.selection_id(), "statQuality");
        assert_eq!(quality.value_of(&item), Value::Int(75));
        assert_eq!(quality.cell_for(&item).map(|c| c.plain()).as_deref(), Some("75%"));

        let overall = column(&columns, "quality");
        assert_eq!(overall.value_of(&item), Value::Int(92));
        assert_eq!(overall.filter_for(&Value::Int(92), &item).as_deref(), Some("quality:>=92"));

        let percent = column(&columns, "percentComplete");
        assert_eq!(percent.cell_for(&item).map(|c| c.plain()).as_deref(), Some("50%"));
        assert_eq!(
            percent.filter_for(&percent.value_of(&item), &item).as_deref(),
            Some("percentage:>=50")
        );

        // Items without quality data degrade to zero
        let bare = Item::new_legacy(2, "Bare", ItemsType::Armor);
        assert_eq!(quality.value_of(&bare), Value::Int(0));
        assert_eq!(overall.value_of(&bare), Value::Int(0));
    }

    #[test]
    fn test_modern_weapon_columns() {
        let columns = build_columns(&ColumnInputs::new(ItemsType::Weapon, SchemaVersion::V2));
        let mut item = Item::new(1, "Fatebringer", ItemsType::Weapon);
        item.details = ItemDetails::Modern(ModernDetails {
            crafted: Some(crate::items::CraftedInfo { crafted_date: 1_700_000_000, level: 17 }),
            masterwork: Some(crate::items::MasterworkInfo {
                tier: 10,
                stat_names: vec!["Range".into()],
            }),
            breaker: Some(crate::items::BreakerType::ShieldPiercing),
            season: Some(20),
            event: Some(crate::items::GameEvent::Dawning),
            source: Some("raid".into()),
            ..ModernDetails::default()
        });

        let filter = |id: &str| {
            let column = column(&columns, id);
            column.filter_for(&column.value_of(&item), &item)
        };
        assert_eq!(filter("crafted").as_deref(), Some("is:crafted"));
        assert_eq!(filter("masterworkTier").as_deref(), Some("masterwork:>=10"));
        assert_eq!(filter("breaker").as_deref(), Some("breaker:anti-barrier"));
        assert_eq!(filter("season").as_deref(), Some("season:20"));
        assert_eq!(filter("event").as_deref(), Some("event:dawning"));
        assert_eq!(filter("source").as_deref(), Some("source:raid"));
        assert_eq!(column(&columns, "level").value_of(&item), Value::Int(17));
        assert_eq!(column(&columns, "masterworkStat").value_of(&item), Value::from("Range"));
    }

    #[test]
    fn test_legacy_items_in_modern_columns() {
        // A first-generation item never breaks a column; it just has no value
        let columns = build_columns(&full_inputs(ItemsType::Weapon, SchemaVersion::V2));
        let item = Item::new_legacy(1, "Thorn", ItemsType::Weapon);
        for column in &columns {
            let value = column.value_of(&item);
            let _ = column.cell_for(&item);
            let _ = column.filter_for(&value, &item);
        }
        assert_eq!(column(&columns, "crafted").value_of(&item), Value::None);
        assert_eq!(column(&columns, "killTracker").value_of(&item), Value::None);
    }
}
