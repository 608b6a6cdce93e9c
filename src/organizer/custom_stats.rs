//! User-defined stat totals
//!
//! A custom stat is a weighted sum of an armor piece's base stats, shown in
//! its own column next to the regular stats.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::items::{Item, StatHash};

use super::column::{ColumnDef, ColumnGroup, Header, SortDirection, Value};

/// Definition of a user-defined stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomStatDef {
    /// Hash the computed stat is stored under
    pub stat_hash: StatHash,
    pub label: String,
    /// Name used in `stat:` search filters
    pub short_label: String,
    /// Weight applied to each contributing base stat
    #[serde(default)]
    pub weights: BTreeMap<StatHash, f64>,
}

impl CustomStatDef {
    pub fn new(stat_hash: StatHash, label: impl Into<String>, short_label: impl Into<String>) -> Self {
        Self {
            stat_hash,
            label: label.into(),
            short_label: short_label.into(),
            weights: BTreeMap::new(),
        }
    }

    pub fn weight(mut self, stat_hash: StatHash, weight: f64) -> Self {
        self.weights.insert(stat_hash, weight);
        self
    }

    /// Value of this stat for an item: the precomputed stat when the item
    /// carries one, else the weighted sum of its base stats
    pub fn value_for(&self, item: &Item) -> i64 {
        if let Some(stat) = item.stat(self.stat_hash) {
            return stat.value as i64;
        }

        let total: f64 = self
            .weights
            .iter()
            .map(|(hash, weight)| item.stat(*hash).map(|s| s.base as f64 * weight).unwrap_or(0.0))
            .sum();
        total.round() as i64
    }
}

/// One column per custom stat, in definition order
pub fn create_custom_stat_columns(defs: &[CustomStatDef], group: &ColumnGroup) -> Vec<ColumnDef> {
    defs.iter()
        .map(|def| {
            let id = format!("customstat_{}{}", def.short_label, def.stat_hash);
            let header = Header::text(def.label.clone());
            let stat_hash = def.stat_hash;
            let short_label = def.short_label.clone();
            let def = def.clone();
            ColumnDef::new(id, header, move |item| Value::Int(def.value_for(item)))
                .group(group)
                .stat_hash(stat_hash)
                .default_sort(SortDirection::Desc)
                .filter(move |value, _| Some(format!("stat:{}:>={}", short_label, value)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{stats, ItemStat, ItemsType};

    fn pvp_def() -> CustomStatDef {
        CustomStatDef::new(1001, "PvP Total", "pvp")
            .weight(stats::MOBILITY, 1.0)
            .weight(stats::RECOVERY, 2.0)
    }

    #[test]
    fn test_weighted_sum() {
        let mut item = Item::new(1, "Helm", ItemsType::Armor);
        item.stats = vec![
            ItemStat::new(stats::MOBILITY, 12, 10),
            ItemStat::new(stats::RECOVERY, 22, 20),
            ItemStat::new(stats::INTELLECT, 30, 30),
        ];
        assert_eq!(pvp_def().value_for(&item), 50);

        // Missing stats contribute nothing
        let bare = Item::new(2, "Gloves", ItemsType::Armor);
        assert_eq!(pvp_def().value_for(&bare), 0);
    }

    #[test]
    fn test_precomputed_stat_wins() {
        let mut item = Item::new(1, "Helm", ItemsType::Armor);
        item.stats = vec![
            ItemStat::new(stats::MOBILITY, 12, 10),
            ItemStat::new(1001, 77, 77),
        ];
        assert_eq!(pvp_def().value_for(&item), 77);
    }

    #[test]
    fn test_columns() {
        let group = ColumnGroup::new("stats", "Stats");
        let columns = create_custom_stat_columns(&[pvp_def()], &group);
        assert_eq!(columns.len(), 1);

        let column = &columns[0];
        assert_eq!(column.id, "customstat_pvp1001");
        assert_eq!(column.selection_id(), "stats");
        assert_eq!(column.stat_hash, Some(1001));
        assert_eq!(column.default_sort, Some(SortDirection::Desc));

        let item = Item::new(1, "Helm", ItemsType::Armor);
        assert_eq!(
            column.filter_for(&Value::Int(40), &item).as_deref(),
            Some("stat:pvp:>=40")
        );
    }
}
