//! Ordered categorical labels for group columns.
//!
//! Used to control stacking and legend order in downstream charts, e.g.
//! cantons ranked by mean cumulative deaths.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::DailyTable;
use crate::error::ResampleError;

/// An explicit label order plus a label -> rank lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOrder {
    labels: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl CategoryOrder {
    /// Build from labels in rank order (later duplicates are ignored).
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut order = Self::default();
        for label in labels {
            let label = label.into();
            if order.ranks.contains_key(&label) {
                continue;
            }
            order.ranks.insert(label.clone(), order.labels.len());
            order.labels.push(label);
        }
        order
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rank(&self, label: &str) -> Option<usize> {
        self.ranks.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.labels.iter().rev().cloned())
    }
}

/// A column of labels coded against a `CategoryOrder`.
///
/// Values that are not part of the order have no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCategorical {
    pub order: CategoryOrder,
    pub codes: Vec<Option<usize>>,
}

impl OrderedCategorical {
    pub fn label(&self, idx: usize) -> Option<&str> {
        let code = (*self.codes.get(idx)?)?;
        self.order.labels.get(code).map(String::as_str)
    }

    pub fn categories(&self) -> &[String] {
        self.order.labels()
    }
}

/// Re-label `values` as an ordered categorical following `order`.
///
/// `reverse` flips the order before applying it.
pub fn order_categories<S: AsRef<str>>(values: &[S], order: &CategoryOrder, reverse: bool) -> OrderedCategorical {
    let order = if reverse { order.reversed() } else { order.clone() };
    let codes = values.iter().map(|v| order.rank(v.as_ref())).collect();
    OrderedCategorical { order, codes }
}

/// A group together with the mean of the ranked field.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRank {
    pub group: String,
    pub mean: f64,
}

/// Rank the groups of a resampled table by the mean of `field` over all days.
///
/// Ties keep the table's group order.
pub fn rank_groups_by_mean(table: &DailyTable, field: &str, descending: bool) -> Result<Vec<GroupRank>, ResampleError> {
    let fi = table
        .field_index(field)
        .ok_or_else(|| ResampleError::UnknownField {
            field: field.to_string(),
            available: table.fields.clone(),
        })?;

    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for row in &table.rows {
        let entry = sums.entry(row.group.as_str()).or_insert((0.0, 0));
        entry.0 += row.values[fi];
        entry.1 += 1;
    }

    let mut ranked: Vec<GroupRank> = table
        .groups
        .iter()
        .map(|g| {
            let (sum, n) = sums.get(g.as_str()).copied().unwrap_or((0.0, 0));
            GroupRank {
                group: g.clone(),
                mean: if n == 0 { 0.0 } else { sum / n as f64 },
            }
        })
        .collect();

    // Stable sort keeps group order on ties.
    ranked.sort_by(|a, b| {
        let ord = a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal);
        if descending { ord.reverse() } else { ord }
    });

    Ok(ranked)
}

/// `CategoryOrder` over the result of `rank_groups_by_mean`.
pub fn order_by_mean(table: &DailyTable, field: &str, descending: bool) -> Result<CategoryOrder, ResampleError> {
    let ranked = rank_groups_by_mean(table, field, descending)?;
    Ok(CategoryOrder::new(ranked.into_iter().map(|r| r.group)))
}

impl DailyTable {
    /// Re-sort rows by date, then by rank in `order`.
    ///
    /// Groups not in `order` follow the ranked ones in their current order.
    pub fn reorder_groups(&mut self, order: &CategoryOrder) {
        let current: HashMap<String, usize> = self
            .groups
            .iter()
            .enumerate()
            .map(|(i, g)| (g.clone(), i))
            .collect();
        let key = |g: &str| -> (usize, usize) {
            match order.rank(g) {
                Some(r) => (0, r),
                None => (1, current.get(g).copied().unwrap_or(usize::MAX)),
            }
        };

        self.groups.sort_by_key(|g| key(g));
        self.rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| key(&a.group).cmp(&key(&b.group))));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordTable, ResampleConfig};
    use crate::resample::resample_daily;

    #[test]
    fn reverse_flips_the_given_ranking() {
        let values = ["A", "B", "C"];
        let ranking = CategoryOrder::new(["B", "C", "A"]);

        let forward = order_categories(&values, &ranking, false);
        assert_eq!(forward.categories(), &["B", "C", "A"]);
        assert_eq!(forward.codes, vec![Some(2), Some(0), Some(1)]);

        let reversed = order_categories(&values, &ranking, true);
        assert_eq!(reversed.categories(), &["A", "C", "B"]);
        assert_eq!(reversed.codes, vec![Some(0), Some(2), Some(1)]);
        assert_eq!(reversed.label(1), Some("B"));
    }

    #[test]
    fn unknown_labels_have_no_code() {
        let ranking = CategoryOrder::new(["ZH", "BE"]);
        let out = order_categories(&["BE", "FL"], &ranking, false);
        assert_eq!(out.codes, vec![Some(1), None]);
        assert_eq!(out.label(1), None);
    }

    fn deaths_table() -> DailyTable {
        let table = RecordTable::from_rows(
            ["date", "canton", "ncumul_deceased"],
            [
                ["2020-03-01", "AG", "1"],
                ["2020-03-02", "AG", "1"],
                ["2020-03-01", "TI", "5"],
                ["2020-03-02", "TI", "9"],
                ["2020-03-01", "ZH", "2"],
            ],
        );
        resample_daily(&table, &ResampleConfig::new("date", "canton", ["ncumul_deceased"])).unwrap()
    }

    #[test]
    fn groups_rank_by_mean_descending() {
        let ranked = rank_groups_by_mean(&deaths_table(), "ncumul_deceased", true).unwrap();
        let groups: Vec<&str> = ranked.iter().map(|r| r.group.as_str()).collect();
        assert_eq!(groups, vec!["TI", "ZH", "AG"]);
        assert_eq!(ranked[0].mean, 7.0);
    }

    #[test]
    fn ranking_needs_a_resampled_field() {
        let err = rank_groups_by_mean(&deaths_table(), "ncumul_conf", true).unwrap_err();
        assert!(matches!(err, ResampleError::UnknownField { .. }));
        assert_eq!(err.to_string(), "`ncumul_conf` is not a resampled field (have: [ncumul_deceased])");
    }

    #[test]
    fn reorder_groups_sorts_rows_within_each_date() {
        let mut table = deaths_table();
        let order = order_by_mean(&table, "ncumul_deceased", true).unwrap().reversed();
        table.reorder_groups(&order);

        assert_eq!(table.groups, vec!["AG", "ZH", "TI"]);
        let first_day: Vec<&str> = table.rows.iter().take(3).map(|r| r.group.as_str()).collect();
        assert_eq!(first_day, vec!["AG", "ZH", "TI"]);
    }
}
