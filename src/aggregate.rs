//! Grouped summaries and top-N rankings over a (filtered) [`Table`].
//!
//! Groups are keyed by the display text of one or more columns and kept in
//! the order they are first seen. Rankings use a stable sort, so equal
//! metrics keep that first-seen order. Rows whose key has an absent
//! component belong to no group. `top == 0` means "no truncation".

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    columns,
    data::{Value, format_number},
    dataset::{Row, Table},
    error::AnalysisError,
    filter::RowPredicate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: Vec<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub group_by: Vec<String>,
    pub metric: String,
    pub rows: Vec<GroupRow>,
}

impl Aggregation {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value_of(&self, key: &[&str]) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.key.iter().map(String::as_str).eq(key.iter().copied()))
            .map(|row| row.value)
    }

    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.group_by.clone();
        headers.push(self.metric.clone());
        headers
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = row.key.clone();
                cells.push(format_number(row.value));
                cells
            })
            .collect()
    }
}

/// Group accumulator preserving first-seen key order.
struct Groups<A> {
    index: HashMap<Vec<String>, usize>,
    entries: Vec<(Vec<String>, A)>,
}

impl<A> Groups<A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: Vec<String>, init: impl FnOnce() -> A) -> &mut A {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, init()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot].1
    }
}

fn key_indices(table: &Table, keys: &[&str]) -> Result<Vec<usize>, AnalysisError> {
    if keys.is_empty() {
        return Err(AnalysisError::EmptyGroupKeys);
    }
    keys.iter().map(|key| table.require_column(key)).collect()
}

fn group_key(row: &Row, indices: &[usize]) -> Option<Vec<String>> {
    indices
        .iter()
        .map(|&idx| row[idx].as_ref().map(Value::as_display))
        .collect()
}

fn rank(mut rows: Vec<GroupRow>, order: SortOrder, top: usize) -> Vec<GroupRow> {
    match order {
        SortOrder::Descending => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => rows.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    if top > 0 {
        rows.truncate(top);
    }
    rows
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

/// Rows per group, largest first.
pub fn count_by(table: &Table, keys: &[&str], top: usize) -> Result<Aggregation, AnalysisError> {
    count_rows(table, keys, None, top)
}

/// Rows per group counting only rows that satisfy `predicate`. Groups with
/// no matching row are not reported.
pub fn count_by_where(
    table: &Table,
    keys: &[&str],
    predicate: &RowPredicate,
    top: usize,
) -> Result<Aggregation, AnalysisError> {
    count_rows(table, keys, Some(predicate), top)
}

fn count_rows(
    table: &Table,
    keys: &[&str],
    predicate: Option<&RowPredicate>,
    top: usize,
) -> Result<Aggregation, AnalysisError> {
    let indices = key_indices(table, keys)?;
    let predicate = predicate.map(|p| p.bind(table)).transpose()?;

    let mut groups = Groups::new();
    for row in table.rows() {
        if predicate.as_ref().is_some_and(|p| !p.matches(row)) {
            continue;
        }
        if let Some(key) = group_key(row, &indices) {
            *groups.entry(key, || 0usize) += 1;
        }
    }
    let rows = groups
        .entries
        .into_iter()
        .map(|(key, count)| GroupRow {
            key,
            value: count as f64,
        })
        .collect();
    Ok(Aggregation {
        group_by: owned(keys),
        metric: "count".to_string(),
        rows: rank(rows, SortOrder::Descending, top),
    })
}

/// Mean of `column` per group. Absent values are skipped; a group with no
/// present value is left out rather than reported as NaN.
pub fn mean_by(
    table: &Table,
    key: &str,
    column: &str,
    order: SortOrder,
    top: usize,
) -> Result<Aggregation, AnalysisError> {
    let indices = key_indices(table, &[key])?;
    let value_idx = table.require_numeric_column(column)?;

    let mut groups = Groups::new();
    for row in table.rows() {
        let Some(group) = group_key(row, &indices) else {
            continue;
        };
        let (sum, count) = groups.entry(group, || (0.0f64, 0usize));
        if let Some(value) = row[value_idx].as_ref().and_then(Value::as_f64) {
            *sum += value;
            *count += 1;
        }
    }
    let rows = groups
        .entries
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(key, (sum, count))| GroupRow {
            key,
            value: sum / count as f64,
        })
        .collect();
    Ok(Aggregation {
        group_by: vec![key.to_string()],
        metric: format!("mean_{column}"),
        rows: rank(rows, order, top),
    })
}

/// Number of distinct present values of `target` per group, largest first.
pub fn distinct_count_by(
    table: &Table,
    keys: &[&str],
    target: &str,
    top: usize,
) -> Result<Aggregation, AnalysisError> {
    let indices = key_indices(table, keys)?;
    let target_idx = table.require_column(target)?;

    let mut groups = Groups::new();
    for row in table.rows() {
        let Some(key) = group_key(row, &indices) else {
            continue;
        };
        let seen = groups.entry(key, HashSet::new);
        if let Some(value) = &row[target_idx] {
            seen.insert(value.as_display());
        }
    }
    let rows = groups
        .entries
        .into_iter()
        .map(|(key, seen)| GroupRow {
            key,
            value: seen.len() as f64,
        })
        .collect();
    Ok(Aggregation {
        group_by: owned(keys),
        metric: format!("distinct_{target}"),
        rows: rank(rows, SortOrder::Descending, top),
    })
}

/// The `k` rows with the largest `column`, optionally restricted to rows
/// matching `only`. Absent values rank after every present value.
pub fn top_rows(
    table: &Table,
    column: &str,
    k: usize,
    only: Option<&RowPredicate>,
) -> Result<Table, AnalysisError> {
    let sort_idx = table.require_numeric_column(column)?;
    let only = only.map(|p| p.bind(table)).transpose()?;

    let mut candidates = table
        .rows()
        .iter()
        .filter(|row| only.as_ref().is_none_or(|p| p.matches(row)))
        .map(|row| (row[sort_idx].as_ref().and_then(Value::as_f64), row))
        .collect::<Vec<_>>();
    candidates.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    if k > 0 {
        candidates.truncate(k);
    }
    Ok(table.with_rows(candidates.into_iter().map(|(_, row)| row.clone()).collect()))
}

/// Sorted distinct present values of `column`, e.g. to offer filter choices.
pub fn distinct_values(table: &Table, column: &str) -> Result<Vec<String>, AnalysisError> {
    Ok(table
        .column_values(column)?
        .into_iter()
        .flatten()
        .map(Value::as_display)
        .sorted()
        .dedup()
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub restaurants: usize,
    pub countries: usize,
    pub cities: usize,
    pub votes: i64,
    pub cuisines: usize,
}

/// Headline counts. Missing optional columns count as zero; restaurants
/// fall back to the row count when there is no id column.
pub fn summarize(table: &Table) -> DatasetSummary {
    let distinct = |column: &str| -> usize {
        table
            .column_values(column)
            .map(|values| {
                values
                    .into_iter()
                    .flatten()
                    .map(Value::as_display)
                    .collect::<HashSet<_>>()
                    .len()
            })
            .unwrap_or(0)
    };
    let votes = table
        .column_values(columns::VOTES)
        .map(|values| values.into_iter().flatten().filter_map(Value::as_i64).sum::<i64>())
        .unwrap_or(0);
    DatasetSummary {
        restaurants: if table.has_column(columns::RESTAURANT_ID) {
            distinct(columns::RESTAURANT_ID)
        } else {
            table.len()
        },
        countries: distinct(columns::COUNTRY_CODE),
        cities: distinct(columns::CITY),
        votes,
        cuisines: distinct(columns::CUISINES),
    }
}
