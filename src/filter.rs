//! Row selection over a normalized [`Table`].
//!
//! A [`Selection`] maps dimension columns to the values accepted for them.
//! A row passes when, for every dimension, its value is one of the accepted
//! values. Rows keep their input order.
//!
//! [`RowPredicate`] is the per-row test used by the aggregation engine for
//! thresholds such as `aggregate_rating > 4` and for case-insensitive
//! substring matches.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use crate::{
    data::Value,
    dataset::{Row, Table},
    error::AnalysisError,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    dimensions: BTreeMap<String, BTreeSet<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the accepted values for `dimension`.
    pub fn with<I, S>(mut self, dimension: &str, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.insert(dimension, accepted);
        self
    }

    pub fn insert<I, S>(&mut self, dimension: &str, accepted: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.dimensions.insert(
            dimension.to_string(),
            accepted.into_iter().map(|v| v.to_string()).collect(),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    pub fn dimensions(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.dimensions
            .iter()
            .map(|(name, accepted)| (name.as_str(), accepted))
    }
}

/// Returns the rows of `table` accepted by every dimension of `selection`.
/// A dimension with an empty accepted set admits no rows; an unknown
/// dimension column is an error. Numeric dimensions compare by value, so
/// `4`, `4.0` and `4.00` all accept a rating of 4.
pub fn apply(table: &Table, selection: &Selection) -> Result<Table, AnalysisError> {
    let mut bound = Vec::with_capacity(selection.dimensions.len());
    for (dimension, accepted) in selection.dimensions() {
        let idx = table.require_column(dimension)?;
        if accepted.is_empty() {
            warn!("Filter on '{dimension}' has no accepted values; no rows will match");
        } else {
            debug!("Filtering '{dimension}' to {} value(s)", accepted.len());
        }
        let numeric = table
            .column_type(dimension)
            .is_some_and(|ty| ty.is_numeric());
        let accepted = if numeric {
            Accepted::Numbers(
                accepted
                    .iter()
                    .filter_map(|value| value.trim().parse::<f64>().ok())
                    .collect(),
            )
        } else {
            Accepted::Text(accepted)
        };
        bound.push((idx, accepted));
    }

    let rows = table
        .rows()
        .iter()
        .filter(|row| {
            bound.iter().all(|(idx, accepted)| {
                row[*idx]
                    .as_ref()
                    .is_some_and(|value| accepted.admits(value))
            })
        })
        .cloned()
        .collect::<Vec<_>>();
    debug!("Selection kept {} of {} row(s)", rows.len(), table.len());
    Ok(table.with_rows(rows))
}

enum Accepted<'a> {
    Text(&'a BTreeSet<String>),
    Numbers(Vec<f64>),
}

impl Accepted<'_> {
    fn admits(&self, value: &Value) -> bool {
        match self {
            Accepted::Text(values) => values.contains(&value.as_display()),
            Accepted::Numbers(numbers) => value
                .as_f64()
                .is_some_and(|number| numbers.contains(&number)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOperator {
    fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperator::Eq => left == right,
            ComparisonOperator::NotEq => left != right,
            ComparisonOperator::Gt => left > right,
            ComparisonOperator::Ge => left >= right,
            ComparisonOperator::Lt => left < right,
            ComparisonOperator::Le => left <= right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowPredicate {
    Compare {
        column: String,
        operator: ComparisonOperator,
        threshold: f64,
    },
    /// Case-insensitive substring match on the cell's text.
    Contains { column: String, needle: String },
}

impl RowPredicate {
    pub fn compare(column: &str, operator: ComparisonOperator, threshold: f64) -> Self {
        RowPredicate::Compare {
            column: column.to_string(),
            operator,
            threshold,
        }
    }

    pub fn greater_than(column: &str, threshold: f64) -> Self {
        Self::compare(column, ComparisonOperator::Gt, threshold)
    }

    pub fn less_than(column: &str, threshold: f64) -> Self {
        Self::compare(column, ComparisonOperator::Lt, threshold)
    }

    pub fn contains(column: &str, needle: &str) -> Self {
        RowPredicate::Contains {
            column: column.to_string(),
            needle: needle.to_string(),
        }
    }

    /// Resolves the predicate's column against `table`.
    pub(crate) fn bind(&self, table: &Table) -> Result<BoundPredicate, AnalysisError> {
        match self {
            RowPredicate::Compare {
                column,
                operator,
                threshold,
            } => Ok(BoundPredicate::Compare {
                idx: table.require_numeric_column(column)?,
                operator: *operator,
                threshold: *threshold,
            }),
            RowPredicate::Contains { column, needle } => Ok(BoundPredicate::Contains {
                idx: table.require_column(column)?,
                needle: needle.to_lowercase(),
            }),
        }
    }
}

pub(crate) enum BoundPredicate {
    Compare {
        idx: usize,
        operator: ComparisonOperator,
        threshold: f64,
    },
    Contains {
        idx: usize,
        needle: String,
    },
}

impl BoundPredicate {
    /// Absent cells never match.
    pub(crate) fn matches(&self, row: &Row) -> bool {
        match self {
            BoundPredicate::Compare {
                idx,
                operator,
                threshold,
            } => row[*idx]
                .as_ref()
                .and_then(Value::as_f64)
                .is_some_and(|value| operator.holds(value, *threshold)),
            BoundPredicate::Contains { idx, needle } => row[*idx]
                .as_ref()
                .is_some_and(|value| value.as_display().to_lowercase().contains(needle.as_str())),
        }
    }
}
