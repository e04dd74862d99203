//! The analytical questions asked of the dataset, one function per view.
//!
//! Each view is a fixed composition of [`aggregate`] calls over an already
//! filtered table; callers render whatever comes back.

use crate::{
    aggregate::{self, Aggregation, SortOrder},
    columns::{AGGREGATE_RATING, CITY, COUNTRY, CUISINES, RESTAURANT_ID, RESTAURANT_NAME, VOTES},
    dataset::Table,
    error::AnalysisError,
    filter::RowPredicate,
};

pub const HIGH_RATING_THRESHOLD: f64 = 4.0;
pub const LOW_RATING_THRESHOLD: f64 = 2.5;
pub const DEFAULT_HIGHLIGHT: &str = "italian";
pub const DEFAULT_HIGHLIGHT_COUNT: usize = 5;
pub const DEFAULT_RESTAURANT_COUNT: usize = 10;

/// Columns shown for restaurant rankings.
pub const RESTAURANT_COLUMNS: &[&str] = &[RESTAURANT_NAME, CITY, COUNTRY, AGGREGATE_RATING, CUISINES];

pub fn cities_per_country(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::distinct_count_by(table, &[COUNTRY], CITY, top)
}

pub fn restaurants_per_country(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::distinct_count_by(table, &[COUNTRY], RESTAURANT_ID, top)
}

pub fn mean_votes_per_country(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::mean_by(table, COUNTRY, VOTES, SortOrder::Descending, top)
}

pub fn mean_rating_per_country(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::mean_by(table, COUNTRY, AGGREGATE_RATING, SortOrder::Descending, top)
}

pub fn restaurants_per_city(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::count_by(table, &[CITY, COUNTRY], top)
}

pub fn highly_rated_cities(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    let predicate = RowPredicate::greater_than(AGGREGATE_RATING, HIGH_RATING_THRESHOLD);
    aggregate::count_by_where(table, &[CITY, COUNTRY], &predicate, top)
}

pub fn poorly_rated_cities(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    let predicate = RowPredicate::less_than(AGGREGATE_RATING, LOW_RATING_THRESHOLD);
    aggregate::count_by_where(table, &[CITY, COUNTRY], &predicate, top)
}

pub fn cuisine_variety_per_city(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::distinct_count_by(table, &[CITY, COUNTRY], CUISINES, top)
}

pub fn best_cuisines(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::mean_by(table, CUISINES, AGGREGATE_RATING, SortOrder::Descending, top)
}

pub fn worst_cuisines(table: &Table, top: usize) -> Result<Aggregation, AnalysisError> {
    aggregate::mean_by(table, CUISINES, AGGREGATE_RATING, SortOrder::Ascending, top)
}

pub fn top_restaurants(table: &Table, k: usize) -> Result<Table, AnalysisError> {
    aggregate::top_rows(table, AGGREGATE_RATING, k, None)?.select(RESTAURANT_COLUMNS)
}

/// Best-rated restaurants whose cuisine contains `needle`, ignoring case.
pub fn cuisine_highlights(table: &Table, needle: &str, k: usize) -> Result<Table, AnalysisError> {
    let predicate = RowPredicate::contains(CUISINES, needle);
    aggregate::top_rows(table, AGGREGATE_RATING, k, Some(&predicate))?.select(RESTAURANT_COLUMNS)
}
