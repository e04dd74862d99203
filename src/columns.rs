//! Column identifier canonicalization.
//!
//! Raw labels such as `Country Code` or `Average Cost for two` become
//! `country_code` and `average_cost_for_two`. The transform title-cases every
//! word, drops the whitespace between them and then snake-cases the result, so
//! labels that are already canonical come back unchanged.

use std::borrow::Cow;

use heck::{ToSnakeCase, ToTitleCase};

pub const COUNTRY_CODE: &str = "country_code";
pub const COUNTRY: &str = "country";
pub const PRICE_RANGE: &str = "price_range";
pub const PRICE_CATEGORY: &str = "price_category";
pub const RATING_COLOR: &str = "rating_color";
pub const RATING_COLOR_NAME: &str = "rating_color_name";
pub const RATING_TEXT: &str = "rating_text";
pub const CUISINES: &str = "cuisines";
pub const CITY: &str = "city";
pub const RESTAURANT_ID: &str = "restaurant_id";
pub const RESTAURANT_NAME: &str = "restaurant_name";
pub const AGGREGATE_RATING: &str = "aggregate_rating";
pub const VOTES: &str = "votes";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Columns the normalizer cannot run without.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COUNTRY_CODE,
    PRICE_RANGE,
    RATING_COLOR,
    RATING_TEXT,
    CUISINES,
];

pub fn canonical_column_name(label: &str) -> String {
    let cleaned = label.trim().trim_matches('\u{feff}');
    let titled = cleaned.to_title_case();
    let joined = without_whitespace(&titled);
    joined.to_snake_case()
}

pub fn canonical_column_names(labels: &[String]) -> Vec<String> {
    labels.iter().map(|label| canonical_column_name(label)).collect()
}

fn without_whitespace(value: &str) -> Cow<'_, str> {
    if value.chars().any(char::is_whitespace) {
        Cow::Owned(value.chars().filter(|ch| !ch.is_whitespace()).collect())
    } else {
        Cow::Borrowed(value)
    }
}
