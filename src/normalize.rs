//! Raw listing to normalized table.
//!
//! Columns are located by their canonical name, so `Rating text`,
//! `RATING TEXT` and `rating_text` are all the same input column. Per row:
//!
//! 1. rating text is replaced by its canonical label (unknown text passes through)
//! 2. `country` is derived from the country code (unknown code leaves it absent)
//! 3. `rating_color_name` is derived from the rating color hex
//! 4. `price_category` is derived from the price range (total)
//! 5. every column identifier is canonicalized
//! 6. cuisines keep only their first comma-separated entry, trimmed
//! 7. rows without a cuisine are dropped
//!
//! Derived columns replace an existing column of the same name, which keeps a
//! second pass over already-normalized data a no-op.

use std::path::Path;

use anyhow::{Result, bail};
use encoding_rs::Encoding;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    columns::{self, canonical_column_names},
    data::{ColumnType, Value, parse_typed_value},
    dataset::{RawTable, Row, Table},
    lookup::{self, PriceCategory},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub input_rows: usize,
    pub output_rows: usize,
    /// Rows removed because their cuisine list was absent or empty.
    pub dropped_missing_cuisine: usize,
    pub unknown_country_codes: usize,
    pub unknown_rating_colors: usize,
    pub unrecognized_rating_texts: usize,
    pub unparsable_cells: usize,
}

#[derive(Debug, Clone)]
pub struct NormalizedDataset {
    pub table: Table,
    pub report: NormalizationReport,
}

pub fn load_and_normalize(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<NormalizedDataset> {
    let raw = RawTable::load(path, delimiter, encoding)?;
    normalize(&raw)
}

struct Layout {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rating_text: usize,
    country_code: usize,
    rating_color: usize,
    price_range: usize,
    cuisines: usize,
    country: usize,
    rating_color_name: usize,
    price_category: usize,
}

impl Layout {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut columns = canonical_column_names(headers);
        let missing = columns::REQUIRED_COLUMNS
            .iter()
            .filter(|required| !columns.iter().any(|c| c == *required))
            .copied()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            bail!(
                "Missing required column(s): {} (found: {})",
                missing.join(", "),
                columns.join(", ")
            );
        }

        let mut types = columns
            .iter()
            .map(|name| ColumnType::for_column(name))
            .collect::<Vec<_>>();
        let mut slot = |name: &str| -> usize {
            match columns.iter().position(|c| c == name) {
                Some(idx) => {
                    types[idx] = ColumnType::Text;
                    idx
                }
                None => {
                    columns.push(name.to_string());
                    types.push(ColumnType::Text);
                    columns.len() - 1
                }
            }
        };
        let country = slot(columns::COUNTRY);
        let rating_color_name = slot(columns::RATING_COLOR_NAME);
        let price_category = slot(columns::PRICE_CATEGORY);

        let position = |name: &str| columns.iter().position(|c| c == name).unwrap_or(0);
        Ok(Self {
            rating_text: position(columns::RATING_TEXT),
            country_code: position(columns::COUNTRY_CODE),
            rating_color: position(columns::RATING_COLOR),
            price_range: position(columns::PRICE_RANGE),
            cuisines: position(columns::CUISINES),
            country,
            rating_color_name,
            price_category,
            columns,
            types,
        })
    }
}

/// Runs the full normalization pass. Fails only when a required column is
/// missing; unrecognized values degrade to absent or passthrough cells.
pub fn normalize(raw: &RawTable) -> Result<NormalizedDataset> {
    let layout = Layout::resolve(&raw.headers)?;
    let mut report = NormalizationReport {
        input_rows: raw.rows.len(),
        ..NormalizationReport::default()
    };

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row_idx, raw_row) in raw.rows.iter().enumerate() {
        let mut row = parse_row(&layout, raw_row, row_idx, &mut report);

        canonicalize_rating_text(&mut row[layout.rating_text], &mut report);

        let country = row[layout.country_code]
            .as_ref()
            .and_then(Value::as_i64)
            .and_then(lookup::country_name);
        if country.is_none() {
            report.unknown_country_codes += 1;
        }
        row[layout.country] = country.map(text);

        let color = row[layout.rating_color]
            .as_ref()
            .and_then(Value::as_text)
            .and_then(|hex| lookup::rating_color_name(hex.trim()));
        if color.is_none() {
            report.unknown_rating_colors += 1;
        }
        row[layout.rating_color_name] = color.map(text);

        let price_range = row[layout.price_range].as_ref().and_then(Value::as_i64);
        row[layout.price_category] = Some(text(PriceCategory::from_price_range(price_range).as_str()));

        let cuisine = first_cuisine(row[layout.cuisines].as_ref());
        match cuisine {
            Some(cuisine) => {
                row[layout.cuisines] = Some(Value::Text(cuisine));
                rows.push(row);
            }
            None => {
                debug!("Dropping row {} without cuisine", row_idx + 2);
                report.dropped_missing_cuisine += 1;
            }
        }
    }
    report.output_rows = rows.len();

    info!(
        "Normalized {} row(s) into {} ({} dropped without cuisine)",
        report.input_rows, report.output_rows, report.dropped_missing_cuisine
    );
    debug!("Normalization report: {report:?}");

    Ok(NormalizedDataset {
        table: Table::from_parts(layout.columns, layout.types, rows),
        report,
    })
}

fn parse_row(
    layout: &Layout,
    raw_row: &[String],
    row_idx: usize,
    report: &mut NormalizationReport,
) -> Row {
    layout
        .columns
        .iter()
        .zip(&layout.types)
        .enumerate()
        .map(|(col_idx, (name, ty))| {
            let raw = raw_row.get(col_idx).map(String::as_str).unwrap_or("");
            match parse_typed_value(raw, *ty) {
                Ok(value) => value,
                Err(err) => {
                    debug!("Row {} column '{name}': {err:#}", row_idx + 2);
                    report.unparsable_cells += 1;
                    None
                }
            }
        })
        .collect()
}

fn canonicalize_rating_text(cell: &mut Option<Value>, report: &mut NormalizationReport) {
    if let Some(Value::Text(current)) = cell {
        match lookup::canonical_rating_text(current) {
            Some(canonical) => *current = canonical.to_string(),
            None => report.unrecognized_rating_texts += 1,
        }
    }
}

/// First comma-separated entry, trimmed; `None` when absent or blank.
pub fn first_cuisine(value: Option<&Value>) -> Option<String> {
    let Value::Text(list) = value? else {
        return None;
    };
    let first = list.split(',').next().unwrap_or("").trim();
    (!first.is_empty()).then(|| first.to_string())
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    const HEADERS: &[&str] = &[
        "Country Code",
        "Price range",
        "Rating color",
        "Rating text",
        "Cuisines",
    ];

    #[test]
    fn first_cuisine_trims_and_rejects_blank() {
        let list = Value::Text(" Italian , Pizza".into());
        assert_eq!(first_cuisine(Some(&list)), Some("Italian".into()));
        assert_eq!(first_cuisine(Some(&Value::Text(", Pizza".into()))), None);
        assert_eq!(first_cuisine(None), None);
        assert_eq!(first_cuisine(Some(&Value::Integer(3))), None);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let table = raw(&["Country Code", "Cuisines"], &[&["1", "Thai"]]);
        let err = normalize(&table).expect_err("missing columns should fail");
        let message = err.to_string();
        assert!(message.contains("price_range"), "{message}");
        assert!(message.contains("rating_text"), "{message}");
    }

    #[test]
    fn layout_appends_derived_columns_in_order() {
        let layout = Layout::resolve(&HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>())
            .unwrap();
        assert_eq!(
            layout.columns,
            vec![
                "country_code",
                "price_range",
                "rating_color",
                "rating_text",
                "cuisines",
                "country",
                "rating_color_name",
                "price_category",
            ]
        );
    }

    #[test]
    fn existing_derived_column_is_replaced_not_duplicated() {
        let mut headers = HEADERS.to_vec();
        headers.push("Country");
        let table = raw(&headers, &[&["30", "2", "5BA829", "Bom", "Brazilian", "stale"]]);
        let normalized = normalize(&table).unwrap().table;
        assert_eq!(
            normalized
                .columns()
                .iter()
                .filter(|c| c.as_str() == "country")
                .count(),
            1
        );
        assert_eq!(normalized.display_row(0)[5], "Brazil");
    }

    #[test]
    fn degraded_values_are_counted_not_fatal() {
        let table = raw(
            HEADERS,
            &[
                &["999", "two", "000000", "Superb", "Thai"],
                &["1", "1", "3F7E00", "Excelente", "Indian"],
            ],
        );
        let result = normalize(&table).unwrap();
        assert_eq!(result.report.unknown_country_codes, 1);
        assert_eq!(result.report.unknown_rating_colors, 1);
        assert_eq!(result.report.unrecognized_rating_texts, 1);
        assert_eq!(result.report.unparsable_cells, 1);
        assert_eq!(result.table.len(), 2);
        assert_eq!(
            result.table.display_row(0),
            vec!["999", "", "000000", "Superb", "Thai", "", "", "gourmet"]
        );
        assert_eq!(
            result.table.display_row(1),
            vec!["1", "1", "3F7E00", "Excellent", "Indian", "India", "darkgreen", "cheap"]
        );
    }
}
