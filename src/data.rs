use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::columns;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
}

impl ColumnType {
    /// Type of a canonical column name. Passthrough columns are text.
    pub fn for_column(name: &str) -> Self {
        match name {
            columns::RESTAURANT_ID
            | columns::COUNTRY_CODE
            | columns::PRICE_RANGE
            | columns::VOTES
            | "average_cost_for_two" => ColumnType::Integer,
            columns::LONGITUDE | columns::LATITUDE | columns::AGGREGATE_RATING => {
                ColumnType::Float
            }
            _ => ColumnType::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Parses a raw cell for a column of type `ty`. Empty (or all-blank) cells are
/// absent; a numeric cell that does not parse, is not finite, or falls
/// outside `i64` for an integer column is an error for the caller to
/// downgrade.
pub fn parse_typed_value(value: &str, ty: ColumnType) -> Result<Option<Value>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    let parsed = match ty {
        ColumnType::Text => Value::Text(value.to_string()),
        ColumnType::Integer => {
            let trimmed = value.trim();
            match trimmed.parse::<i64>() {
                Ok(parsed) => Value::Integer(parsed),
                Err(_) => {
                    let float: f64 = trimmed
                        .parse()
                        .with_context(|| format!("Failed to parse '{value}' as integer"))?;
                    if !float.is_finite()
                        || float.fract() != 0.0
                        || float < i64::MIN as f64
                        || float >= i64::MAX as f64
                    {
                        anyhow::bail!("Failed to parse '{value}' as integer");
                    }
                    Value::Integer(float as i64)
                }
            }
        }
        ColumnType::Float => {
            let parsed: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("Failed to parse '{value}' as float"))?;
            if !parsed.is_finite() {
                anyhow::bail!("Failed to parse '{value}' as a finite float");
            }
            Value::Float(parsed)
        }
    };
    Ok(Some(parsed))
}

/// Formats a metric without trailing zeros for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.4}")
    }
}
