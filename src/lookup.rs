//! Hand-maintained lookup tables used by the normalizer.
//!
//! Every table is a pure key lookup returning `Option`; the caller decides
//! what a miss means for its column. Price tiers are the exception: they are
//! modelled as [`PriceCategory`], a total function of the price-range integer.

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Country codes present in the source dataset.
pub const COUNTRY_NAMES: &[(i64, &str)] = &[
    (1, "India"),
    (14, "Australia"),
    (30, "Brazil"),
    (37, "Canada"),
    (94, "Indonesia"),
    (148, "New Zealand"),
    (162, "Philippines"),
    (166, "Qatar"),
    (184, "Singapore"),
    (189, "South Africa"),
    (191, "Sri Lanka"),
    (208, "Turkey"),
    (214, "UAE"),
    (215, "England"),
    (216, "United States"),
];

/// Rating color hex codes (without `#`) and the color names used by maps.
pub const RATING_COLOR_NAMES: &[(&str, &str)] = &[
    ("3F7E00", "darkgreen"),
    ("5BA829", "green"),
    ("9ACD32", "lightgreen"),
    ("CDD614", "orange"),
    ("FFBA00", "red"),
    ("CBCBC8", "darkred"),
    ("FF7800", "darkred"),
];

/// Canonical rating labels.
pub const CANONICAL_RATING_TEXTS: &[&str] = &[
    "Excellent",
    "Very Good",
    "Good",
    "Average",
    "Not rated",
    "Poor",
];

/// Localized rating labels and the canonical label each one stands for.
pub const RATING_TEXT_ALIASES: &[(&str, &str)] = &[
    ("Excellent", "Excellent"),
    ("Very Good", "Very Good"),
    ("Good", "Good"),
    ("Average", "Average"),
    ("Not rated", "Not rated"),
    ("Poor", "Poor"),
    ("Excelente", "Excellent"),
    ("Muito bom", "Very Good"),
    ("Muito Bom", "Very Good"),
    ("Bardzo dobrze", "Very Good"),
    ("Muy Bueno", "Very Good"),
    ("Bueno", "Good"),
    ("Baik", "Good"),
    ("Biasa", "Average"),
    ("Skvělá volba", "Excellent"),
    ("Velmi dobré", "Very Good"),
    ("Harika", "Excellent"),
    ("Çok iyi", "Very Good"),
    ("Eccellente", "Excellent"),
    ("Veľmi dobré", "Very Good"),
    ("Buono", "Good"),
    ("Bom", "Good"),
    ("Skvělé", "Excellent"),
    ("Wybitnie", "Excellent"),
    ("Sangat Baik", "Very Good"),
    ("Terbaik", "Excellent"),
    ("İyi", "Good"),
    ("Vynikajúce", "Excellent"),
];

pub fn country_name(code: i64) -> Option<&'static str> {
    COUNTRY_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// Matches the hex code exactly as stored in the dataset (uppercase, no `#`).
pub fn rating_color_name(hex: &str) -> Option<&'static str> {
    RATING_COLOR_NAMES
        .iter()
        .find(|(known, _)| *known == hex)
        .map(|(_, name)| *name)
}

/// Returns the canonical label for a known alias. Matching is exact:
/// `"Muito bom"` and `"Muito Bom"` are listed separately for that reason.
pub fn canonical_rating_text(text: &str) -> Option<&'static str> {
    RATING_TEXT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == text)
        .map(|(_, canonical)| *canonical)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Cheap,
    Normal,
    Expensive,
    Gourmet,
}

impl PriceCategory {
    pub const ALL: [PriceCategory; 4] = [
        PriceCategory::Cheap,
        PriceCategory::Normal,
        PriceCategory::Expensive,
        PriceCategory::Gourmet,
    ];

    /// Anything outside 1..=3, including a missing value, is gourmet.
    pub fn from_price_range(price_range: Option<i64>) -> Self {
        match price_range {
            Some(1) => PriceCategory::Cheap,
            Some(2) => PriceCategory::Normal,
            Some(3) => PriceCategory::Expensive,
            _ => PriceCategory::Gourmet,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategory::Cheap => "cheap",
            PriceCategory::Normal => "normal",
            PriceCategory::Expensive => "expensive",
            PriceCategory::Gourmet => "gourmet",
        }
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceCategory {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        PriceCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == lowered)
            .ok_or_else(|| {
                anyhow!("Unknown price category '{value}' (expected cheap, normal, expensive or gourmet)")
            })
    }
}
