use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{lookup::PriceCategory, views};

#[derive(Debug, Parser)]
#[command(author, version, about = "Explore restaurant listings by country, city and cuisine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize the listing and show the report plus the first rows
    Normalize(NormalizeArgs),
    /// Headline counts: restaurants, countries, cities, votes, cuisines
    Overview(ReportArgs),
    /// Country rollups: cities, restaurants, mean votes, mean rating
    Countries(ReportArgs),
    /// City rankings: most restaurants, best and worst rated, cuisine variety
    Cities(ReportArgs),
    /// Cuisine rankings, top restaurants, and highlighted cuisine picks
    Cuisines(CuisinesArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Restaurant listing CSV (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SelectionArgs {
    /// Keep only these countries (repeatable)
    #[arg(long = "country", action = clap::ArgAction::Append)]
    pub countries: Vec<String>,
    /// Keep only these price categories: cheap, normal, expensive, gourmet (repeatable)
    #[arg(long = "price", value_parser = parse_price_category, action = clap::ArgAction::Append)]
    pub prices: Vec<PriceCategory>,
    /// Keep only these cuisines (repeatable)
    #[arg(long = "cuisine", action = clap::ArgAction::Append)]
    pub cuisines: Vec<String>,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of normalized rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Maximum rows per ranking (0 = all)
    #[arg(long, default_value_t = 10)]
    pub top: usize,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CuisinesArgs {
    #[command(flatten)]
    pub report: ReportArgs,
    /// Case-insensitive cuisine text to highlight
    #[arg(long, default_value = views::DEFAULT_HIGHLIGHT)]
    pub highlight: String,
    /// Number of highlighted restaurants
    #[arg(long, default_value_t = views::DEFAULT_HIGHLIGHT_COUNT)]
    pub highlights: usize,
    /// Number of best-rated restaurants (0 = all); `--top` only sizes the cuisine rankings
    #[arg(long, default_value_t = views::DEFAULT_RESTAURANT_COUNT)]
    pub restaurants: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_price_category(value: &str) -> Result<PriceCategory, String> {
    value.parse::<PriceCategory>().map_err(|err| err.to_string())
}
