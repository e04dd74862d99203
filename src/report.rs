//! Command handlers: load once, filter, run the page's views, print.

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value as Json, json};

use crate::{
    aggregate::{self, Aggregation, DatasetSummary},
    cli::{CuisinesArgs, InputArgs, NormalizeArgs, OutputFormat, ReportArgs, SelectionArgs},
    columns,
    dataset::Table,
    filter::{self, Selection},
    io_utils,
    normalize::{self, NormalizedDataset},
    table, views,
};

enum Section {
    Summary(DatasetSummary),
    Ranking(&'static str, Aggregation),
    Records(&'static str, Table),
}

pub fn load(args: &InputArgs) -> Result<NormalizedDataset> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Reading '{}' with delimiter '{}'",
        args.input.display(),
        crate::printable_delimiter(delimiter)
    );
    normalize::load_and_normalize(&args.input, delimiter, encoding)
        .with_context(|| format!("Loading restaurants from {:?}", args.input))
}

pub fn selection_from_args(args: &SelectionArgs) -> Selection {
    let mut selection = Selection::new();
    if !args.countries.is_empty() {
        selection.insert(columns::COUNTRY, &args.countries);
    }
    if !args.prices.is_empty() {
        selection.insert(columns::PRICE_CATEGORY, &args.prices);
    }
    if !args.cuisines.is_empty() {
        selection.insert(columns::CUISINES, &args.cuisines);
    }
    selection
}

fn load_filtered(args: &ReportArgs) -> Result<Table> {
    let dataset = load(&args.input)?;
    let selection = selection_from_args(&args.selection);
    let filtered = filter::apply(&dataset.table, &selection)?;
    info!(
        "{} of {} restaurant(s) match the selection",
        filtered.len(),
        dataset.table.len()
    );
    Ok(filtered)
}

pub fn execute_normalize(args: &NormalizeArgs) -> Result<()> {
    let dataset = load(&args.input)?;
    let shown = dataset.table.len().min(args.rows);
    let preview = (0..shown)
        .map(|idx| dataset.table.display_row(idx))
        .collect::<Vec<_>>();
    match args.format {
        OutputFormat::Table => {
            let report = &dataset.report;
            let rows = [
                ("input_rows", report.input_rows),
                ("output_rows", report.output_rows),
                ("dropped_missing_cuisine", report.dropped_missing_cuisine),
                ("unknown_country_codes", report.unknown_country_codes),
                ("unknown_rating_colors", report.unknown_rating_colors),
                ("unrecognized_rating_texts", report.unrecognized_rating_texts),
                ("unparsable_cells", report.unparsable_cells),
            ]
            .into_iter()
            .map(|(name, count)| vec![name.to_string(), count.to_string()])
            .collect::<Vec<_>>();
            print!(
                "{}",
                table::render_table(&["measure".to_string(), "rows".to_string()], &rows)
            );
            println!();
            print!("{}", table::render_table(dataset.table.columns(), &preview));
        }
        OutputFormat::Json => {
            let records = records_json(&dataset.table)
                .into_iter()
                .take(args.rows)
                .collect::<Vec<_>>();
            let document = json!({ "report": dataset.report, "rows": records });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}

pub fn execute_overview(args: &ReportArgs) -> Result<()> {
    let filtered = load_filtered(args)?;
    emit(&[Section::Summary(aggregate::summarize(&filtered))], args.format)
}

pub fn execute_countries(args: &ReportArgs) -> Result<()> {
    let filtered = load_filtered(args)?;
    let top = args.top;
    let sections = vec![
        Section::Ranking("cities_per_country", views::cities_per_country(&filtered, top)?),
        Section::Ranking(
            "restaurants_per_country",
            views::restaurants_per_country(&filtered, top)?,
        ),
        Section::Ranking(
            "mean_votes_per_country",
            views::mean_votes_per_country(&filtered, top)?,
        ),
        Section::Ranking(
            "mean_rating_per_country",
            views::mean_rating_per_country(&filtered, top)?,
        ),
    ];
    emit(&sections, args.format)
}

pub fn execute_cities(args: &ReportArgs) -> Result<()> {
    let filtered = load_filtered(args)?;
    let top = args.top;
    let sections = vec![
        Section::Ranking("restaurants_per_city", views::restaurants_per_city(&filtered, top)?),
        Section::Ranking("highly_rated_cities", views::highly_rated_cities(&filtered, top)?),
        Section::Ranking("poorly_rated_cities", views::poorly_rated_cities(&filtered, top)?),
        Section::Ranking(
            "cuisine_variety_per_city",
            views::cuisine_variety_per_city(&filtered, top)?,
        ),
    ];
    emit(&sections, args.format)
}

pub fn execute_cuisines(args: &CuisinesArgs) -> Result<()> {
    let report = &args.report;
    let filtered = load_filtered(report)?;
    let top = report.top;
    let sections = vec![
        Section::Records(
            "cuisine_highlights",
            views::cuisine_highlights(&filtered, &args.highlight, args.highlights)?,
        ),
        Section::Records("top_restaurants", views::top_restaurants(&filtered, args.restaurants)?),
        Section::Ranking("best_cuisines", views::best_cuisines(&filtered, top)?),
        Section::Ranking("worst_cuisines", views::worst_cuisines(&filtered, top)?),
    ];
    emit(&sections, report.format)
}

fn emit(sections: &[Section], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for (idx, section) in sections.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                match section {
                    Section::Summary(summary) => print!("{}", render_summary(summary)),
                    Section::Ranking(title, aggregation) => {
                        println!("## {title}");
                        print!("{}", table::render_aggregation(aggregation));
                    }
                    Section::Records(title, records) => {
                        println!("## {title}");
                        print!("{}", table::render_records(records));
                    }
                }
            }
        }
        OutputFormat::Json => {
            let mut document = Map::new();
            for section in sections {
                match section {
                    Section::Summary(summary) => {
                        document.insert("summary".to_string(), serde_json::to_value(summary)?);
                    }
                    Section::Ranking(title, aggregation) => {
                        document.insert(title.to_string(), serde_json::to_value(aggregation)?);
                    }
                    Section::Records(title, records) => {
                        document.insert(title.to_string(), Json::Array(records_json(records)));
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&Json::Object(document))?);
        }
    }
    Ok(())
}

fn render_summary(summary: &DatasetSummary) -> String {
    let rows = [
        ("restaurants", summary.restaurants.to_string()),
        ("countries", summary.countries.to_string()),
        ("cities", summary.cities.to_string()),
        ("votes", summary.votes.to_string()),
        ("cuisines", summary.cuisines.to_string()),
    ]
    .into_iter()
    .map(|(name, value)| vec![name.to_string(), value])
    .collect::<Vec<_>>();
    table::render_table(&["metric".to_string(), "value".to_string()], &rows)
}

fn records_json(records: &Table) -> Vec<Json> {
    records
        .rows()
        .iter()
        .map(|row| {
            let object = records
                .columns()
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    let value = cell
                        .as_ref()
                        .and_then(|value| serde_json::to_value(value).ok())
                        .unwrap_or(Json::Null);
                    (column.clone(), value)
                })
                .collect::<Map<_, _>>();
            Json::Object(object)
        })
        .collect()
}
