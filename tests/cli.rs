mod common;

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value;

use common::{RESTAURANTS, TestWorkspace, fixture_path};

fn restaurant_insights() -> Command {
    Command::cargo_bin("restaurant-insights").expect("binary exists")
}

fn run_json(args: &[&str]) -> Value {
    let fixture = fixture_path(RESTAURANTS);
    let output = restaurant_insights()
        .args(args)
        .args(["-i", fixture.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json output")
}

fn ranking_keys(document: &Value, view: &str) -> Vec<String> {
    document[view]["rows"]
        .as_array()
        .expect("ranking rows")
        .iter()
        .map(|row| {
            row["key"]
                .as_array()
                .expect("key")
                .iter()
                .map(|part| part.as_str().expect("key text"))
                .collect::<Vec<_>>()
                .join(" / ")
        })
        .collect()
}

fn names(records: &Value) -> Vec<&str> {
    records
        .as_array()
        .expect("records")
        .iter()
        .map(|record| record["restaurant_name"].as_str().expect("name"))
        .collect()
}

#[test]
fn overview_prints_summary_table() {
    let fixture = fixture_path(RESTAURANTS);
    restaurant_insights()
        .args(["overview", "-i", fixture.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("restaurants  15"))
        .stdout(contains("votes        5661"))
        .stdout(contains("cuisines     9"));
}

#[test]
fn overview_honours_country_selection() {
    let document = run_json(&["overview", "--country", "India"]);
    assert_eq!(document["summary"]["restaurants"], 6);
    assert_eq!(document["summary"]["cities"], 2);
    assert_eq!(document["summary"]["votes"], 2853);
}

#[test]
fn countries_report_contains_every_rollup() {
    let document = run_json(&["countries", "--top", "2"]);
    assert_eq!(ranking_keys(&document, "cities_per_country"), vec!["India", "Philippines"]);
    assert_eq!(
        ranking_keys(&document, "restaurants_per_country"),
        vec!["India", "Philippines"]
    );
    assert_eq!(ranking_keys(&document, "mean_votes_per_country"), vec!["England", "India"]);
    assert_eq!(
        ranking_keys(&document, "mean_rating_per_country"),
        vec!["Philippines", "Brazil"]
    );
    assert_eq!(document["mean_rating_per_country"]["metric"], "mean_aggregate_rating");
}

#[test]
fn cities_report_filters_by_price() {
    let fixture = fixture_path(RESTAURANTS);
    restaurant_insights()
        .args(["cities", "-i", fixture.to_str().unwrap(), "--price", "cheap"])
        .assert()
        .success()
        .stdout(contains("## restaurants_per_city"))
        .stdout(contains("New Delhi  India    2"))
        .stdout(contains("## cuisine_variety_per_city"))
        .stdout(contains("Atlantis").not());
}

#[test]
fn cuisines_report_highlights_requested_cuisine() {
    let document = run_json(&[
        "cuisines",
        "--top",
        "2",
        "--highlight",
        "japanese",
        "--highlights",
        "2",
        "--restaurants",
        "3",
    ]);
    assert_eq!(
        names(&document["cuisine_highlights"]),
        vec!["Izakaya Kikufuji", "Sushi Zanmai"]
    );
    assert_eq!(
        names(&document["top_restaurants"]),
        vec!["Pasta Roma", "Le Petit Souffle", "Sketch"]
    );
    assert_eq!(ranking_keys(&document, "best_cuisines"), vec!["Seafood", "Japanese"]);
    assert_eq!(ranking_keys(&document, "worst_cuisines"), vec!["Pizza", "Turkish"]);
}

#[test]
fn cuisines_defaults_apply_per_section() {
    let document = run_json(&["cuisines", "--top", "1"]);
    assert_eq!(
        names(&document["cuisine_highlights"]),
        vec!["Pasta Roma", "Sketch", "Bella Italia"]
    );
    assert_eq!(document["top_restaurants"].as_array().expect("records").len(), 10);
    assert_eq!(ranking_keys(&document, "best_cuisines"), vec!["Seafood"]);
}

#[test]
fn normalize_json_reports_and_previews_rows() {
    let document = run_json(&["normalize", "--rows", "2"]);
    assert_eq!(document["report"]["input_rows"], 16);
    assert_eq!(document["report"]["output_rows"], 15);
    assert_eq!(document["report"]["dropped_missing_cuisine"], 1);
    let rows = document["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["country"], "Philippines");
    assert_eq!(rows[0]["cuisines"], "French");
    assert_eq!(rows[0]["price_category"], "expensive");
    assert_eq!(rows[0]["rating_color_name"], "darkgreen");
    assert_eq!(rows[1]["aggregate_rating"], 4.5);
}

#[test]
fn normalize_reads_semicolon_input_from_stdin() {
    let data = fs::read_to_string(fixture_path(RESTAURANTS))
        .expect("read fixture")
        .replace(',', ";");
    restaurant_insights()
        .args(["normalize", "-i", "-", "--delimiter", ";", "--rows", "1"])
        .write_stdin(data)
        .assert()
        .success()
        .stdout(contains("output_rows"))
        .stdout(contains("Le Petit Souffle"));
}

#[test]
fn tsv_extension_selects_tab_delimiter() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "listing.tsv",
        b"Country Code\tPrice range\tRating color\tRating text\tCuisines\n30\t1\t5BA829\tBom\tBrazilian, Cafe\n",
    );
    restaurant_insights()
        .args(["overview", "-i", path.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"cuisines\": 1"));
}

#[test]
fn missing_input_fails_with_context() {
    let workspace = TestWorkspace::new();
    let missing = workspace.path().join("nowhere.csv");
    restaurant_insights()
        .args(["countries", "-i", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("error:"))
        .stderr(contains("Loading restaurants"));
}

#[test]
fn unknown_price_category_is_rejected() {
    let fixture = fixture_path(RESTAURANTS);
    restaurant_insights()
        .args(["overview", "-i", fixture.to_str().unwrap(), "--price", "luxury"])
        .assert()
        .failure()
        .stderr(contains("luxury"));
}
