use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use encoding_rs::UTF_8;
use restaurant_insights::{
    aggregate::{self, SortOrder},
    filter::{self, Selection},
    normalize, views,
};
use tempfile::TempDir;

const CODES: [u32; 6] = [1, 30, 162, 208, 215, 94];
const CUISINES: [&str; 5] = ["North Indian, Mughlai", "Italian", "Japanese, Sushi", "Turkish", "Cafe"];
const CITIES: [&str; 4] = ["Central", "Harbour", "Old Town", "Airport"];

fn generate_listing(rows: usize) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let csv_path = temp_dir.path().join("listing.csv");
    let mut file = File::create(&csv_path).expect("create csv");
    writeln!(
        file,
        "Restaurant ID,Restaurant Name,Country Code,City,Cuisines,Price range,Votes,Aggregate rating,Rating color,Rating text"
    )
    .expect("header");
    for i in 0..rows {
        let code = CODES[i % CODES.len()];
        let city = CITIES[(i / 7) % CITIES.len()];
        let cuisine = CUISINES[(i / 3) % CUISINES.len()];
        let price = (i % 5) + 1;
        let votes = (i * 37) % 2000;
        let rating = (i % 50) as f64 / 10.0;
        writeln!(
            file,
            "{i},Place {i},{code},{city},\"{cuisine}\",{price},{votes},{rating:.1},5BA829,Very Good"
        )
        .expect("row");
    }
    (temp_dir, csv_path)
}

fn bench_pipeline(c: &mut Criterion) {
    let (temp_dir, csv_path) = generate_listing(20_000);
    let table = normalize::load_and_normalize(&csv_path, b',', UTF_8)
        .expect("normalize listing")
        .table;

    let mut group = c.benchmark_group("pipeline");

    group.bench_function("load_and_normalize", |b| {
        b.iter_batched(
            || (),
            |_| {
                normalize::load_and_normalize(&csv_path, b',', UTF_8).expect("normalize");
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("filter_then_count", |b| {
        let selection = Selection::new()
            .with("country", ["India", "Turkey"])
            .with("price_category", ["cheap", "normal"]);
        b.iter(|| {
            let filtered = filter::apply(&table, &selection).expect("filter");
            aggregate::count_by(&filtered, &["city", "country"], 10).expect("count");
        });
    });

    group.bench_function("mean_rating_by_cuisine", |b| {
        b.iter(|| {
            aggregate::mean_by(&table, "cuisines", "aggregate_rating", SortOrder::Descending, 10)
                .expect("mean");
        });
    });

    group.bench_function("cuisine_highlights", |b| {
        b.iter(|| views::cuisine_highlights(&table, "italian", 5).expect("highlights"));
    });

    drop(temp_dir);
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
