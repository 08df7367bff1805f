//! Benchmark review validation and catalog queries with a 1000-review dataset.

use bl_core::ReviewCreate;
use bl_db::pool::init_memory_pool;
use bl_db::ReviewCatalog;
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

fn record(i: usize) -> Value {
    json!({
        "shop_name": format!("Shop {i:04}"),
        "burger_name": "Classic",
        "rating": 1 + i % 5,
        "rating_style": 1 + (i / 5) % 5,
        "rating_volume": 3,
        "rating_patty": 3,
        "rating_buns": 2,
        "rating_sauce": 4,
        "price": 900 + i,
        "visit_date": "2024-01-15T12:00:00",
        "tags": "smash,cheese",
        "comment": "Overview text"
    })
}

fn setup() -> ReviewCatalog {
    let catalog = ReviewCatalog::new(init_memory_pool().expect("pool"));
    let records = (0..1000).map(record).collect();
    catalog.import(records).unwrap();
    catalog
}

fn bench_reviews(c: &mut Criterion) {
    let catalog = setup();

    let mut group = c.benchmark_group("reviews");

    group.bench_function("validate_create", |b| {
        let body = record(7);
        b.iter(|| {
            ReviewCreate::from_json(body.clone()).unwrap().validate().unwrap();
        });
    });

    group.bench_function("list_page", |b| {
        b.iter(|| {
            catalog.list(500, 100).unwrap();
        });
    });

    group.bench_function("export_all", |b| {
        b.iter(|| {
            catalog.export().unwrap();
        });
    });

    group.bench_function("import_100", |b| {
        let batch: Vec<Value> = (0..100).map(record).collect();
        b.iter(|| {
            catalog.import(batch.clone()).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_reviews);
criterion_main!(benches);
