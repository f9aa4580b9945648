use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use stockbook_catalog::{Catalog, Product};
use stockbook_core::ProductCode;
use stockbook_sales::{Channel, Ledger, SaleEvent};
use stockbook_stats::{Dimension, Statistics};

const FAMILIES: [&str; 4] = ["Blusa", "Vestido", "Pantalon", "Falda"];
const COLORS: [&str; 3] = ["Negro", "Blanco", "Rojo"];
const SIZES: [&str; 4] = ["XS", "S", "M", "L"];

fn build_catalog(products: usize) -> Catalog {
    let rows = (0..products).map(|i| {
        Product::new(
            ProductCode::new(format!("P{i:05}")).unwrap(),
            FAMILIES[i % FAMILIES.len()],
            COLORS[i % COLORS.len()],
            SIZES[i % SIZES.len()],
            100,
            Decimal::from(100 + (i % 50) as i64),
            Decimal::from(60),
        )
        .unwrap()
    });
    Catalog::from_products(rows).unwrap()
}

fn build_ledger(products: usize, sales: usize) -> Ledger {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let events = (0..sales).map(|i| {
        SaleEvent::new(
            start + Duration::minutes((i * 37) as i64),
            ProductCode::new(format!("P{:05}", i % products)).unwrap(),
            1 + (i % 5) as u64,
            Channel::ALL[i % Channel::ALL.len()],
        )
        .unwrap()
    });
    Ledger::from_events(events).unwrap()
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics_report");
    let catalog = build_catalog(500);

    for sales in [1_000usize, 10_000, 100_000] {
        let ledger = build_ledger(500, sales);
        group.throughput(Throughput::Elements(sales as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sales), &ledger, |b, ledger| {
            b.iter(|| {
                let stats = Statistics::new(black_box(&catalog), black_box(ledger));
                black_box(stats.report())
            })
        });
    }

    group.finish();
}

fn bench_top_by_dimension(c: &mut Criterion) {
    let catalog = build_catalog(500);
    let ledger = build_ledger(500, 50_000);

    c.bench_function("top_by_family_50k", |b| {
        b.iter(|| {
            let stats = Statistics::new(&catalog, &ledger);
            black_box(stats.top_by_dimension(Dimension::Family))
        })
    });
}

criterion_group!(benches, bench_report, bench_top_by_dimension);
criterion_main!(benches);
