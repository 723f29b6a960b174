use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use sim_lob::book::OrderRequest;
use sim_lob::Book;

fn req(side: &str, price: Option<Decimal>, volume: Decimal, kind: &str) -> OrderRequest {
    OrderRequest {
        side: Some(side.to_string()),
        price,
        volume: Some(volume),
        kind: Some(kind.to_string()),
        user: None,
    }
}

fn matching_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_operations");

    group.bench_function("submit_resting_limit", |b| {
        let mut book = Book::new(dec!(0.1), dec!(100.0));
        b.iter(|| {
            book.submit(black_box(req("bid", Some(dec!(99.0)), dec!(1.0), "limit")))
                .unwrap();
        });
    });

    group.bench_function("submit_crossing_market", |b| {
        let mut book = Book::new(dec!(0.1), dec!(100.0));
        for i in 0..1_000 {
            book.submit(req(
                "ask",
                Some(dec!(100.0) + Decimal::from(i) * dec!(0.1)),
                dec!(1.0),
                "limit",
            ))
            .unwrap();
        }
        b.iter(|| {
            book.submit(black_box(req("bid", None, dec!(0.5), "market")))
                .unwrap();
        });
    });

    group.bench_function("depth_snapshot_10", |b| {
        let mut book = Book::new(dec!(0.1), dec!(100.0));
        for i in 0..200 {
            book.submit(req(
                "bid",
                Some(dec!(100.0) - Decimal::from(i) * dec!(0.1)),
                dec!(1.0),
                "limit",
            ))
            .unwrap();
            book.submit(req(
                "ask",
                Some(dec!(100.1) + Decimal::from(i) * dec!(0.1)),
                dec!(1.0),
                "limit",
            ))
            .unwrap();
        }
        b.iter(|| black_box(book.depth_snapshot(10)));
    });

    group.finish();
}

criterion_group!(benches, matching_benchmark);
criterion_main!(benches);
