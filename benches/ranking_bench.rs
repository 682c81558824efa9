//! Ranking Benchmarks - Per-cycle Domain Pipeline
//!
//! Benchmarks normalize + rank + render on synthetic payloads sized
//! like a busy listing page.
//!
//! Run with: cargo bench --bench ranking_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use osrs_gold_tracker::domain::normalizer::normalize_payload;
use osrs_gold_tracker::domain::offer::{Offer, Side, Source};
use osrs_gold_tracker::domain::ranking::rank;
use osrs_gold_tracker::domain::summary::render;

/// A merchants.to listing with `n` offers.
fn merchants_payload(n: usize) -> Value {
    let data: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "seller_id": format!("seller{i}"),
                "gold": {"price": format!("0.{:04}", 1800 + (i * 37) % 700), "stock": i * 10}
            })
        })
        .collect();
    json!({"success": true, "data": data})
}

/// An eldorado.gg results page with `n` offers.
fn eldorado_payload(n: usize) -> Value {
    let results: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "user": {"username": format!("user{i}")},
                "offer": {"pricePerUnit": {"amount": 0.15 + (i % 50) as f64 / 1000.0}, "quantity": i}
            })
        })
        .collect();
    json!({"results": results})
}

/// Benchmark normalization of a 200-record listing.
fn bench_normalize(c: &mut Criterion) {
    let payload = merchants_payload(200);

    c.bench_function("normalize_merchants_200", |b| {
        b.iter(|| {
            let _batch = normalize_payload(Source::Merchants, Side::Buy, black_box(&payload));
        });
    });
}

/// Benchmark ranking four groups of 200 offers.
fn bench_rank(c: &mut Criterion) {
    let mut offers: Vec<Offer> = Vec::new();
    for side in Side::ALL {
        offers.extend(normalize_payload(Source::Merchants, side, &merchants_payload(200)).offers);
        offers.extend(normalize_payload(Source::Eldorado, side, &eldorado_payload(200)).offers);
    }

    c.bench_function("rank_800_offers", |b| {
        b.iter(|| {
            let _groups = rank(black_box(&offers));
        });
    });
}

/// Benchmark a full cycle's domain work: normalize, rank, render.
fn bench_full_pipeline(c: &mut Criterion) {
    let merchants = merchants_payload(100);
    let eldorado = eldorado_payload(100);

    c.bench_function("pipeline_400_records", |b| {
        b.iter(|| {
            let mut offers = Vec::new();
            for side in Side::ALL {
                offers.extend(normalize_payload(Source::Merchants, side, black_box(&merchants)).offers);
                offers.extend(normalize_payload(Source::Eldorado, side, black_box(&eldorado)).offers);
            }
            let groups = rank(&offers);
            let _summary = render(&groups, "bench");
        });
    });
}

criterion_group!(benches, bench_normalize, bench_rank, bench_full_pipeline);
criterion_main!(benches);
