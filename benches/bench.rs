// Criterion benchmarks for Bloodlink

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use bloodlink::core::{exclude_ids, haversine_distance, rank_by_distance};
use bloodlink::models::{DonorSummary, GeoPoint};
use std::collections::HashSet;

fn create_donor(id: usize, lat: f64, lon: f64) -> DonorSummary {
    DonorSummary {
        id: id as i64,
        name: format!("Donor {}", id),
        blood_group: ["A+", "B+", "O+", "AB-"][id % 4].to_string(),
        age: 20 + (id % 40) as i32,
        contact: "555-0100".to_string(),
        location: GeoPoint::new(lat, lon),
    }
}

fn create_donors(count: usize) -> Vec<DonorSummary> {
    (0..count)
        .map(|i| {
            let lat_offset = (i as f64 * 0.013) % 4.0 - 2.0;
            let lon_offset = (i as f64 * 0.017) % 4.0 - 2.0;
            create_donor(i, 12.9716 + lat_offset, 77.5946 + lon_offset)
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(12.9716),
                black_box(77.5946),
                black_box(13.0827),
                black_box(80.2707),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let origin = GeoPoint::new(12.9716, 77.5946);
    let mut group = c.benchmark_group("ranking");

    for donor_count in [100, 1_000, 10_000].iter() {
        let donors = create_donors(*donor_count);

        group.bench_with_input(
            BenchmarkId::new("rank_by_distance", donor_count),
            donor_count,
            |b, _| {
                b.iter(|| rank_by_distance(black_box(origin), black_box(donors.clone())));
            },
        );
    }

    group.finish();
}

fn bench_receiver_view(c: &mut Criterion) {
    let origin = GeoPoint::new(12.9716, 77.5946);
    let donors = create_donors(1_000);
    let requested: HashSet<i64> = (0..1_000).step_by(7).collect();

    c.bench_function("exclude_then_rank_1000_donors", |b| {
        b.iter(|| {
            let remaining = exclude_ids(black_box(donors.clone()), black_box(&requested));
            rank_by_distance(origin, remaining)
        });
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_ranking,
    bench_receiver_view
);
criterion_main!(benches);
