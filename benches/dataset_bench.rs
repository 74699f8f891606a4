//! Benchmarks for dataset parsing and clustering
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tunimed::dataset::*;

const SPECIALTIES: [&str; 4] = ["Cardiologue", "Dentiste", "Pédiatre", "Gynécologue"];
const CITIES: [(&str, f64, f64); 4] = [
    ("Tunis", 36.8065, 10.1815),
    ("Sfax", 34.7406, 10.7603),
    ("Sousse", 35.8256, 10.6369),
    ("Ariana", 36.8665, 10.1647),
];

/// Synthetic profiles CSV with `rows` data lines around four cities
fn create_profiles_csv(rows: usize) -> String {
    let mut text = String::from("id,name,specialty,phone1,phone2,address,lat,lng,presentation,hours\n");
    for i in 0..rows {
        let (city, lat, lng) = CITIES[i % CITIES.len()];
        let jitter = (i % 97) as f64 * 0.002;
        text.push_str(&format!(
            "{i},\"Dr. Doctor {i}\",{},71 000 {:03},,\"Rue {i}, {city}\",{},{},,8h-17h\n",
            SPECIALTIES[i % SPECIALTIES.len()],
            i % 1000,
            lat + jitter,
            lng - jitter,
        ));
    }
    text
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [100, 1000, 10000] {
        let text = create_profiles_csv(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("profiles_{}", size), |b| {
            b.iter(|| parse_csv::<ProfileRecord>(black_box(&text)).unwrap())
        });
    }

    group.finish();
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster");
    let dataset = parse_csv::<ProfileRecord>(&create_profiles_csv(5000)).unwrap();

    for radius in ClusterRadius::ALL {
        group.bench_function(radius.key(), |b| {
            b.iter(|| cluster_points(black_box(&dataset.records), radius.degrees()))
        });
    }

    group.bench_function("filter_then_cluster", |b| {
        let filter = DoctorFilter::new().with_specialty("Dentiste");
        b.iter(|| {
            let visible = filter.apply(black_box(&dataset.records));
            cluster_points(visible.iter().copied(), ClusterRadius::Normal.degrees()).len()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_cluster);
criterion_main!(benches);
