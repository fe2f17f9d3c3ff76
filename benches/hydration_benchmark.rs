use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;
use workout_tracker::db::{ActivityRepository, MemorySlotStorage};
use workout_tracker::models::{Activity, Coordinates};
use workout_tracker::services::ActivityStore;

fn benchmark_hydration(c: &mut Criterion) {
    // A thousand alternating runs and rides, one per hour
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 6, 0, 0).unwrap();
    let activities: Vec<Activity> = (0..1000)
        .map(|i| {
            let created = start + Duration::hours(i);
            let coords = Coordinates::new(37.3 + (i as f64) * 1e-4, -122.1);
            if i % 2 == 0 {
                Activity::running(coords, 5.0 + (i % 7) as f64, 30.0, 170.0, created)
            } else {
                Activity::cycling(coords, 25.0, 60.0 + (i % 11) as f64, 300.0, created)
            }
            .expect("valid activity")
        })
        .collect();

    // Repository calls are async; drive them on a current-thread runtime
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime");

    let storage = Arc::new(MemorySlotStorage::new());
    let repository = ActivityRepository::new(storage, "workouts");
    runtime
        .block_on(repository.save(&activities))
        .expect("Failed to save activities");
    let records = runtime
        .block_on(repository.load())
        .expect("Saved activities should load");

    let mut group = c.benchmark_group("hydration");

    group.bench_function("load_and_replace_all", |b| {
        b.iter(|| {
            let records = runtime.block_on(repository.load()).unwrap_or_default();
            let mut store = ActivityStore::new();
            store.replace_all(black_box(&records))
        })
    });

    group.bench_function("replace_all_only", |b| {
        let mut store = ActivityStore::new();
        b.iter(|| store.replace_all(black_box(&records)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_hydration);
criterion_main!(benches);
