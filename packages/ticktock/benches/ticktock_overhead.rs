//! Benchmarks to measure the compute overhead of `ticktock` logic itself.
//!
//! Every benchmark opens and ends empty profiles, so the measured time is the cost of
//! the profiling machinery alone.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ticktock::{TickTock, thread_default};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("ticktock_overhead");

    group.bench_function("baseline_empty", |b| {
        b.iter(|| {
            black_box(());
        });
    });

    let mut tt = TickTock::new();

    group.bench_function("tick_tock", |b| {
        b.iter(|| {
            tt.tick();
            black_box(tt.tock().unwrap());
        });
    });

    group.bench_function("scoped_profile", |b| {
        b.iter(|| {
            let _profile = tt.profile("scoped");
            black_box(());
        });
    });

    group.bench_function("scoped_profile_nested", |b| {
        b.iter(|| {
            let mut outer = tt.profile("outer");
            let _inner = outer.profile("inner");
            black_box(());
        });
    });

    group.bench_function("manual_profile", |b| {
        b.iter(|| {
            tt.start_profile("manual");
            black_box(tt.end_profile_named("manual").unwrap());
        });
    });

    group.bench_function("thread_default_profile", |b| {
        b.iter(|| {
            thread_default::with(|tt| {
                let _profile = tt.profile("default");
                black_box(());
            });
        });
    });

    group.finish();

    // Reporting walks the whole tree, so give it one worth walking.
    let mut wide = TickTock::new();
    for i in 0..100 {
        let mut outer = wide.profile(format!("outer {i}"));
        for j in 0..10 {
            let _inner = outer.profile(format!("inner {j}"));
        }
    }

    let mut group = c.benchmark_group("ticktock_reporting");

    group.bench_function("stringify_1100_profiles", |b| {
        b.iter(|| {
            black_box(wide.stringify_sections(None).unwrap().to_string());
        });
    });

    group.bench_function("fuse_1100_profiles", |b| {
        b.iter(|| {
            black_box(TickTock::fuse_multiple(&[&wide, &wide.clone()]).unwrap());
        });
    });

    group.finish();
}
