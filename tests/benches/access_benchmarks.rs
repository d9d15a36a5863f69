//! # Tenant-Gate Access Benchmarks
//!
//! Cost of the per-request authorization path:
//!
//! | Path | Expectation |
//! |------|-------------|
//! | `RightMatcher::matches` | O(|held|), no allocation |
//! | `RegistrySnapshot::check_access` | traversal + cached manager, no I/O |
//! | `Dispatcher::dispatch` | full request through a recorder handler |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::{RightId, SecurityContext};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tg_01_rights::{MatchMode, RightsCatalogue};
use tg_04_dispatch::RpcRequest;
use tg_tests::fixtures::{platform, snapshot, Recorder};

fn bench_right_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-01-rights");

    let dotted: Vec<String> = (0..64)
        .map(|i| format!("Tenant.Dept{}.Course{}", i % 8, i))
        .collect();
    let rights = RightsCatalogue::from_dotted(dotted.iter().map(String::as_str))
        .build()
        .unwrap();
    let matcher = rights
        .matcher(&RightId::new("Tenant"), MatchMode::WithDescendants)
        .unwrap();

    for held in [1usize, 8, 32] {
        let ctx = SecurityContext::user("u").with_rights(
            (0..held).map(|i| format!("Unrelated{}", i)).chain(["Tenant.Dept3.Course11".to_string()]),
        );
        group.throughput(Throughput::Elements(held as u64 + 1));
        group.bench_with_input(BenchmarkId::new("with_descendants", held), &ctx, |b, ctx| {
            b.iter(|| black_box(matcher.matches(ctx.held_rights())))
        });
    }

    group.finish();
}

fn bench_check_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("tg-03-registry");

    let recorder = Arc::new(Recorder::default());
    let created = Arc::new(AtomicUsize::new(0));
    let snapshot = snapshot(MatchMode::WithDescendants, &recorder, &created);
    let grades = snapshot
        .resolve(&shared_types::ComponentId::new("grades"))
        .unwrap();
    let ctx = SecurityContext::user("ta").with_right("CourseAdmin.Grades");

    group.bench_function("type_level", |b| {
        b.iter(|| black_box(snapshot.check_access(&grades, "list", &ctx)))
    });
    group.bench_function("method_level", |b| {
        b.iter(|| black_box(snapshot.check_access(&grades, "publish", &ctx)))
    });

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let platform = platform();
    let ctx = SecurityContext::user("ta").with_right("CourseAdmin.Grades");

    let mut group = c.benchmark_group("tg-04-dispatch");
    group.bench_function("granted", |b| {
        b.iter(|| {
            runtime.block_on(
                platform
                    .dispatcher
                    .dispatch(RpcRequest::get("/grades/list"), &ctx),
            )
        })
    });
    group.bench_function("forbidden", |b| {
        b.iter(|| {
            runtime.block_on(
                platform
                    .dispatcher
                    .dispatch(RpcRequest::post("/grades/publish"), &ctx),
            )
        })
    });
    group.bench_function("not_found", |b| {
        b.iter(|| {
            runtime.block_on(
                platform
                    .dispatcher
                    .dispatch(RpcRequest::get("/missing/fn"), &ctx),
            )
        })
    });
    group.finish();
}

criterion_group!(benches, bench_right_matching, bench_check_access, bench_dispatch);
criterion_main!(benches);
