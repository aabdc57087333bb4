//! Criterion benchmarks for structured_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use structured_logger::prelude::*;
use structured_logger::{translate, EncoderConfig};

fn sink_logger(min_level: LogLevel) -> Logger {
    Logger::builder()
        .min_level(min_level)
        .writer(std::io::sink())
        .static_fields(vec![
            fields::string("service", "bench"),
            fields::string("region", "eu-west-1"),
        ])
        .build()
}

fn request_fields() -> Vec<Field> {
    vec![
        fields::string("method", "GET"),
        fields::string("path", "/api/v1/orders"),
        fields::uint16("status", 200),
        fields::duration("elapsed", chrono::Duration::microseconds(1250)),
        fields::int64("bytes", 5120),
        fields::bool("cached", false),
    ]
}

// ============================================================================
// Field Construction Benchmarks
// ============================================================================

fn bench_field_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_construction");
    group.throughput(Throughput::Elements(1));

    group.bench_function("int64", |b| {
        b.iter(|| black_box(fields::int64(black_box("count"), black_box(42))));
    });

    group.bench_function("string", |b| {
        b.iter(|| black_box(fields::string(black_box("user"), black_box("ana"))));
    });

    group.bench_function("stringer", |b| {
        b.iter(|| black_box(fields::stringer("addr", black_box(1234_u32))));
    });

    group.bench_function("any_int", |b| {
        b.iter(|| black_box(fields::any("count", black_box(42_i64))));
    });

    group.bench_function("any_fallback", |b| {
        b.iter(|| black_box(fields::any("pair", black_box((1, "two")))));
    });

    group.bench_function("stack", |b| {
        b.iter(|| black_box(fields::stack("stack")));
    });

    group.finish();
}

// ============================================================================
// Translation Benchmarks
// ============================================================================

fn bench_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation");
    let config = EncoderConfig::default();

    for count in [1usize, 6, 24] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let batch: Vec<Field> = request_fields().into_iter().cycle().take(count).collect();
                black_box(translate(batch, &config))
            });
        });
    }

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_disabled_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("disabled_level");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(LogLevel::Error);
    let ctx = Context::background();

    group.bench_function("typed", |b| {
        b.iter(|| logger.debug(&ctx, black_box("Debug message"), request_fields()));
    });

    group.bench_function("sugared", |b| {
        b.iter(|| {
            logger.debugw(
                &ctx,
                black_box("Debug message"),
                vec![Untyped::new("status"), Untyped::new(200_u16)],
            )
        });
    });

    group.bench_function("no_fields", |b| {
        b.iter(|| logger.info(&ctx, black_box("Info message"), Vec::new()));
    });

    group.finish();
}

fn bench_enabled_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("enabled_json");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(LogLevel::Debug);
    let ctx = Context::background();

    group.bench_function("typed", |b| {
        b.iter(|| logger.info(&ctx, black_box("Request processed"), request_fields()));
    });

    group.bench_function("sugared", |b| {
        b.iter(|| {
            logger.infow(
                &ctx,
                black_box("Request processed"),
                vec![
                    Untyped::new("method"),
                    Untyped::new("GET"),
                    Untyped::new("status"),
                    Untyped::new(200_u16),
                ],
            )
        });
    });

    #[derive(Debug)]
    struct RequestId(u64);

    let dynamic = Logger::builder()
        .writer(std::io::sink())
        .dynamic_fields(|ctx| match ctx.value::<RequestId>() {
            Some(id) => vec![fields::uint64("request_id", id.0)],
            None => Vec::new(),
        })
        .build();
    let request_ctx = Context::background().with_value(RequestId(7));

    group.bench_function("dynamic_fields", |b| {
        b.iter(|| dynamic.info(&request_ctx, black_box("Request processed"), request_fields()));
    });

    group.finish();
}

fn bench_async_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_logging");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .writer(std::io::sink())
        .async_mode(10000)
        .overflow_policy(OverflowPolicy::DropNewest)
        .build();
    let ctx = Context::background();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(&ctx, black_box("Async message"), request_fields()));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let logger = Arc::new(sink_logger(LogLevel::Info));
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            let ctx = Context::background();
                            for i in 0..100 {
                                logger.info(&ctx, "Concurrent message", vec![fields::int("i", i)]);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_field_construction,
    bench_translation,
    bench_disabled_level,
    bench_enabled_json,
    bench_async_logging,
    bench_concurrent_logging,
);

criterion_main!(benches);
