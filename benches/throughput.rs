use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use netmeter::NetworkStatsAggregator;
use std::thread;

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");
    group.throughput(Throughput::Elements(1));

    let aggregator = NetworkStatsAggregator::new();
    group.bench_function("record_sent_uncontended", |b| {
        b.iter(|| aggregator.record_sent(black_box(1200)))
    });

    group.bench_function("record_sent_4_threads", |b| {
        b.iter_custom(|iters| {
            let aggregator = NetworkStatsAggregator::new();
            let start = std::time::Instant::now();
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let agg = aggregator.clone();
                    thread::spawn(move || {
                        for _ in 0..iters {
                            agg.record_sent(black_box(1200));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            start.elapsed() / 4
        })
    });

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let aggregator = NetworkStatsAggregator::new();
    aggregator.record_sent(1200);
    aggregator.record_received(800);

    c.bench_function("snapshot", |b| b.iter(|| black_box(aggregator.snapshot())));
}

criterion_group!(benches, bench_record, bench_snapshot);
criterion_main!(benches);
