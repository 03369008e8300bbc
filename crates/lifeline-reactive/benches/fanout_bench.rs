//! Benchmarks for notification fan-out.
//!
//! Performance budgets:
//! - ChangeNotifier dispatch (16 listeners): < 1µs
//! - StateStream set_value (16 active subscribers): < 2µs
//!
//! Run with: cargo bench -p lifeline-reactive --bench fanout_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lifeline_core::{Event, LifecycleRegistry};
use lifeline_reactive::{ChangeNotifier, ObservableField, StateStream};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

fn active_owner() -> LifecycleRegistry {
    let owner = LifecycleRegistry::new();
    owner.handle_event(Event::Create).unwrap();
    owner.handle_event(Event::Start).unwrap();
    owner
}

fn bench_notifier_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("notifier/notify_changed");

    for listeners in [1usize, 4, 16, 64] {
        group.throughput(Throughput::Elements(listeners as u64));
        let notifier = ChangeNotifier::new();
        let hits = Rc::new(Cell::new(0u64));
        for _ in 0..listeners {
            let hits = Rc::clone(&hits);
            notifier.add_listener("age", move |_| hits.set(hits.get() + 1));
        }
        group.bench_with_input(
            BenchmarkId::new("listeners", listeners),
            &notifier,
            |b, notifier| b.iter(|| notifier.notify_changed(black_box("age"))),
        );
    }

    group.finish();
}

fn bench_field_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/set");

    for listeners in [0usize, 4, 16] {
        group.throughput(Throughput::Elements(listeners.max(1) as u64));
        let field = ObservableField::new("count", 0u64);
        let hits = Rc::new(Cell::new(0u64));
        for _ in 0..listeners {
            let hits = Rc::clone(&hits);
            field.add_listener(move |_| hits.set(hits.get() + 1));
        }
        group.bench_with_input(
            BenchmarkId::new("listeners", listeners),
            &field,
            |b, field| {
                let mut n = 0u64;
                b.iter(|| {
                    n = n.wrapping_add(1);
                    field.set(black_box(n));
                });
            },
        );
    }

    group.finish();
}

fn bench_stream_set_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream/set_value");

    for subscribers in [1usize, 4, 16, 64] {
        group.throughput(Throughput::Elements(subscribers as u64));
        let stream = StateStream::with_value(0u64);
        let owner = active_owner();
        let hits = Rc::new(Cell::new(0u64));
        for _ in 0..subscribers {
            let hits = Rc::clone(&hits);
            stream
                .observe(&owner, move |_| hits.set(hits.get() + 1))
                .unwrap();
        }
        group.bench_with_input(
            BenchmarkId::new("active", subscribers),
            &stream,
            |b, stream| {
                let mut n = 0u64;
                b.iter(|| {
                    n = n.wrapping_add(1);
                    stream.set_value(black_box(n));
                });
            },
        );
    }

    group.finish();
}

fn bench_registry_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry/handle_event");

    for observers in [1usize, 16, 64] {
        group.throughput(Throughput::Elements(observers as u64));
        group.bench_with_input(
            BenchmarkId::new("observers", observers),
            &observers,
            |b, &observers| {
                b.iter_batched(
                    || {
                        let registry = LifecycleRegistry::new();
                        for _ in 0..observers {
                            registry
                                .add_observer(lifeline_core::observer_fn(|_, _| {}))
                                .unwrap();
                        }
                        registry
                    },
                    |registry| {
                        registry.handle_event(black_box(Event::Create)).unwrap();
                        registry.handle_event(black_box(Event::Start)).unwrap();
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_notifier_dispatch,
    bench_field_set,
    bench_stream_set_value,
    bench_registry_transition
);
criterion_main!(benches);
