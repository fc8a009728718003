//! Benchmarks for storefront-core list views and helpers

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use storefront_core::{
    ListView,
    listing::{ListOptions, page_numbers},
    types::Product,
    utils::{customer_slug, parse_price},
};

fn catalogue(size: usize) -> Vec<Product> {
    const NAMES: [&str; 6] = [
        "Taskane Marina",
        "Nivea Roll On",
        "Peak Milk",
        "Golden Penny Pasta",
        "Indomie Noodles",
        "Dettol Soap",
    ];

    NAMES
        .iter()
        .cycle()
        .take(size)
        .enumerate()
        .map(|(i, name)| Product {
            id: format!("p{i}"),
            name: format!("{name} {i}"),
            price: Some(format!("₦{},000", i % 90 + 1)),
            ..Product::default()
        })
        .collect()
}

/// Benchmark filtering and slicing a catalogue on every keystroke
fn bench_list_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_view");

    for size in [100usize, 1_000, 10_000] {
        let mut view = ListView::with_items(ListOptions::default(), catalogue(size));
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("type_query", size), &size, |b, _| {
            b.iter(|| {
                for query in ["m", "ma", "mar", "mari", ""] {
                    view.set_query(query);
                    black_box(view.displayed());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("page_through", size), &size, |b, _| {
            b.iter(|| {
                view.set_query("");
                view.set_page(1);
                let last = view.total_pages();
                for _ in 1..last.min(50) {
                    view.next_page();
                    black_box(view.displayed());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark page marker generation
fn bench_page_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_numbers");

    for (current, total) in [(1usize, 3usize), (7, 10), (500, 1_000)] {
        group.bench_with_input(
            BenchmarkId::new("markers", format!("{current}_of_{total}")),
            &(current, total),
            |b, &(current, total)| b.iter(|| page_numbers(black_box(current), total, 5)),
        );
    }

    group.finish();
}

/// Benchmark the string helpers used while rendering rows
fn bench_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("helpers");
    let products = catalogue(1_000);

    group.throughput(Throughput::Elements(products.len() as u64));
    group.bench_function("parse_prices", |b| {
        b.iter(|| {
            products
                .iter()
                .filter_map(|p| p.price.as_deref())
                .filter_map(|price| parse_price(price).ok())
                .sum::<f64>()
        });
    });

    group.bench_function("customer_slugs", |b| {
        b.iter(|| {
            products
                .iter()
                .map(|p| customer_slug(&p.name))
                .collect::<Vec<_>>()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_list_view, bench_page_numbers, bench_helpers);

criterion_main!(benches);
