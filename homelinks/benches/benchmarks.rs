//! Benchmark suite for homelinks
//!
//! Run with: `cargo bench --bench benchmarks`
//! View report: `open target/criterion/report/index.html`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use homelinks::document::{Bookmark, Category, Document, EmptyCategoryPolicy, MoveTarget};
use homelinks::format::{deserialize, serialize};
use homelinks::storage::{decode_document, encode_document};

// =============================================================================
// Test Data Generation
// =============================================================================

const HOSTS: [&str; 8] = [
    "github.com",
    "www.rust-lang.org",
    "docs.rs",
    "crates.io",
    "news.ycombinator.com",
    "192.168.1.20:8096",
    "drive.google.com",
    "notion.so",
];

/// Document with `bookmark_count` bookmarks spread over categories of ten,
/// every fourth bookmark repeating an earlier URL of its category
fn generate_document(bookmark_count: usize) -> Document {
    let categories = (0..bookmark_count.div_ceil(10))
        .map(|ci| {
            let entries = (0..10.min(bookmark_count - ci * 10))
                .map(|bi| {
                    let host = HOSTS[(ci + bi) % HOSTS.len()];
                    let url = if bi % 4 == 3 {
                        format!("https://{host}/page/{}", bi - 1)
                    } else {
                        format!("https://{host}/page/{bi}")
                    };
                    let bookmark = Bookmark::new(format!("Bookmark {ci}-{bi}: {host}"), url);
                    if bi % 2 == 0 {
                        bookmark.with_icon(format!("https://icons.test/{host}.png"))
                    } else {
                        bookmark
                    }
                })
                .collect();
            Category::with_entries(format!("Category {ci}"), entries)
        })
        .collect();
    Document::from_categories(categories, EmptyCategoryPolicy::KeepEmpty)
}

// =============================================================================
// Format Benchmarks
// =============================================================================

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");

    for bookmark_count in [10, 100, 1000] {
        let document = generate_document(bookmark_count);
        let text = serialize(&document);

        group.bench_with_input(
            BenchmarkId::new("serialize", bookmark_count),
            &document,
            |b, document| {
                b.iter(|| serialize(black_box(document)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("deserialize", bookmark_count),
            &text,
            |b, text| {
                b.iter(|| deserialize(black_box(text)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Document Benchmarks
// =============================================================================

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    for bookmark_count in [100, 1000] {
        let document = generate_document(bookmark_count);

        group.bench_with_input(
            BenchmarkId::new("find_duplicates", bookmark_count),
            &document,
            |b, document| {
                b.iter(|| black_box(document.find_duplicates()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("deduplicate", bookmark_count),
            &document,
            |b, document| {
                b.iter_batched(
                    || document.clone(),
                    |mut document| black_box(document.deduplicate()),
                    criterion::BatchSize::SmallInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("move_across_categories", bookmark_count),
            &document,
            |b, document| {
                b.iter_batched(
                    || document.clone(),
                    |mut document| {
                        let last = document.categories().len() - 1;
                        black_box(document.move_bookmark(0, 0, last, MoveTarget::End))
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// =============================================================================
// Storage Benchmarks
// =============================================================================

fn bench_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage");

    for bookmark_count in [100, 1000] {
        let document = generate_document(bookmark_count);
        let encoded = encode_document(&document).expect("Failed to encode document");

        group.bench_with_input(
            BenchmarkId::new("encode", bookmark_count),
            &document,
            |b, document| {
                b.iter(|| encode_document(black_box(document)));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("decode", bookmark_count),
            &encoded,
            |b, encoded| {
                b.iter(|| decode_document(black_box(encoded), EmptyCategoryPolicy::RemoveEmpty));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_format, bench_document, bench_storage);

criterion_main!(benches);
