// Formatting hot paths: every dialog open runs these for all fourteen fields
// Run with: cargo bench --bench format_performance

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lesverk_core::{format, pdf_date, L10n, PageSizeInches};

fn benchmark_formatting(c: &mut Criterion) {
    let en_us = L10n::new("en-US");
    let is = L10n::new("is");

    c.bench_function("file_size_megabytes", |b| {
        b.iter(|| {
            let text = format::file_size(black_box(52_428_800), &en_us);
            black_box(text);
        })
    });

    c.bench_function("page_size_named_match", |b| {
        let letter = PageSizeInches {
            width: 8.5,
            height: 11.0,
        };
        b.iter(|| {
            let text = format::page_size(black_box(letter), 0, &en_us);
            black_box(text);
        })
    });

    c.bench_function("page_size_fuzzy_match", |b| {
        let near_a4 = PageSizeInches {
            width: 209.93 / 25.4,
            height: 296.93 / 25.4,
        };
        b.iter(|| {
            let text = format::page_size(black_box(near_a4), 0, &is);
            black_box(text);
        })
    });

    c.bench_function("pdf_date_parse_and_render", |b| {
        b.iter(|| {
            let text = format::date_time(black_box(Some("D:20240615142312+02'00'")), &en_us);
            black_box(text);
        })
    });

    c.bench_function("pdf_date_parse_only", |b| {
        b.iter(|| {
            let stamp = pdf_date::parse(black_box("D:20240615142312+02'00'"));
            black_box(stamp);
        })
    });
}

criterion_group!(benches, benchmark_formatting);
criterion_main!(benches);
