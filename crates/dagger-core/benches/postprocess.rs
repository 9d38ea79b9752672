//! Benchmarks for tag post-processing and WD14 preprocessing.
//!
//! Run with: cargo bench -p dagger-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::DynamicImage;

use dagger_core::tags::{postprocess_tags, PostprocessOptions, TagFilter};
use dagger_core::types::ScoredTag;

fn sample_tags(n: usize) -> Vec<ScoredTag> {
    (0..n)
        .map(|i| {
            ScoredTag::new(
                format!("tag_number_{i}_(series)"),
                (i % 100) as f32 / 100.0,
            )
        })
        .collect()
}

fn benchmark_postprocess(c: &mut Criterion) {
    let tags = sample_tags(10_000);
    let opts = PostprocessOptions {
        threshold: 0.35,
        escape: true,
        filter: TagFilter::parse(&["tag_number_50_(series),tag_number_51_(series)".to_string()]),
    };

    c.bench_function("postprocess_10k_tags", |b| {
        b.iter(|| {
            let _ = postprocess_tags(black_box(&tags), black_box(&opts));
        })
    });
}

fn benchmark_preprocess(c: &mut Criterion) {
    let img = DynamicImage::new_rgb8(1920, 1080);

    c.bench_function("wd14_preprocess_448", |b| {
        b.iter(|| {
            let _ = dagger_core::interrogator::preprocess(black_box(&img), 448);
        })
    });
}

criterion_group!(benches, benchmark_postprocess, benchmark_preprocess);
criterion_main!(benches);
