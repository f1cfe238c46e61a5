use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use titlemap::config;
use titlemap::consensus::decide;
use titlemap::title::TitleCleaner;

fn sample_titles(count: usize) -> Vec<String> {
    let suffixes = [" - Google Chrome", " — Mozilla Firefox", " · Brave", "", " - notes"];
    (0..count)
        .map(|i| format!("Page number {i}{}", suffixes[i % suffixes.len()]))
        .collect()
}

fn bench_clean(c: &mut Criterion) {
    let cfg = config::load_config(None).expect("config").config;
    let cleaner = TitleCleaner::from_config(&cfg).expect("cleaner");

    let mut group = c.benchmark_group("clean_titles");
    for count in [1_000usize, 5_000] {
        let titles = sample_titles(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &titles, |b, titles| {
            b.iter(|| {
                titles
                    .iter()
                    .filter_map(|title| cleaner.clean(title))
                    .count()
            })
        });
    }
    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    c.bench_function("decide_disagreement", |b| {
        b.iter(|| decide("Open AI ChatGPT", Some("unrelated.io"), Some("openaichatgpt.com")))
    });
}

criterion_group!(benches, bench_clean, bench_decide);
criterion_main!(benches);
