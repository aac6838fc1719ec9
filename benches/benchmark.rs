// Performance benchmarks for the kindred engine
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kindred::{
    CatalogIndex, CatalogItem, ItemDetails, ItemId, RecommendEngine, SimilarityMatrix, UserRating,
};
use rand::prelude::*;

fn synthetic_titles(count: usize) -> Vec<String> {
    let words = [
        "shadow", "river", "crown", "winter", "garden", "empire", "night", "stone", "echo",
        "harvest", "voyage", "silence", "storm", "mirror", "hollow", "ember",
    ];
    let mut rng = rand::rng();
    (0..count)
        .map(|i| {
            let a = words[rng.random_range(0..words.len())];
            let b = words[rng.random_range(0..words.len())];
            format!("the {a} of the {b} {i}")
        })
        .collect()
}

fn synthetic_engine(count: usize) -> RecommendEngine {
    let titles = synthetic_titles(count);
    let entries: Vec<CatalogItem> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            CatalogItem::new(
                ItemId::Id(i as u64),
                title.clone(),
                ItemDetails::Movie {
                    overview: String::new(),
                    genres: vec![],
                    cast: None,
                    crew: None,
                    homepage: None,
                    image: None,
                    popularity: None,
                    vote_average: None,
                },
            )
        })
        .collect();

    let mut rng = rand::rng();
    let rows: Vec<Vec<f32>> = (0..count)
        .map(|i| {
            (0..count)
                .map(|j| if i == j { 1.0 } else { rng.random_range(0.0f32..0.9f32) })
                .collect()
        })
        .collect();

    RecommendEngine::new(
        CatalogIndex::from_entries(entries),
        SimilarityMatrix::from_rows(rows).unwrap(),
    )
    .unwrap()
}

fn benchmark_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let engine = synthetic_engine(2000);
    let exact = engine.catalog().display_title(1234).unwrap().to_string();
    let misspelled = format!("{}x", &exact[..exact.len() - 3]);

    group.bench_function("exact", |b| {
        b.iter(|| black_box(engine.related(black_box(&exact))))
    });
    group.bench_function("fuzzy", |b| {
        b.iter(|| black_box(engine.related(black_box(&misspelled))))
    });
    group.finish();
}

fn benchmark_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");

    for size in [500, 2000].iter() {
        group.bench_with_input(BenchmarkId::new("history_20", size), size, |b, &size| {
            let engine = synthetic_engine(size);
            let history: Vec<UserRating> = (0..20)
                .map(|i| UserRating {
                    title: engine.catalog().display_title(i * 7).unwrap().to_string(),
                    rating: 1 + (i % 10) as u8,
                })
                .collect();

            b.iter(|| black_box(engine.recommend_for_user(black_box(&history), 10)));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_resolve, benchmark_recommend);
criterion_main!(benches);
