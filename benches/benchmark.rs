// Benchmarks for the matching and decomposition hot paths
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use matledger::{
    CatalogItem, CompositionResolver, IdentityMatcher, RealWorldMaterial, Recipe, Vector,
};
use matledger_core::similarity::similarity_matrix;
use rand::prelude::*;

fn generate_random_vector(dim: usize) -> Vector {
    let mut rng = rand::rng();
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_materials(count: usize, dim: usize) -> Vec<RealWorldMaterial> {
    (0..count)
        .map(|i| {
            RealWorldMaterial::new(format!("Q{i}"), format!("material {i}"))
                .with_embedding(generate_random_vector(dim))
        })
        .collect()
}

fn generate_items(count: usize, dim: usize) -> Vec<CatalogItem> {
    (0..count)
        .map(|i| {
            CatalogItem::new(format!("item_{i}"), format!("item number {i}"))
                .with_embedding(generate_random_vector(dim))
        })
        .collect()
}

fn benchmark_similarity_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_matrix");

    for size in [100, 500, 1000].iter() {
        let sources: Vec<Vector> = (0..*size).map(|_| generate_random_vector(384)).collect();
        let targets: Vec<Vector> = (0..1000).map(|_| generate_random_vector(384)).collect();

        group.bench_with_input(BenchmarkId::new("cosine", size), size, |b, _| {
            b.iter(|| {
                let matrix = similarity_matrix(black_box(&sources), black_box(&targets)).unwrap();
                black_box(matrix);
            });
        });
    }

    group.finish();
}

fn benchmark_match_materials(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_materials");

    let materials = generate_materials(1000, 384);
    let items = generate_items(5000, 384);
    let matcher = IdentityMatcher::default();

    group.bench_function("1k_x_5k", |b| {
        b.iter(|| {
            let matches = matcher
                .match_materials(black_box(&materials), black_box(&items))
                .unwrap();
            black_box(matches);
        });
    });

    group.finish();
}

fn benchmark_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposition");

    // Layered recipe graph: each item uses up to three items of the layer below
    let layers = 20;
    let width = 100;
    let mut rng = rand::rng();
    let mut items = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for i in 0..width {
            let id = format!("l{layer}_{i}");
            let item = if layer == 0 {
                CatalogItem::new(id.clone(), id).with_material(format!("ore_{}", i % 10))
            } else {
                let mut recipe = Recipe::new();
                for _ in 0..3 {
                    let below = rng.random_range(0..width);
                    let quantity = rng.random_range(1.0..4.0);
                    recipe = recipe.with(format!("l{}_{below}", layer - 1), quantity);
                }
                CatalogItem::new(id.clone(), id).with_recipe(recipe)
            };
            items.push(item);
        }
    }

    group.bench_function("cold_resolve_all", |b| {
        b.iter(|| {
            let mut resolver = CompositionResolver::new(black_box(&items));
            for item in &items {
                black_box(resolver.decompose(item));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_similarity_matrix,
    benchmark_match_materials,
    benchmark_decomposition
);
criterion_main!(benches);
