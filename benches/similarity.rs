use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use faunara::attributes::{AttributeValue, Attributes};
use faunara::db::AnimalRecord;
use faunara::similarity::{cosine_similarity, find_best_attribute_match, find_best_image_match};
use rand::prelude::*;

const DIM: usize = 312;
const ANIMALS: usize = 10_000;

fn random_vector(rng: &mut impl Rng) -> Vec<f32> {
    (0..DIM).map(|_| rng.random_range(-1.0..1.0)).collect()
}

fn random_attributes(rng: &mut impl Rng) -> Attributes {
    let diets = ["herbivore", "carnivore", "omnivore"];
    let mut attributes = Attributes::new();
    attributes.insert("legs".to_string(), AttributeValue::from(rng.random_range(0..9i64)));
    attributes.insert("diet".to_string(), AttributeValue::from(diets[rng.random_range(0..diets.len())]));
    attributes.insert("weight".to_string(), AttributeValue::from(rng.random_range(0.1..500.0f64)));
    attributes
}

fn catalog(rng: &mut impl Rng) -> Vec<AnimalRecord> {
    (0..ANIMALS)
        .map(|i| AnimalRecord {
            id: i as i64 + 1,
            name: format!("animal-{i}"),
            habitat: String::new(),
            facts: String::new(),
            attributes: random_attributes(rng),
            image_path: None,
            feature_vector: Some(random_vector(rng)),
        })
        .collect()
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cosine");
    let mut rng = rand::rng();
    let a = random_vector(&mut rng);
    let b = random_vector(&mut rng);

    group.throughput(Throughput::Elements(DIM as u64));
    group.bench_function("cosine_similarity", |bench| {
        bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
    });
    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("BestMatch");
    let mut rng = rand::rng();
    let animals = catalog(&mut rng);
    let query = random_vector(&mut rng);
    let attributes = random_attributes(&mut rng);

    group.throughput(Throughput::Elements(animals.len() as u64));
    group.bench_function("image", |b| {
        b.iter(|| find_best_image_match(black_box(&query), &animals).map(|m| m.score));
    });
    group.bench_function("attributes", |b| {
        b.iter(|| find_best_attribute_match(black_box(&attributes), &animals).map(|m| m.score));
    });
    group.finish();
}

criterion_group!(benches, bench_cosine, bench_best_match);
criterion_main!(benches);
