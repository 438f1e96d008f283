use criterion::{criterion_group, criterion_main, Criterion};
use facematch::{Embedding, FaceIndex, IdentityRecord, Metric};

const DIM: usize = 128;

fn synthetic_vector(seed: usize) -> Vec<f32> {
    (0..DIM)
        .map(|j| ((seed * 31 + j * 7) % 97) as f32 / 97.0)
        .collect()
}

fn decide_benchmark(c: &mut Criterion) {
    let index = FaceIndex::new(DIM, Metric::Cosine);
    for i in 0..1000 {
        let raw = synthetic_vector(i);
        let embedding = Embedding::new(&raw, DIM, false).unwrap();
        index
            .insert(IdentityRecord::new(format!("person-{i}"), "", embedding))
            .unwrap();
    }
    let query = synthetic_vector(1234);
    c.bench_function("decide over 1000 faces", |b| {
        b.iter(|| index.decide(&query, 0.75).unwrap())
    });
}

criterion_group!(benches, decide_benchmark);
criterion_main!(benches);
