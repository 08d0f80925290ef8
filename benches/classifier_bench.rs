//! Criterion benchmarks for classifier training and prediction.

use std::hint::black_box;

use augur::classifier::{ClassifierConfig, TextClassifier, TrainSample};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

/// Generate a synthetic two-class dataset for benchmarking.
fn generate_dataset(rows: usize) -> Vec<TrainSample> {
    let positive = [
        "great", "love", "excellent", "wonderful", "amazing", "perfect", "happy", "fantastic",
        "enjoyed", "brilliant", "superb", "delightful",
    ];
    let negative = [
        "terrible", "hate", "awful", "horrible", "disappointing", "broken", "sad", "useless",
        "boring", "dreadful", "poor", "annoying",
    ];

    let mut dataset = Vec::with_capacity(rows);
    for i in 0..rows {
        let (words, label): (&[&str], usize) = if i % 2 == 0 {
            (&positive, 0)
        } else {
            (&negative, 1)
        };
        let a = words[i % words.len()];
        let b = words[(i / 2 + 3) % words.len()];
        let c = words[(i / 3 + 7) % words.len()];
        dataset.push(TrainSample::new(format!("{a} {b} {c} service"), label));
    }
    dataset
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");

    for rows in [100, 500] {
        let dataset = generate_dataset(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_function(format!("train_{rows}_rows"), |b| {
            b.iter(|| {
                let mut classifier = TextClassifier::new(ClassifierConfig::default()).unwrap();
                classifier.train(black_box(&dataset)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let dataset = generate_dataset(500);
    let mut classifier = TextClassifier::new(ClassifierConfig::default()).unwrap();
    classifier.train(&dataset).unwrap();

    group.bench_function("predict_known_bigrams", |b| {
        b.iter(|| classifier.predict(black_box("great excellent wonderful service")));
    });

    group.bench_function("predict_cold_start", |b| {
        let mut i = 0u64;
        b.iter(|| {
            // vary the message so the tokenize cache misses
            i += 1;
            let message = format!("love dreadful service {i}");
            classifier.predict(black_box(&message))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_training, bench_prediction);
criterion_main!(benches);
