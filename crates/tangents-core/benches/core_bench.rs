//! Criterion benchmarks for tangents-core
//!
//! Run with: cargo bench -p tangents-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tangents_core::host::{Algorithm, ParamIndex};
use tangents_core::{
    Effect, FilterMode, Model, Oversample, SvfCoefficients, TangentsFilter, fast_tanh,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_oversampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oversampling");
    let input = generate_test_signal(128);

    for oversample in Oversample::ALL {
        group.bench_with_input(
            BenchmarkId::new("block_128", oversample.factor()),
            &oversample,
            |b, &os| {
                let mut filter = TangentsFilter::new(SAMPLE_RATE);
                filter.set_oversample(os);
                filter.set_resonance(0.8);
                let mut buffer = input.clone();
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.process_block_inplace(black_box(&mut buffer));
                });
            },
        );
    }

    group.finish();
}

fn bench_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("TangentsFilter");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process_block", block_size),
            &block_size,
            |b, _| {
                let mut filter = TangentsFilter::new(SAMPLE_RATE);
                filter.set_mode(FilterMode::Bandpass);
                filter.set_model(Model::Ms);
                filter.set_resonance(0.9);
                let mut output = vec![0.0; block_size];
                b.iter(|| {
                    filter.process_block(black_box(&input), &mut output);
                    black_box(&output);
                });
            },
        );
    }

    // Coefficient calculation cost
    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(SvfCoefficients::new(
                black_box(1000.0),
                black_box(0.7),
                black_box(SAMPLE_RATE * 2.0),
            ))
        });
    });

    group.finish();
}

fn bench_models(c: &mut Criterion) {
    let mut group = c.benchmark_group("Model");
    let input = generate_test_signal(256);

    for model in Model::ALL {
        group.bench_with_input(
            BenchmarkId::new("saturate", model.name()),
            &model,
            |b, &m| {
                b.iter(|| {
                    for &sample in &input {
                        black_box(m.saturate(black_box(sample * 3.0)));
                    }
                });
            },
        );
    }

    group.bench_function("fast_tanh", |b| {
        b.iter(|| {
            for &sample in &input {
                black_box(fast_tanh(black_box(sample)));
            }
        });
    });

    group.finish();
}

fn bench_host_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("Algorithm");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("step", block_size),
            &block_size,
            |b, &frames| {
                let mut alg = Algorithm::construct(SAMPLE_RATE);
                alg.set_param(ParamIndex::Output, 2);
                alg.set_param(ParamIndex::OutputMode, 1);
                alg.set_param(ParamIndex::CvCutoff, 3);
                let mut busses = vec![0.0; frames * 3];
                busses[..frames].copy_from_slice(&input);
                b.iter(|| {
                    alg.step(black_box(&mut busses), frames / 4);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_oversampling,
    bench_block_sizes,
    bench_models,
    bench_host_step
);
criterion_main!(benches);
