// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for modeshift
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Tonic inference over large collections
//! - Mode transform throughput
//! - MIDI parse, convert and write round trips

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use modeshift::config::ConverterConfig;
use modeshift::midi::MidiExporter;
use modeshift::pipeline::convert_bytes;
use modeshift::{analyze_tonic, apply_mode, Instrument, Note, NoteCollection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random piano-range material spread over four instruments
fn random_collection(size: usize) -> NoteCollection {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    (0..4u8)
        .map(|channel| {
            let mut inst = Instrument::new(format!("Part {}", channel + 1), channel);
            for i in 0..size / 4 {
                let start = i as u64 * 120;
                let pitch = rng.gen_range(21..=108);
                inst.add_note(Note::new(pitch, rng.gen_range(40..=120), start, start + 120).unwrap());
            }
            inst
        })
        .collect()
}

/// Benchmark pitch-class histogram and tonic selection
fn bench_tonic_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("tonic_inference");

    for size in [100, 1000, 10000].iter() {
        let notes = random_collection(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &notes, |b, notes| {
            b.iter(|| black_box(analyze_tonic(black_box(notes)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark the modal transform on fresh copies of a collection
fn bench_apply_mode(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_mode");

    for size in [100, 1000, 10000].iter() {
        let notes = random_collection(*size);
        for mode in ["aeolian", "locrian", "major"] {
            group.bench_with_input(BenchmarkId::new(mode, size), &notes, |b, notes| {
                b.iter_batched(
                    || notes.clone(),
                    |mut notes| {
                        apply_mode(&mut notes, 0, mode).unwrap();
                        black_box(notes)
                    },
                    criterion::BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

/// Benchmark the whole bytes-in, bytes-out conversion
fn bench_file_conversion(c: &mut Criterion) {
    let config = ConverterConfig::default();
    let bytes = MidiExporter::new()
        .export_to_bytes(&random_collection(4000))
        .unwrap();

    c.bench_function("convert_bytes_4000_notes", |b| {
        b.iter(|| black_box(convert_bytes(black_box(&bytes), "dorian", &config).unwrap()))
    });
}

criterion_group!(benches, bench_tonic_inference, bench_apply_mode, bench_file_conversion);
criterion_main!(benches);
