//! Table-driven vs bit-at-a-time decoding.
//!
//! Run with: cargo bench --bench decode

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use symcodec_core::bytes::ByteReader;
use symcodec_core::stream::Collector;
use symcodec_core::{Alphabet, CharacterCodec, Codec, HuffmanCodec};

fn skewed_alphabet(size: u16) -> Alphabet<u16> {
    Alphabet::new((0..size).map(|symbol| (symbol, 1_000_000 / (u64::from(symbol) + 1))))
        .expect("alphabet")
}

fn make_symbols(size: u16, count: usize, seed: u64) -> Vec<u16> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            // Square the sample to favor low (frequent) symbols
            let r: f64 = rng.gen();
            ((r * r) * f64::from(size)) as u16 % size
        })
        .collect()
}

fn bench_symbols(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_symbols");

    for (size, max_bits) in [(16u16, 8u8), (256, 12), (4096, 16)] {
        let codec = HuffmanCodec::new(&skewed_alphabet(size), max_bits).expect("codec");
        let symbols = make_symbols(size, 100_000, 0x5eed);
        let encoded = codec.encode_symbols(&symbols).expect("encode");
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        group.bench_with_input(BenchmarkId::new("fast", size), &encoded, |b, data| {
            b.iter(|| {
                let mut collector = Collector::new(symbols.len());
                codec
                    .decode(&mut ByteReader::new(black_box(data)), &mut collector)
                    .expect("decode");
                black_box(collector.into_symbols());
            });
        });

        group.bench_with_input(BenchmarkId::new("slow", size), &encoded, |b, data| {
            b.iter(|| {
                let mut collector = Collector::new(symbols.len());
                codec
                    .decode_slow(&mut ByteReader::new(black_box(data)), &mut collector)
                    .expect("decode");
                black_box(collector.into_symbols());
            });
        });
    }

    group.finish();
}

fn bench_strings(c: &mut Criterion) {
    let text = "The quick brown fox jumps over the lazy dog. ".repeat(2_000);
    let words: Vec<String> = text.split(' ').map(str::to_string).collect();
    let codec = CharacterCodec::train(&words, 1, 16).expect("codec");
    let encoded = codec.encode_strings(&words).expect("encode");

    let mut group = c.benchmark_group("decode_strings");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("fast", |b| {
        b.iter(|| {
            black_box(
                codec
                    .decode_strings(black_box(&encoded), words.len())
                    .expect("decode"),
            )
        });
    });

    group.bench_function("slow", |b| {
        b.iter(|| {
            let mut collector = Collector::new(words.len());
            codec
                .decode_slow(&mut ByteReader::new(black_box(&encoded)), &mut collector)
                .expect("decode");
            black_box(collector.into_symbols());
        });
    });

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_codec");

    for (size, max_bits) in [(256u16, 12u8), (4096, 16)] {
        let alphabet = skewed_alphabet(size);
        group.bench_with_input(BenchmarkId::new("tables", size), &alphabet, |b, alphabet| {
            b.iter(|| black_box(HuffmanCodec::new(alphabet, max_bits).expect("codec")));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_symbols, bench_strings, bench_construction);
criterion_main!(benches);
