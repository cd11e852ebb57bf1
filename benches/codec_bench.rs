//! Performance benchmarks for the frame codec.
//!
//! The device decodes a frame and packs a reply inside the bus receive
//! handler, so both paths should stay in the nanosecond range.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench codec_bench
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use statuslink_protocol::{decode, encode, pack_response, unpack_response};

/// Benchmark encoding every valid command/data combination.
fn bench_encode_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Elements(128));

    group.bench_function("encode_all_frames", |b| {
        b.iter(|| {
            for command in 0u8..=7 {
                for data in 0u8..=15 {
                    black_box(encode(black_box(command), black_box(data)).unwrap());
                }
            }
        });
    });

    group.finish();
}

/// Benchmark decoding every possible byte, half of which fail parity.
fn bench_decode_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(256));

    group.bench_function("decode_all_bytes", |b| {
        b.iter(|| {
            for byte in 0u8..=255 {
                let _ = black_box(decode(black_box(byte)));
            }
        });
    });

    group.finish();
}

/// Benchmark the reply pack/unpack pair.
fn bench_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("response");
    group.throughput(Throughput::Elements(1));

    group.bench_function("pack_unpack", |b| {
        b.iter(|| {
            let reply = pack_response(black_box(0x8A));
            black_box(unpack_response(reply.status, reply.check).unwrap());
        });
    });

    group.bench_function("unpack_corrupted", |b| {
        b.iter(|| {
            let _ = black_box(unpack_response(black_box(0x8A), black_box(0x8A)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode_all, bench_decode_all, bench_response);
criterion_main!(benches);
