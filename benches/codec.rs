//! Compression and decompression throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use huffman_toolkit::{compress, decompress};

fn sample_text(len: usize) -> Vec<u8> {
    let words = b"the quick brown fox jumps over the lazy dog while huffman codes the rest ";
    words.iter().copied().cycle().take(len).collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for size in [1024usize, 16 * 1024, 256 * 1024] {
        let data = sample_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| compress(black_box(data)).unwrap())
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for size in [1024usize, 16 * 1024, 256 * 1024] {
        let artifact = compress(&sample_text(size)).unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &artifact, |b, artifact| {
            b.iter(|| decompress(black_box(artifact)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
