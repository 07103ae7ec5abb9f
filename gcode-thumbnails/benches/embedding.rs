// ABOUTME: Benchmark for thumbnail encoding and ASCII framing throughput
// ABOUTME: Measures each codec and the base64 chunking path at typical slicer sizes

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gcode_thumbnails::{
    CompressedBuffer, ThumbnailData, ThumbnailFormat, compress_thumbnail, encode_ascii_thumbnail,
};
use std::hint::black_box;

fn create_thumbnail(width: u32, height: u32) -> ThumbnailData {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255]);
        }
    }
    ThumbnailData::from_rgba(width, height, pixels)
}

fn benchmark_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression");

    for (width, height) in [(16, 16), (220, 124), (300, 300)] {
        let data = create_thumbnail(width, height);
        for format in ThumbnailFormat::ALL {
            group.bench_with_input(
                BenchmarkId::new(format.tag(), format!("{}x{}", width, height)),
                &data,
                |b, data| b.iter(|| compress_thumbnail(black_box(data), format)),
            );
        }
    }

    group.finish();
}

fn benchmark_ascii_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ascii_framing");

    for size in [1024usize, 16 * 1024, 128 * 1024] {
        let buffer = CompressedBuffer::new(
            ThumbnailFormat::Png,
            (0..size).map(|i| (i % 251) as u8).collect(),
        );
        group.bench_with_input(BenchmarkId::new("encode", size), &buffer, |b, buffer| {
            b.iter(|| encode_ascii_thumbnail(black_box(buffer), 300, 300))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_compression, benchmark_ascii_framing);
criterion_main!(benches);
