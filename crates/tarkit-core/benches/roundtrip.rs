//! Benchmarks for packing and unpacking throughput.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::path::PathBuf;

use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use tarkit_core::ArchiveReader;
use tarkit_core::ArchiveWriter;
use tarkit_core::CompressionCodec;
use tarkit_core::ReaderConfig;
use tarkit_core::WriterConfig;
use tempfile::TempDir;

const FILE_SIZE: usize = 4096;

/// Creates `count` files of `FILE_SIZE` bytes under `temp/data`.
fn create_tree(temp: &TempDir, count: usize) -> PathBuf {
    let dir = temp.path().join("data");
    fs::create_dir_all(&dir).unwrap();
    let content = "tarkit benchmark payload\n".repeat(FILE_SIZE / 25 + 1);
    for i in 0..count {
        fs::write(dir.join(format!("file_{i:05}.txt")), &content[..FILE_SIZE]).unwrap();
    }
    dir
}

fn pack_tree(dir: &Path, codec: Option<CompressionCodec>) -> Vec<u8> {
    let config = WriterConfig::default().with_compression(codec);
    let mut writer = ArchiveWriter::with_config(Vec::new(), &config).unwrap();
    writer.add_tree(dir).unwrap();
    writer.into_inner().unwrap()
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");
    let temp = TempDir::new().unwrap();
    let dir = create_tree(&temp, 200);
    group.throughput(Throughput::Bytes((200 * FILE_SIZE) as u64));

    for codec in [None, Some(CompressionCodec::Gzip), Some(CompressionCodec::Zstd)] {
        let label = codec.map_or("plain", CompressionCodec::name);
        group.bench_with_input(BenchmarkId::from_parameter(label), &codec, |b, &codec| {
            b.iter(|| black_box(pack_tree(&dir, codec)));
        });
    }
    group.finish();
}

fn bench_unpack(c: &mut Criterion) {
    let mut group = c.benchmark_group("unpack");
    let temp = TempDir::new().unwrap();
    let dir = create_tree(&temp, 200);
    group.throughput(Throughput::Bytes((200 * FILE_SIZE) as u64));

    for codec in [None, Some(CompressionCodec::Gzip), Some(CompressionCodec::Zstd)] {
        let archive = pack_tree(&dir, codec);
        let label = codec.map_or("plain", CompressionCodec::name);
        let config = ReaderConfig::default().with_compression(codec);

        group.bench_with_input(BenchmarkId::new("memory", label), &archive, |b, archive| {
            b.iter(|| {
                let mut reader = ArchiveReader::with_config(archive.as_slice(), &config).unwrap();
                let mut total = 0;
                while let Some((_, data)) = reader.next_as_bytes().unwrap() {
                    total += data.len();
                }
                black_box(total)
            });
        });

        group.bench_with_input(BenchmarkId::new("disk", label), &archive, |b, archive| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |out| {
                    let mut reader =
                        ArchiveReader::with_config(archive.as_slice(), &config).unwrap();
                    black_box(reader.extract_all(Some(out.path())).unwrap());
                },
                BatchSize::PerIteration,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pack, bench_unpack);
criterion_main!(benches);
