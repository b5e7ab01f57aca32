//! Benchmark chunk enumeration and coverage of a merged multi-file dataset.
#![allow(missing_docs)]

use std::num::NonZeroU64;

use chunkplan::metadata::{ArrayMetadataRecord, DataType};
use chunkplan::{ChunkSizes, DatasetMeta};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::iter::ParallelIterator;

fn file() -> DatasetMeta {
    DatasetMeta::from_extraction([
        ArrayMetadataRecord::new(
            "pr",
            vec![14600, 192, 288],
            DataType::Float32,
            &["time", "lat", "lon"],
        )
        .with_data_var(true),
        ArrayMetadataRecord::new("time", vec![14600], DataType::Float64, &["time"]),
        ArrayMetadataRecord::new("lat", vec![192], DataType::Float64, &["lat"]),
        ArrayMetadataRecord::new("lon", vec![288], DataType::Float64, &["lon"]),
    ])
    .unwrap()
}

fn chunk_sizes(time: u64) -> ChunkSizes {
    [("time", time), ("lat", 16), ("lon", 16)]
        .into_iter()
        .map(|(dimension, size)| (dimension, NonZeroU64::new(size).unwrap()))
        .collect()
}

fn chunk_enumerate(c: &mut Criterion) {
    let file = file();
    let merged = DatasetMeta::merge_all(&[file.clone(), file.clone(), file], "time").unwrap();
    let mut group = c.benchmark_group("chunk_enumerate");
    for time in [100u64, 1000u64] {
        let chunk_sizes = chunk_sizes(time);
        let num_chunks = merged.enumerate_chunks(&chunk_sizes).count() as u64;
        group.throughput(Throughput::Elements(num_chunks));
        group.bench_with_input(BenchmarkId::new("serial", time), &chunk_sizes, |b, chunk_sizes| {
            b.iter(|| merged.enumerate_chunks(chunk_sizes).count());
        });
        group.bench_with_input(
            BenchmarkId::new("parallel", time),
            &chunk_sizes,
            |b, chunk_sizes| {
                b.iter(|| merged.par_enumerate_chunks(chunk_sizes).count());
            },
        );
    }
    group.finish();
}

fn chunk_coverage(c: &mut Criterion) {
    let file = file();
    let merged =
        DatasetMeta::merge_all(&[file.clone(), file.clone(), file.clone()], "time").unwrap();
    let mut group = c.benchmark_group("chunk_coverage");
    for time in [100u64, 1000u64] {
        let chunk_sizes = chunk_sizes(time);
        group.bench_with_input(BenchmarkId::from_parameter(time), &chunk_sizes, |b, chunk_sizes| {
            b.iter(|| merged.chunk_coverage(&file, chunk_sizes, 1).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, chunk_enumerate, chunk_coverage);
criterion_main!(benches);
