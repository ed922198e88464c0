use std::io::Write;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tempfile::NamedTempFile;

use flc::count;

fn generate_file(lines: usize) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    let mut data = Vec::new();
    for i in 0..lines {
        data.extend_from_slice(format!("record {} payload payload payload\n", i).as_bytes());
    }
    f.write_all(&data).unwrap();
    f.flush().unwrap();
    f
}

fn bench_count_file_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_file_threads");
    // ~36 bytes per line → ~36MB file
    let file = generate_file(1_000_000);
    for threads in [1u64, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("threads", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    count::count_file(black_box(file.path()), threads, 256 * 1024).unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_count_file_chunk_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_file_chunk_size");
    let file = generate_file(1_000_000);
    for chunk_kib in [4usize, 64, 256, 1024] {
        group.bench_with_input(
            BenchmarkId::new("chunk_kib", chunk_kib),
            &chunk_kib,
            |b, &chunk_kib| {
                b.iter(|| {
                    count::count_file(black_box(file.path()), 4, chunk_kib * 1024).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_count_file_threads, bench_count_file_chunk_size);
criterion_main!(benches);
