//! CRC-32C benchmarks.
//!
//! Run: `cargo bench -p castagnoli`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p castagnoli`
//!
//! This benchmarks:
//! - Main dispatch path (auto-selects best backend)
//! - Every kernel this CPU can run, bypassing dispatch
//! - The `drive` harness

use castagnoli::{accumulate, drive, finalize, init, kernels};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Standard benchmark sizes.
const SIZES: [usize; 7] = [64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Smaller sizes for the bitwise reference.
const REFERENCE_SIZES: [usize; 4] = [16, 64, 256, 1024];

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/dispatch");
  eprintln!("crc32c backend: {}", castagnoli::selected_backend());

  for size in SIZES {
    let data = drive::fill_buffer(drive::DEFAULT_SEED, size);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(finalize(accumulate(init(), data))));
    });
  }

  group.finish();
}

fn bench_kernels(c: &mut Criterion) {
  for kernel in kernels::available() {
    let mut group = c.benchmark_group(format!("crc32c/kernel/{}", kernel.name));
    let sizes: &[usize] = if kernel.name == kernels::REFERENCE_NAME {
      &REFERENCE_SIZES
    } else {
      &SIZES
    };

    for &size in sizes {
      let data = drive::fill_buffer(drive::DEFAULT_SEED, size);
      group.throughput(Throughput::Bytes(size as u64));

      group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
        b.iter(|| core::hint::black_box((kernel.func)(0xFFFF_FFFF, data)));
      });
    }

    group.finish();
  }
}

fn bench_drive(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32c/drive");
  const COUNT: u64 = 1000;
  group.throughput(Throughput::Bytes(COUNT * 1024));

  group.bench_function("oneshot/1024", |b| b.iter(|| core::hint::black_box(drive::drive(COUNT, 1024))));
  group.bench_function("streaming/1024", |b| {
    b.iter(|| core::hint::black_box(drive::drive_streaming(COUNT, 1024)))
  });

  group.finish();
}

criterion_group!(benches, bench_dispatch, bench_kernels, bench_drive);
criterion_main!(benches);
