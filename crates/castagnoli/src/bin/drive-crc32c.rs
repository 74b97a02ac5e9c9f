//! Drive the CRC-32C dispatch path for timing and inspection.
//!
//! Usage:
//!   cargo run --release -p castagnoli --features cli --bin drive-crc32c -- 1000000 1024
//!   cargo run --release -p castagnoli --features cli --bin drive-crc32c -- --streaming
//!   cargo run --release -p castagnoli --features cli --bin drive-crc32c -- --list
//!   RUST_LOG=debug cargo run -p castagnoli --features cli --bin drive-crc32c -- --kernel x86_64/sse4.2

use std::{process::ExitCode, time::Instant};

use castagnoli::{
  drive::{self, with_kernel},
  kernels,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: u64 = 1_000_000;
const DEFAULT_SIZE: usize = 1024;

/// Checksum a seeded buffer repeatedly and report the CRC, kernel and time.
#[derive(Debug, Parser)]
#[command(name = "drive-crc32c", version)]
struct Args {
  /// Number of iterations.
  #[arg(value_name = "COUNT")]
  count_pos: Option<u64>,

  /// Buffer size in bytes.
  #[arg(value_name = "SIZE")]
  size_pos: Option<usize>,

  /// Number of iterations (same as COUNT).
  #[arg(short = 'n', long, conflicts_with = "count_pos")]
  count: Option<u64>,

  /// Buffer size in bytes (same as SIZE).
  #[arg(short, long, conflicts_with = "size_pos")]
  size: Option<usize>,

  /// One running checksum over a buffer whose prefix changes each pass.
  #[arg(long)]
  streaming: bool,

  /// List the kernels this CPU can run and exit.
  #[arg(long)]
  list: bool,

  /// Run one named kernel directly instead of the dispatch path.
  #[arg(long, value_name = "NAME")]
  kernel: Option<String>,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  if args.list {
    let caps = platform::caps();
    println!("caps: {caps}");
    if !platform::can_probe() {
      println!("(no runtime probe in this build; compile-time features only)");
    }
    for kernel in kernels::all() {
      let mark = if caps.has(kernel.requires) { "*" } else { " " };
      println!("{mark} {:<24} {}", kernel.name, kernel.tier);
    }
    return ExitCode::SUCCESS;
  }

  let count = args.count.or(args.count_pos).unwrap_or(DEFAULT_COUNT);
  let size = args.size.or(args.size_pos).unwrap_or(DEFAULT_SIZE);
  tracing::info!(count, size, streaming = args.streaming, "driving");

  let start = Instant::now();
  let (crc, backend) = match args.kernel.as_deref() {
    Some(name) => {
      let Some(kernel) = kernels::find(name) else {
        tracing::error!(kernel = name, "no such kernel on this CPU (see --list)");
        return ExitCode::from(2);
      };
      let step = with_kernel(kernel.func);
      let crc = if args.streaming {
        drive::drive_streaming_with(count, size, step)
      } else {
        drive::drive_with(count, size, step)
      };
      (crc, kernel.name)
    }
    None => {
      let crc = if args.streaming {
        drive::drive_streaming(count, size)
      } else {
        drive::drive(count, size)
      };
      (crc, castagnoli::selected_backend())
    }
  };
  let elapsed = start.elapsed();

  println!("{crc:#010x}");
  println!("backend: {backend}");
  println!("elapsed: {elapsed:?}");
  ExitCode::SUCCESS
}
