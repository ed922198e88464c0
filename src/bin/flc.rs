use std::path::Path;
use std::process;

use clap::Parser;

use flc::common::{io_error_msg, reset_sigpipe};
use flc::count::{self, DEFAULT_CHUNK_SIZE};

#[derive(Parser)]
#[command(
    name = "flc",
    about = "Count newlines in each FILE using parallel partitioned scans"
)]
struct Cli {
    /// Number of worker threads per file (defaults to the number of CPUs)
    #[arg(
        short = 't',
        long = "threads",
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    threads: Option<u64>,

    /// Read buffer size per worker, in bytes
    #[arg(
        short = 'c',
        long = "chunk-size",
        value_name = "BYTES",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    chunk_size: u64,

    /// Files to count
    #[arg(required = true, value_name = "FILE")]
    files: Vec<String>,
}

/// Number of worker threads when -t is not given.
fn default_threads() -> u64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u64)
        .unwrap_or(1)
}

fn main() {
    reset_sigpipe();
    let cli = Cli::parse();

    let threads = cli.threads.unwrap_or_else(default_threads);
    let chunk_size = cli.chunk_size.min(usize::MAX as u64) as usize;

    // Files are independent: an error on one is reported and the rest
    // are still counted.
    let mut had_error = false;
    for filename in &cli.files {
        match count::count_file(Path::new(filename), threads, chunk_size) {
            Ok(total) => println!("{}: {}", total, filename),
            Err(e) => {
                eprintln!("flc: {}: {}", filename, io_error_msg(&e));
                had_error = true;
            }
        }
    }

    if had_error {
        process::exit(1);
    }
}
