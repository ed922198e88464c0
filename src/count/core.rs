use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::thread;

use memchr::memchr_iter;

use crate::common::io::{file_size, open_noatime};

/// Default read buffer size per worker (256 KiB).
/// Large enough to amortize syscall cost, small enough that
/// thread_count × chunk_size stays modest on many-core machines.
pub const DEFAULT_CHUNK_SIZE: u64 = 256 * 1024;

/// A half-open byte interval `[start, start + len)` of one file,
/// scanned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start: u64,
    pub len: u64,
}

impl ScanRange {
    /// Exclusive end offset of the range.
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Split `[0, file_size)` into at most `requested_workers` contiguous ranges.
///
/// The worker count is clamped to the file size so no range is ever empty,
/// and the `file_size % n` leftover bytes go to the earliest ranges (one
/// extra byte each) rather than piling up on the last range. Ranges are not
/// aligned to line boundaries: the counted quantity is a sum over disjoint
/// byte intervals, so a line straddling two ranges is never miscounted —
/// its newline byte falls into exactly one of them.
pub fn partition(file_size: u64, requested_workers: u64) -> Vec<ScanRange> {
    if file_size == 0 {
        return Vec::new();
    }
    let n = requested_workers.max(1).min(file_size);
    let base = file_size / n;
    let rem = file_size % n;

    let mut ranges = Vec::with_capacity(n as usize);
    let mut start = 0u64;
    for i in 0..n {
        let len = if i < rem { base + 1 } else { base };
        ranges.push(ScanRange { start, len });
        start += len;
    }
    ranges
}

/// Count newline bytes within `range` of the file at `path`.
///
/// Opens an independent handle (own seek position), seeks to the range
/// start, and streams the range through a reusable buffer of at most
/// `chunk_size` bytes, so working memory is bounded regardless of range
/// length. Short reads and EINTR are retried; a read returning 0 before the
/// range is exhausted means the range promised bytes that do not exist and
/// fails with `UnexpectedEof` rather than returning a silent undercount.
pub fn scan_range(path: &Path, range: ScanRange, chunk_size: usize) -> io::Result<u64> {
    if range.len == 0 {
        return Ok(0);
    }
    let mut file = open_noatime(path)?;
    file.seek(SeekFrom::Start(range.start))?;

    let buf_len = chunk_size.max(1).min(range.len.min(usize::MAX as u64) as usize);
    let mut buf = vec![0u8; buf_len];
    let mut remaining = range.len;
    let mut newlines = 0u64;

    while remaining > 0 {
        let want = buf_len.min(remaining.min(usize::MAX as u64) as usize);
        let n = match file.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("file truncated: {} bytes missing from scan range", remaining),
                ));
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        newlines += memchr_iter(b'\n', &buf[..n]).count() as u64;
        remaining -= n as u64;
    }
    Ok(newlines)
}

/// Count newline bytes in the whole file using up to `threads` workers.
///
/// Stat the file, tile it into ranges, spawn one scoped thread per range,
/// join them all, then sum. Each worker owns its own file handle, its own
/// buffer, and its own result slot; the scope join is the only
/// synchronization point. Any worker error fails the whole file — partial
/// sums from sibling workers are discarded, never reported as an
/// approximate total. The first error in range order wins.
pub fn count_file(path: &Path, threads: u64, chunk_size: usize) -> io::Result<u64> {
    let size = file_size(path)?;
    if size == 0 {
        return Ok(0);
    }
    let ranges = partition(size, threads);

    // Single range: scan inline, no spawn/join overhead.
    if ranges.len() == 1 {
        return scan_range(path, ranges[0], chunk_size);
    }

    let mut results: Vec<io::Result<u64>> = Vec::with_capacity(ranges.len());
    thread::scope(|scope| {
        let handles: Vec<_> = ranges
            .iter()
            .map(|&range| scope.spawn(move || scan_range(path, range, chunk_size)))
            .collect();
        for handle in handles {
            results.push(
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("scan worker panicked"))),
            );
        }
    });

    let mut total = 0u64;
    for result in results {
        total += result?;
    }
    Ok(total)
}
