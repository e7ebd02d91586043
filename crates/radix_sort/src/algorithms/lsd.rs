use tracing::trace;

use crate::{RadixKey, SortContext, SortError, SortStats};

use super::bucket::{self, Digit};
use super::buffers::PingPong;
use super::common;

pub fn sort<T: RadixKey>(data: &mut [T], ctx: &mut SortContext<T>) -> Result<(), SortError> {
    let len = data.len();
    ctx.reserve(len)?;

    let bits = ctx.params().digit_bits;
    let levels = ctx.params().levels::<T>();
    let SortContext {
        scratch,
        tables,
        offsets,
        stats,
        ..
    } = ctx;

    let mut bufs = PingPong::new(data, &mut scratch[..len]);
    run(&mut bufs, tables, offsets, bits, levels, stats);
    bufs.settle();

    debug_assert!(common::is_sorted_non_decreasing(data));
    Ok(())
}

/// Sorts the source of `bufs` by passes `0..hi_pass`, leaving the result in
/// whichever buffer the last scatter wrote. Keys must agree on every digit
/// at or above `hi_pass`.
pub fn run<T: RadixKey>(
    bufs: &mut PingPong<'_, T>,
    tables: &mut [usize],
    offsets: &mut [usize],
    bits: u32,
    hi_pass: usize,
    stats: &mut SortStats,
) {
    let len = bufs.len();
    let radix = 1_usize << bits;
    bucket::count_all_levels(bufs.source_slice(), tables, bits, hi_pass);

    for pass in 0..hi_pass {
        let counts = &tables[pass * radix..(pass + 1) * radix];
        if bucket::is_trivial(counts, len) {
            trace!(pass, "skipping trivial pass");
            stats.skipped_passes += 1;
            continue;
        }

        let (src, dst) = bufs.split();
        bucket::distribute(src, dst, Digit::new(pass, bits), counts, offsets);
        bufs.flip();
        stats.scatters += 1;
    }
}
