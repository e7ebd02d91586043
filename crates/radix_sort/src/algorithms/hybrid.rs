use std::mem;

use rayon::prelude::*;
use tracing::trace;

use crate::{RadixKey, SortContext, SortError, SortStats};

use super::bucket::{self, Digit};
use super::buffers::{PingPong, Side};
use super::msd::{self, Descent, Plan};
use super::{common, lsd};

const GROUPS_PER_THREAD: usize = 4;

pub fn sort<T: RadixKey>(data: &mut [T], ctx: &mut SortContext<T>) -> Result<(), SortError> {
    let plan = Plan::hybrid(ctx.params());
    msd::sort_with_plan(data, ctx, plan)
}

/// Finishes a medium range with LSD over passes `0..=pass` and reports the
/// buffer that ends up holding it.
pub fn hand_off<T: RadixKey>(
    descent: &mut Descent<'_>,
    src: &mut [T],
    dst: &mut [T],
    side: Side,
    pass: usize,
) -> Side {
    descent.stats.lsd_handoffs += 1;
    let mut bufs = PingPong::new(src, dst);
    lsd::run(
        &mut bufs,
        descent.tables,
        descent.offsets,
        descent.plan.bits,
        pass + 1,
        descent.stats,
    );
    match bufs.source() {
        Side::Primary => side,
        Side::Scratch => side.flip(),
    }
}

/// Hybrid sort whose first informative scatter fans its buckets out to the
/// rayon pool. Buckets are dealt in contiguous groups, each owning a disjoint
/// chunk of both buffers and its own slice of the shared bucket tables, so
/// tasks only meet at the join.
pub fn sort_par<T: RadixKey>(data: &mut [T], ctx: &mut SortContext<T>) -> Result<(), SortError> {
    let params = *ctx.params();
    let len = data.len();
    if len < params.lsd_handoff_cutoff.max(params.comparison_cutoff) {
        return sort(data, ctx);
    }
    ctx.reserve(len)?;

    let bits = params.digit_bits;
    let radix = params.radix();
    let plan = Plan::hybrid(&params);

    let mut pass = params.levels::<T>() - 1;
    loop {
        let counts = &mut ctx.tables[..radix];
        bucket::count_digits(data, Digit::new(pass, bits), counts);
        if !bucket::is_trivial(counts, len) {
            break;
        }
        ctx.stats.skipped_passes += 1;
        if pass == 0 {
            return Ok(());
        }
        pass -= 1;
    }

    let buckets = ctx.tables[..radix].iter().filter(|&&n| n > 0).count();
    let per_group = buckets.div_ceil(rayon::current_num_threads() * GROUPS_PER_THREAD);
    let groups = buckets.div_ceil(per_group);
    // Tables for passes below `pass` followed by one offsets table.
    let group_words = (pass + 1) * radix;
    ctx.reserve_bucket_tables(groups * group_words, len)?;

    let SortContext {
        scratch,
        tables,
        offsets,
        bucket_tables,
        stats,
        ..
    } = ctx;
    let scratch = &mut scratch[..len];
    let counts = &tables[..radix];

    bucket::distribute(data, scratch, Digit::new(pass, bits), counts, offsets);
    stats.scatters += 1;

    let mut pairs = Vec::with_capacity(buckets);
    let mut home_rest = &mut *data;
    let mut staged_rest = scratch;
    for &n in counts.iter().filter(|&&n| n > 0) {
        let (home, rest) = mem::take(&mut home_rest).split_at_mut(n);
        home_rest = rest;
        let (staged, rest) = mem::take(&mut staged_rest).split_at_mut(n);
        staged_rest = rest;
        pairs.push((home, staged));
    }
    trace!(buckets, groups, pass, "fanning out buckets");

    let group_stats = pairs
        .par_chunks_mut(per_group)
        .zip(bucket_tables[..groups * group_words].par_chunks_mut(group_words))
        .map(|(group, words)| {
            let (tables, offsets) = words.split_at_mut(pass * radix);
            let mut stats = SortStats::default();
            let mut descent = Descent {
                plan,
                tables,
                offsets,
                stats: &mut stats,
            };
            for (home, staged) in group.iter_mut() {
                sort_bucket(&mut descent, home, staged, pass);
            }
            stats
        })
        .reduce(SortStats::default, SortStats::merge);
    *stats = stats.merge(group_stats);

    debug_assert!(common::is_sorted_non_decreasing(data));
    Ok(())
}

/// Sorts one bucket of a scatter at `pass`. Its keys are in `staged` (a chunk
/// of scratch) and must end up in `home` (the matching chunk of the caller's
/// array).
fn sort_bucket<T: RadixKey>(
    descent: &mut Descent<'_>,
    home: &mut [T],
    staged: &mut [T],
    pass: usize,
) {
    if home.len() < 2 || pass == 0 {
        home.copy_from_slice(staged);
        descent.stats.spilled_keys += home.len();
        return;
    }
    descent.descend(staged, home, Side::Scratch, pass - 1);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::DEFAULT_PARAMS;

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(0xFA11_2026);
        let data: Vec<u64> = (0..100_000).map(|_| rng.random()).collect();

        let mut seq = data.clone();
        let mut ctx = SortContext::default();
        sort(&mut seq, &mut ctx).unwrap();

        let mut par = data;
        sort_par(&mut par, &mut ctx).unwrap();
        assert_eq!(seq, par);
        assert!(ctx.stats().lsd_handoffs > 0);
    }

    #[test]
    fn bucket_tables_come_from_the_context() {
        let mut rng = StdRng::seed_from_u64(0x7AB1_2026);
        let data: Vec<u64> = (0..60_000).map(|_| rng.random()).collect();
        let mut expected = data.clone();
        expected.sort_unstable();

        let mut ctx = SortContext::default();
        let mut first = data.clone();
        sort_par(&mut first, &mut ctx).unwrap();
        assert_eq!(first, expected);
        // Fan-out at the top byte: seven pass tables plus offsets per group.
        let reserved = ctx.bucket_tables.len();
        assert!(reserved >= 8 * 256);
        assert_eq!(reserved % (8 * 256), 0);

        let mut second = data;
        sort_par(&mut second, &mut ctx).unwrap();
        assert_eq!(second, expected);
        assert_eq!(ctx.bucket_tables.len(), reserved);
    }

    #[test]
    fn parallel_skips_shared_high_digits() {
        let mut rng = StdRng::seed_from_u64(0x5A4E_2026);
        // Top three bytes are constant; fan-out happens at pass 4.
        let data: Vec<u64> = (0..50_000)
            .map(|_| 0x00C0_FF00_0000_0000 | (rng.random::<u64>() >> 24))
            .collect();
        let mut expected = data.clone();
        expected.sort_unstable();

        let params = DEFAULT_PARAMS.with_lsd_handoff_cutoff(1024);
        let mut ctx = SortContext::with_params(params).unwrap();
        let mut actual = data;
        sort_par(&mut actual, &mut ctx).unwrap();
        assert_eq!(actual, expected);
        assert!(ctx.stats().skipped_passes >= 3);
    }

    #[test]
    fn parallel_small_input_falls_back() {
        let mut data: Vec<u32> = (0..100).rev().collect();
        let mut ctx = SortContext::default();
        sort_par(&mut data, &mut ctx).unwrap();
        assert_eq!(data, (0..100).collect::<Vec<u32>>());
        assert_eq!(ctx.stats().lsd_handoffs, 1);
    }

    #[test]
    fn handoff_inside_deep_bucket() {
        // The 64 keys under top byte 0x0A reach scratch in the first scatter
        // and are handed to LSD over the seven remaining passes.
        let mut data: Vec<u64> = (0..64u64)
            .rev()
            .map(|i| 0x0A00_0000_0000_0000 | (i * 977))
            .collect();
        data.extend((11..=50u64).map(|i| (i << 56) | 0xFF));
        let mut expected = data.clone();
        expected.sort_unstable();

        let params = DEFAULT_PARAMS.with_lsd_handoff_cutoff(65);
        let mut ctx = SortContext::with_params(params).unwrap();
        sort(&mut data, &mut ctx).unwrap();
        assert_eq!(data, expected);
        assert_eq!(ctx.stats().lsd_handoffs, 1);
    }
}
