use std::mem;

use crate::{RadixKey, RadixParams, SortContext, SortError, SortStats};

use super::bucket::{self, Digit};
use super::buffers::Side;
use super::{common, hybrid};

#[derive(Clone, Copy, Debug)]
pub struct Plan {
    pub bits: u32,
    pub comparison_cutoff: usize,
    /// Ranges shorter than this go to LSD; `None` disables the hand-off.
    pub lsd_handoff_cutoff: Option<usize>,
}

impl Plan {
    pub fn msd(params: &RadixParams) -> Self {
        Self {
            bits: params.digit_bits,
            comparison_cutoff: params.comparison_cutoff,
            lsd_handoff_cutoff: None,
        }
    }

    pub fn hybrid(params: &RadixParams) -> Self {
        Self {
            lsd_handoff_cutoff: Some(params.lsd_handoff_cutoff),
            ..Self::msd(params)
        }
    }
}

/// State shared by one depth-first MSD traversal.
///
/// `tables` holds one histogram per pass. A descent at pass `p` only touches
/// table `p`, and its descendants only tables below `p`, so a parent's bucket
/// boundaries survive the recursion into its children. Nothing is allocated
/// once a descent has started.
pub struct Descent<'c> {
    pub plan: Plan,
    pub tables: &'c mut [usize],
    pub offsets: &'c mut [usize],
    pub stats: &'c mut SortStats,
}

impl Descent<'_> {
    /// Sorts a range whose valid keys are in `src` (living in buffer `side`)
    /// and whose counterpart in the other buffer is `dst`. All keys agree on
    /// every digit above `pass`. On return the sorted range is in the
    /// caller's array.
    pub fn descend<T: RadixKey>(&mut self, src: &mut [T], dst: &mut [T], side: Side, pass: usize) {
        let len = src.len();
        if len < self.plan.comparison_cutoff {
            common::insertion_sort(src);
            self.stats.comparison_leaves += 1;
            self.resolve(side, src, dst);
            return;
        }

        if let Some(cutoff) = self.plan.lsd_handoff_cutoff {
            if len < cutoff {
                let end = hybrid::hand_off(self, src, dst, side, pass);
                if end == side {
                    self.resolve(end, src, dst);
                } else {
                    self.resolve(end, dst, src);
                }
                return;
            }
        }

        let bits = self.plan.bits;
        let radix = 1_usize << bits;
        let digit = Digit::new(pass, bits);
        let counts = &mut self.tables[pass * radix..(pass + 1) * radix];
        bucket::count_digits(src, digit, counts);

        if bucket::is_trivial(counts, len) {
            self.stats.skipped_passes += 1;
            if pass > 0 {
                self.descend(src, dst, side, pass - 1);
            } else {
                self.resolve(side, src, dst);
            }
            return;
        }

        bucket::distribute(src, dst, digit, counts, self.offsets);
        self.stats.scatters += 1;

        let mut written_rest = dst;
        let mut spent_rest = src;
        for b in 0..radix {
            let n = self.tables[pass * radix + b];
            if n == 0 {
                continue;
            }
            let (written, rest) = mem::take(&mut written_rest).split_at_mut(n);
            written_rest = rest;
            let (spent, rest) = mem::take(&mut spent_rest).split_at_mut(n);
            spent_rest = rest;

            if n > 1 && pass > 0 {
                self.descend(written, spent, side.flip(), pass - 1);
            } else {
                self.resolve(side.flip(), written, spent);
            }
        }
    }

    /// Finishes a leaf whose sorted keys are `keys`, living in buffer `side`.
    /// `other` is the same range in the other buffer; every ancestor scatter
    /// has already consumed it, so a scratch leaf is copied there directly.
    fn resolve<T: Copy>(&mut self, side: Side, keys: &[T], other: &mut [T]) {
        if side == Side::Scratch {
            other.copy_from_slice(keys);
            self.stats.spilled_keys += keys.len();
        }
    }
}

pub fn sort<T: RadixKey>(data: &mut [T], ctx: &mut SortContext<T>) -> Result<(), SortError> {
    let plan = Plan::msd(ctx.params());
    sort_with_plan(data, ctx, plan)
}

pub fn sort_with_plan<T: RadixKey>(
    data: &mut [T],
    ctx: &mut SortContext<T>,
    plan: Plan,
) -> Result<(), SortError> {
    let len = data.len();
    ctx.reserve(len)?;

    let levels = ctx.params().levels::<T>();
    let SortContext {
        scratch,
        tables,
        offsets,
        stats,
        ..
    } = ctx;

    let mut descent = Descent {
        plan,
        tables: &mut tables[..],
        offsets: &mut offsets[..],
        stats,
    };
    descent.descend(data, &mut scratch[..len], Side::Primary, levels - 1);

    debug_assert!(common::is_sorted_non_decreasing(data));
    Ok(())
}
