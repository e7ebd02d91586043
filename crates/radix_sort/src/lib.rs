mod algorithms;
mod error;
mod key;

use std::alloc::{Layout, handle_alloc_error};

use tracing::debug;

pub use error::{ParamsError, SortError};
pub use key::RadixKey;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RadixAlgorithm {
    Lsd,
    Msd,
    Hybrid,
    HybridParallel,
}

pub const ALL_ALGORITHMS: [RadixAlgorithm; 4] = [
    RadixAlgorithm::Lsd,
    RadixAlgorithm::Msd,
    RadixAlgorithm::Hybrid,
    RadixAlgorithm::HybridParallel,
];

pub fn all_algorithms() -> &'static [RadixAlgorithm] {
    &ALL_ALGORITHMS
}

pub fn algorithm_name(algo: RadixAlgorithm) -> &'static str {
    match algo {
        RadixAlgorithm::Lsd => "radix_lsd",
        RadixAlgorithm::Msd => "radix_msd",
        RadixAlgorithm::Hybrid => "radix_hybrid",
        RadixAlgorithm::HybridParallel => "radix_hybrid_par",
    }
}

pub const MAX_DIGIT_BITS: u32 = 16;

/// Tuning knobs shared by all engines.
///
/// `comparison_cutoff` and `lsd_handoff_cutoff` are exclusive upper bounds on
/// range length: a range shorter than `comparison_cutoff` is insertion
/// sorted, otherwise a range shorter than `lsd_handoff_cutoff` is handed to
/// LSD (hybrid engines only).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RadixParams {
    pub digit_bits: u32,
    pub comparison_cutoff: usize,
    pub lsd_handoff_cutoff: usize,
}

pub const DEFAULT_PARAMS: RadixParams = RadixParams {
    digit_bits: 8,
    comparison_cutoff: 16,
    lsd_handoff_cutoff: 1 << 14,
};

impl Default for RadixParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

impl RadixParams {
    pub const fn with_digit_bits(mut self, digit_bits: u32) -> Self {
        self.digit_bits = digit_bits;
        self
    }

    pub const fn with_comparison_cutoff(mut self, cutoff: usize) -> Self {
        self.comparison_cutoff = cutoff;
        self
    }

    pub const fn with_lsd_handoff_cutoff(mut self, cutoff: usize) -> Self {
        self.lsd_handoff_cutoff = cutoff;
        self
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        if (1..=MAX_DIGIT_BITS).contains(&self.digit_bits) {
            Ok(())
        } else {
            Err(ParamsError::DigitBits(self.digit_bits))
        }
    }

    #[inline]
    pub fn radix(&self) -> usize {
        1 << self.digit_bits
    }

    #[inline]
    pub fn levels<T: RadixKey>(&self) -> usize {
        T::BITS.div_ceil(self.digit_bits) as usize
    }
}

/// Counters describing the most recent sort run through a context.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SortStats {
    pub scatters: usize,
    pub skipped_passes: usize,
    pub comparison_leaves: usize,
    pub lsd_handoffs: usize,
    /// Keys copied from scratch back into the caller's array.
    pub spilled_keys: usize,
}

impl SortStats {
    pub(crate) fn merge(mut self, other: Self) -> Self {
        self.scatters += other.scatters;
        self.skipped_passes += other.skipped_passes;
        self.comparison_leaves += other.comparison_leaves;
        self.lsd_handoffs += other.lsd_handoffs;
        self.spilled_keys += other.spilled_keys;
        self
    }
}

#[derive(Clone, Debug)]
pub struct SortContext<T> {
    params: RadixParams,
    pub(crate) scratch: Vec<T>,
    pub(crate) tables: Vec<usize>,
    pub(crate) offsets: Vec<usize>,
    pub(crate) bucket_tables: Vec<usize>,
    pub(crate) stats: SortStats,
}

impl<T: RadixKey> Default for SortContext<T> {
    fn default() -> Self {
        Self {
            params: DEFAULT_PARAMS,
            scratch: Vec::new(),
            tables: Vec::new(),
            offsets: Vec::new(),
            bucket_tables: Vec::new(),
            stats: SortStats::default(),
        }
    }
}

impl<T: RadixKey> SortContext<T> {
    pub fn with_params(params: RadixParams) -> Result<Self, ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::default()
        })
    }

    pub fn params(&self) -> &RadixParams {
        &self.params
    }

    pub fn stats(&self) -> SortStats {
        self.stats
    }

    /// Grows the buffers for a sort of `len` keys and resets per-call state.
    pub(crate) fn reserve(&mut self, len: usize) -> Result<(), SortError> {
        let radix = self.params.radix();
        let table_len = self.params.levels::<T>() * radix;
        grow(&mut self.scratch, len, len)?;
        grow(&mut self.tables, table_len, len)?;
        grow(&mut self.offsets, radix, len)?;
        self.stats = SortStats::default();
        Ok(())
    }

    /// Grows the tables shared out to parallel bucket tasks to `words`
    /// counters. Must run before the caller's array is first scattered.
    pub(crate) fn reserve_bucket_tables(
        &mut self,
        words: usize,
        len: usize,
    ) -> Result<(), SortError> {
        grow(&mut self.bucket_tables, words, len)
    }
}

fn grow<U: Copy + Default>(buf: &mut Vec<U>, want: usize, keys: usize) -> Result<(), SortError> {
    if buf.len() < want {
        buf.try_reserve_exact(want - buf.len())
            .map_err(|source| SortError::ScratchAlloc {
                len: keys,
                layout: Layout::array::<U>(want).unwrap_or_else(|_| Layout::new::<U>()),
                source,
            })?;
        buf.resize(want, U::default());
    }
    Ok(())
}

pub fn sort_lsd<T: RadixKey>(data: &mut [T]) {
    sort(RadixAlgorithm::Lsd, data);
}

pub fn sort_msd<T: RadixKey>(data: &mut [T]) {
    sort(RadixAlgorithm::Msd, data);
}

pub fn sort_hybrid<T: RadixKey>(data: &mut [T]) {
    sort(RadixAlgorithm::Hybrid, data);
}

pub fn sort_hybrid_par<T: RadixKey>(data: &mut [T]) {
    sort(RadixAlgorithm::HybridParallel, data);
}

/// Sorts with a fresh context and default parameters. Scratch allocation
/// failure aborts through [`handle_alloc_error`], as `Vec` does.
pub fn sort<T: RadixKey>(algo: RadixAlgorithm, data: &mut [T]) {
    let mut ctx = SortContext::default();
    if let Err(SortError::ScratchAlloc { layout, .. }) = try_sort_with_ctx(algo, data, &mut ctx) {
        handle_alloc_error(layout);
    }
}

pub fn try_sort_with_ctx<T: RadixKey>(
    algo: RadixAlgorithm,
    data: &mut [T],
    ctx: &mut SortContext<T>,
) -> Result<(), SortError> {
    debug!(
        algorithm = algorithm_name(algo),
        len = data.len(),
        key_bits = T::BITS,
        "radix sort"
    );
    match algo {
        RadixAlgorithm::Lsd => algorithms::lsd::sort(data, ctx)?,
        RadixAlgorithm::Msd => algorithms::msd::sort(data, ctx)?,
        RadixAlgorithm::Hybrid => algorithms::hybrid::sort(data, ctx)?,
        RadixAlgorithm::HybridParallel => algorithms::hybrid::sort_par(data, ctx)?,
    }
    debug!(stats = ?ctx.stats, "radix sort finished");
    Ok(())
}
