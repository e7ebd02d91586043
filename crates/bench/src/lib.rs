use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 800;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1500;
const RNG_SEED: u64 = 0x5EED_2026;
const FEW_UNIQUE_VALUES: usize = 5;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

/// Input shapes fed to the sorters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Distribution {
    /// A permutation of `0..n`.
    Shuffled,
    /// Uniform over the whole `u64` range.
    UniformFull,
    /// Uniform over `[0, n]`.
    UniformDense,
    /// Uniform over `[0, n / 4]`, so roughly a quarter of the keys are unique.
    UniformQuarter,
    /// A handful of random full-range values repeated.
    FewUnique,
    /// Ascending with 1% random swaps.
    NearlySorted,
}

pub const ALL_DISTRIBUTIONS: [Distribution; 6] = [
    Distribution::Shuffled,
    Distribution::UniformFull,
    Distribution::UniformDense,
    Distribution::UniformQuarter,
    Distribution::FewUnique,
    Distribution::NearlySorted,
];

impl Distribution {
    pub fn label(self) -> &'static str {
        match self {
            Self::Shuffled => "shuffled",
            Self::UniformFull => "uniform_full",
            Self::UniformDense => "uniform_dense",
            Self::UniformQuarter => "uniform_quarter",
            Self::FewUnique => "few_unique",
            Self::NearlySorted => "nearly_sorted_1pct_swaps",
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R, len: usize) -> Vec<u64> {
        let n = len as u64;
        match self {
            Self::Shuffled => {
                let mut data: Vec<u64> = (0..n).collect();
                data.shuffle(rng);
                data
            }
            Self::UniformFull => (0..len).map(|_| rng.random()).collect(),
            Self::UniformDense => (0..len).map(|_| rng.random_range(0..=n)).collect(),
            Self::UniformQuarter => (0..len).map(|_| rng.random_range(0..=n / 4)).collect(),
            Self::FewUnique => {
                let values: [u64; FEW_UNIQUE_VALUES] = std::array::from_fn(|_| rng.random());
                (0..len)
                    .map(|_| values[rng.random_range(0..FEW_UNIQUE_VALUES)])
                    .collect()
            }
            Self::NearlySorted => {
                let mut data: Vec<u64> = (0..n).collect();
                if len > 0 {
                    for _ in 0..(len / 100).max(1) {
                        let a = rng.random_range(0..len);
                        let b = rng.random_range(0..len);
                        data.swap(a, b);
                    }
                }
                data
            }
        }
    }
}
