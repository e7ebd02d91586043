/// Unsigned key whose natural order matches the order of its bit pattern.
///
/// Digits are taken from the zero-extended `u64` form, so every width shares
/// one engine. Signed keys must be mapped to an order-preserving unsigned
/// pattern by the caller.
pub trait RadixKey: Copy + Ord + Default + Send + Sync + 'static {
    const BITS: u32;

    fn to_bits(self) -> u64;
}

macro_rules! impl_radix_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl RadixKey for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline(always)]
                fn to_bits(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_radix_key!(u8, u16, u32, u64);
