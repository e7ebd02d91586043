use crate::RadixKey;

#[derive(Clone, Copy, Debug)]
pub struct Digit {
    shift: u32,
    mask: u64,
}

impl Digit {
    #[inline]
    pub fn new(pass: usize, bits: u32) -> Self {
        Self {
            shift: pass as u32 * bits,
            mask: (1_u64 << bits) - 1,
        }
    }

    #[inline(always)]
    pub fn of<T: RadixKey>(self, x: T) -> usize {
        ((x.to_bits() >> self.shift) & self.mask) as usize
    }
}

/// Resets `counts` and fills it with the digit histogram of `src`.
#[inline]
pub fn count_digits<T: RadixKey>(src: &[T], digit: Digit, counts: &mut [usize]) {
    counts.fill(0);
    for &x in src {
        counts[digit.of(x)] += 1;
    }
}

/// Fills the histograms of passes `0..hi_pass` in one scan. Table `p` lives at
/// `tables[p * radix..(p + 1) * radix]`.
pub fn count_all_levels<T: RadixKey>(
    src: &[T],
    tables: &mut [usize],
    bits: u32,
    hi_pass: usize,
) {
    let radix = 1_usize << bits;
    let mask = (radix - 1) as u64;
    let tables = &mut tables[..hi_pass * radix];
    tables.fill(0);

    for &x in src {
        let mut value = x.to_bits();
        for table in tables.chunks_exact_mut(radix) {
            table[(value & mask) as usize] += 1;
            value >>= bits;
        }
    }
}

/// True when one bucket holds the whole range, so bucketing would be the
/// identity. An empty range is trivial.
#[inline]
pub fn is_trivial(counts: &[usize], len: usize) -> bool {
    match counts.iter().find(|&&c| c != 0) {
        Some(&c) => c == len,
        None => true,
    }
}

#[inline]
pub fn exclusive_prefix_sum(counts: &[usize], offsets: &mut [usize]) {
    let mut sum = 0usize;
    for (offset, &count) in offsets.iter_mut().zip(counts) {
        *offset = sum;
        sum += count;
    }
}

/// Stable forward scatter of `src` into `dst`. `offsets` must be the exclusive
/// prefix sum of the histogram of `src` for `digit`.
#[inline]
pub fn scatter<T: RadixKey>(src: &[T], dst: &mut [T], digit: Digit, offsets: &mut [usize]) {
    debug_assert_eq!(src.len(), dst.len());
    debug_assert!(offsets.len() > digit.mask as usize);
    let dst_ptr = dst.as_mut_ptr();
    // Every cursor stays below the start of the next bucket, which is at most
    // dst.len(), and every digit is below offsets.len().
    unsafe {
        for &x in src {
            let d = digit.of(x);
            let pos = *offsets.get_unchecked(d);
            *dst_ptr.add(pos) = x;
            *offsets.get_unchecked_mut(d) = pos + 1;
        }
    }
}

/// Scatters `src` into `dst` by the bucket sizes in `counts`, the histogram
/// of `src` for `digit`. `offsets` is overwritten.
#[inline]
pub fn distribute<T: RadixKey>(
    src: &[T],
    dst: &mut [T],
    digit: Digit,
    counts: &[usize],
    offsets: &mut [usize],
) {
    exclusive_prefix_sum(counts, offsets);
    scatter(src, dst, digit, offsets);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_extraction() {
        let x = 0x1234_5678_9ABC_DEF0_u64;
        assert_eq!(Digit::new(0, 8).of(x), 0xF0);
        assert_eq!(Digit::new(7, 8).of(x), 0x12);
        assert_eq!(Digit::new(1, 4).of(x), 0xF);
        assert_eq!(Digit::new(5, 11).of(x), (x >> 55) as usize);
        assert_eq!(Digit::new(1, 8).of(0xAB12_u16), 0xAB);
    }

    #[test]
    fn histogram_sums_to_len() {
        let data: Vec<u32> = (0..1000).map(|i| i * 7919).collect();
        let mut counts = vec![99; 256];
        count_digits(&data, Digit::new(1, 8), &mut counts);
        assert_eq!(counts.iter().sum::<usize>(), data.len());
    }

    #[test]
    fn all_levels_match_single_pass_counts() {
        let data: Vec<u64> = (0..500u64)
            .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .collect();
        let mut tables = vec![0; 8 * 256];
        count_all_levels(&data, &mut tables, 8, 8);

        let mut counts = vec![0; 256];
        for pass in 0..8 {
            count_digits(&data, Digit::new(pass, 8), &mut counts);
            assert_eq!(&tables[pass * 256..(pass + 1) * 256], &counts[..]);
        }
    }

    #[test]
    fn trivial_detection() {
        let mut counts = vec![0; 256];
        assert!(is_trivial(&counts, 0));
        counts[3] = 10;
        assert!(is_trivial(&counts, 10));
        counts[200] = 1;
        assert!(!is_trivial(&counts, 11));
    }

    #[test]
    fn scatter_is_stable_and_grouped() {
        // Low byte is the digit, high byte tags the input position.
        let src: Vec<u16> = vec![0x0002, 0x0101, 0x0202, 0x0300, 0x0401, 0x0500];
        let mut dst = vec![0u16; src.len()];
        let mut counts = vec![0; 256];
        let mut offsets = vec![0; 256];
        count_digits(&src, Digit::new(0, 8), &mut counts);
        distribute(&src, &mut dst, Digit::new(0, 8), &counts, &mut offsets);

        assert_eq!(dst, vec![0x0300, 0x0500, 0x0101, 0x0401, 0x0002, 0x0202]);
        assert_eq!(&counts[..3], &[2, 2, 2]);
        // Each cursor ends at its bucket's upper boundary.
        assert_eq!(&offsets[..3], &[2, 4, 6]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn scatter_rejects_short_offsets() {
        let src: Vec<u16> = vec![0x00FF, 0x0001];
        let mut dst = vec![0u16; 2];
        let mut offsets = vec![0; 16];
        scatter(&src, &mut dst, Digit::new(0, 8), &mut offsets);
    }
}
