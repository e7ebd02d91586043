use crate::RadixKey;

#[inline]
pub fn insertion_sort<T: RadixKey>(data: &mut [T]) {
    let len = data.len();
    if len < 2 {
        return;
    }

    for i in 1..len {
        let key = data[i];
        let mut j = i;
        // Hot loop: unchecked accesses remove repeated bounds checks.
        unsafe {
            while j > 0 {
                let prev = *data.get_unchecked(j - 1);
                if prev <= key {
                    break;
                }
                *data.get_unchecked_mut(j) = prev;
                j -= 1;
            }
            *data.get_unchecked_mut(j) = key;
        }
    }
}

#[inline]
pub fn is_sorted_non_decreasing<T: RadixKey>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}
