/// Which of the two equally sized buffers a range currently lives in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// The caller's array.
    Primary,
    Scratch,
}

impl Side {
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Side::Primary => Side::Scratch,
            Side::Scratch => Side::Primary,
        }
    }
}

/// Two buffers of equal length with a flag naming the one that holds valid
/// data. The other is write-only scratch until the next [`flip`](Self::flip).
pub struct PingPong<'a, T> {
    primary: &'a mut [T],
    scratch: &'a mut [T],
    source: Side,
}

impl<'a, T: Copy> PingPong<'a, T> {
    pub fn new(primary: &'a mut [T], scratch: &'a mut [T]) -> Self {
        debug_assert_eq!(primary.len(), scratch.len());
        Self {
            primary,
            scratch,
            source: Side::Primary,
        }
    }

    #[inline]
    pub fn source(&self) -> Side {
        self.source
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    #[inline]
    pub fn source_slice(&self) -> &[T] {
        match self.source {
            Side::Primary => &*self.primary,
            Side::Scratch => &*self.scratch,
        }
    }

    /// Returns `(source, destination)`.
    #[inline]
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        match self.source {
            Side::Primary => (&*self.primary, &mut *self.scratch),
            Side::Scratch => (&*self.scratch, &mut *self.primary),
        }
    }

    /// Call after the destination has been completely written.
    #[inline]
    pub fn flip(&mut self) {
        self.source = self.source.flip();
    }

    /// Leaves the valid data in the primary buffer, copying it over if the
    /// last flip moved it to scratch.
    pub fn settle(self) {
        if self.source == Side::Scratch {
            self.primary.copy_from_slice(self.scratch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_swaps_roles() {
        let mut a = [1u32, 2, 3];
        let mut b = [0u32; 3];
        let mut bufs = PingPong::new(&mut a, &mut b);
        assert_eq!(bufs.source(), Side::Primary);

        let (src, dst) = bufs.split();
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s * 10;
        }
        bufs.flip();
        assert_eq!(bufs.source(), Side::Scratch);
        assert_eq!(bufs.source_slice(), &[10, 20, 30]);

        bufs.settle();
        assert_eq!(a, [10, 20, 30]);
    }

    #[test]
    fn settle_without_flip_keeps_primary() {
        let mut a = [4u8, 5];
        let mut b = [9u8, 9];
        PingPong::new(&mut a, &mut b).settle();
        assert_eq!(a, [4, 5]);
    }
}
