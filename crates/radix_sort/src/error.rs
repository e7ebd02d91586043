use std::alloc::Layout;
use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    /// Scratch buffer or frequency tables could not be reserved. The caller's
    /// array has not been touched.
    #[error(
        "failed to reserve {bytes} bytes of scratch space for {len} keys",
        bytes = .layout.size()
    )]
    ScratchAlloc {
        len: usize,
        /// The allocation that failed.
        layout: Layout,
        #[source]
        source: TryReserveError,
    },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamsError {
    #[error("digit width must be within 1..={max} bits, got {0}", max = crate::MAX_DIGIT_BITS)]
    DigitBits(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_DIGIT_BITS;

    #[test]
    fn digit_width_message_names_the_limit() {
        let msg = ParamsError::DigitBits(40).to_string();
        assert!(msg.contains(&format!("1..={MAX_DIGIT_BITS}")), "{msg}");
        assert!(msg.ends_with("got 40"), "{msg}");
    }
}
