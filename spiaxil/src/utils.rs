//! Utilities.

/// Returns ceiling log2.
pub const fn clog2(value: usize) -> usize {
    if value == 0 {
        0
    } else {
        (::std::mem::size_of::<usize>() * 8) - (value - 1).leading_zeros() as usize
    }
}

/// Returns the mask covering the lowest `n` bits.
pub const fn mask(n: usize) -> u64 {
    match 1u64.checked_shl(n as u32) {
        Some(bit) => bit - 1,
        None => u64::MAX,
    }
}

/// Returns the integer represented by the given bits, least significant bit first.
///
/// Bits beyond the 64th are ignored.
pub fn bits_to_u64(bits: &[bool]) -> u64 {
    bits.iter().take(64).enumerate().fold(0, |acc, (i, bit)| acc | ((*bit as u64) << i))
}

/// Some or executing the given expression.
#[macro_export]
macro_rules! some_or {
    ($e:expr, $err:expr) => {{
        match $e {
            Some(r) => r,
            None => $err,
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clog2_matches_bit_counts() {
        assert_eq!(clog2(0), 0);
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(2), 1);
        assert_eq!(clog2(3), 2);
        assert_eq!(clog2(8), 3);
        assert_eq!(clog2(9), 4);
        assert_eq!(clog2(12), 4);
    }

    #[test]
    fn mask_saturates_at_64_bits() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(3), 0b111);
        assert_eq!(mask(32), 0xffff_ffff);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn bits_are_lsb_first() {
        assert_eq!(bits_to_u64(&[false, true, true, false]), 0b0110);
        assert_eq!(bits_to_u64(&[true; 70]), u64::MAX);
        assert_eq!(bits_to_u64(&[]), 0);
    }
}
