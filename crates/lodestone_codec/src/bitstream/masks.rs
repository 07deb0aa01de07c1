//! Bit mask lookup table.

/// `BIT_MASKS[n] == (1 << n) - 1` for `n` in `0..=32`.
///
/// Indexing the table instead of shifting keeps full-width counts away from
/// a shift by 32, which overflows a `u32`.
pub(crate) const BIT_MASKS: [u32; 33] = build_masks();

const fn build_masks() -> [u32; 33] {
    let mut masks = [0u32; 33];
    let mut n = 1;
    while n < 33 {
        masks[n] = (masks[n - 1] << 1) | 1;
        n += 1;
    }
    masks
}

/// Mask covering `count` bits (`count <= 32`).
#[inline]
pub(crate) const fn mask(count: u32) -> u32 {
    BIT_MASKS[count as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_edges() {
        assert_eq!(BIT_MASKS[0], 0);
        assert_eq!(BIT_MASKS[1], 1);
        assert_eq!(BIT_MASKS[8], 0xFF);
        assert_eq!(BIT_MASKS[31], 0x7FFF_FFFF);
        assert_eq!(BIT_MASKS[32], u32::MAX);
    }

    #[test]
    fn test_table_matches_shift() {
        for n in 0..32u32 {
            assert_eq!(mask(n), (1u32 << n) - 1);
        }
    }
}
