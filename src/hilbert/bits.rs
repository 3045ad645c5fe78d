//! Bit and Gray-code primitives for the N-dimensional Hilbert curve.
//!
//! Widths are bit counts in `1..=64`. Bit positions passed to [`bit_range`] and
//! [`set_bit`] are counted from the most significant end of the field, which is
//! how the curve walks index digits and coordinate bits.

/// Mask covering the low `width` bits.
#[inline(always)]
fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Binary-reflected Gray code of `x`.
#[inline]
pub fn gray_code(x: u64) -> u64 {
    x ^ (x >> 1)
}

/// Inverse of [`gray_code`]: returns `v` such that `gray_code(v) == x`.
pub fn inverse_gray_code(x: u64) -> u64 {
    if x == 0 {
        return 0;
    }

    // ceil(log2(x)) + 1 shifts, the last ones may already be zero
    let ceil_log2 = if x == 1 {
        0
    } else {
        64 - (x - 1).leading_zeros()
    };
    let rounds = (ceil_log2 + 1).min(64);

    let mut value = x;
    for shift in 1..rounds {
        value ^= x >> shift;
    }
    value
}

/// Rotate the low `width` bits of `x` right by `shift` (taken modulo `width`).
#[inline]
pub fn rotate_right(x: u64, shift: u32, width: u32) -> u64 {
    debug_assert!((1..=64).contains(&width));
    let mask = low_mask(width);
    let shift = shift % width;
    if shift == 0 {
        return x & mask;
    }
    ((x >> shift) | (x << (width - shift))) & mask
}

/// Rotate the low `width` bits of `x` left by `shift` (taken modulo `width`).
#[inline]
pub fn rotate_left(x: u64, shift: u32, width: u32) -> u64 {
    debug_assert!((1..=64).contains(&width));
    let mask = low_mask(width);
    let shift = shift % width;
    if shift == 0 {
        return x & mask;
    }
    ((x << shift) | (x >> (width - shift))) & mask
}

/// Number of consecutive set bits starting at bit 0, capped at `width + 1`.
pub fn trailing_set_bits(mut x: u64, width: u32) -> u32 {
    let mut count = 0;
    while x & 1 == 1 && count <= width {
        x >>= 1;
        count += 1;
    }
    count
}

/// Bits `[start, end)` of a `width`-bit integer, right-aligned.
#[inline]
pub fn bit_range(x: u64, width: u32, start: u32, end: u32) -> u64 {
    debug_assert!(start <= end && end <= width);
    x.checked_shr(width - end).unwrap_or(0) & low_mask(end - start)
}

/// `x` with bit `position` of its `width`-bit field set to `bit`.
#[inline]
pub fn set_bit(x: u64, width: u32, position: u32, bit: bool) -> u64 {
    debug_assert!(position < width);
    let mask = 1u64 << (width - position - 1);
    if bit {
        x | mask
    } else {
        x & !mask
    }
}

/// Rotate the Gray-code frame: XOR with `entry`, then rotate right by `direction + 1`.
#[inline]
pub fn transform(entry: u64, direction: u32, width: u32, x: u64) -> u64 {
    rotate_right(x ^ entry, direction + 1, width)
}

/// Exact inverse of [`transform`] for the same `entry`, `direction` and `width`.
#[inline]
pub fn inverse_transform(entry: u64, direction: u32, width: u32, x: u64) -> u64 {
    rotate_left(x, direction + 1, width) ^ entry
}
