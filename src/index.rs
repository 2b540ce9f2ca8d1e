//! Index arithmetic for arrays anchored at arbitrary signed positions.
//!
//! An array covers the inclusive range `min ..= max`. The empty array is
//! encoded as `max == min - 1`, so a count is always derived from the pair
//! rather than stored.

use crate::Error;

/// Smallest index an array position can take.
pub const MIN_INDEX: i64 = i64::MIN;

/// Largest index an array position can take.
pub const MAX_INDEX: i64 = i64::MAX;

/// Largest number of `T` slots a single buffer may hold.
pub(crate) const fn max_len<T>() -> usize {
    let size = std::mem::size_of::<T>();
    if size == 0 {
        isize::MAX as usize
    } else {
        isize::MAX as usize / size
    }
}

/// Number of slots in `min ..= max`.
///
/// Requires `max >= min - 1` and that the pair does not span the whole index
/// space.
#[inline]
pub const fn count(min: i64, max: i64) -> u64 {
    (max.wrapping_sub(min) as u64).wrapping_add(1)
}

/// Largest index of an array anchored at `min` holding `count` slots.
#[inline]
pub const fn max_from_count(min: i64, count: u64) -> i64 {
    min.wrapping_add(count as i64).wrapping_sub(1)
}

/// Zero-based buffer offset of `index` in an array anchored at `min`.
///
/// Requires `min <= index <= max`.
#[inline]
pub const fn offset_of(min: i64, index: i64) -> usize {
    index.wrapping_sub(min) as u64 as usize
}

/// `true` when `index < min - 1`.
#[inline]
pub(crate) fn below_pred(index: i64, min: i64) -> bool {
    i128::from(index) < i128::from(min) - 1
}

/// `true` when `index > max + 1`.
#[inline]
pub(crate) fn beyond_succ(index: i64, max: i64) -> bool {
    i128::from(index) > i128::from(max) + 1
}

/// Length of a materialized array with the given bounds.
#[inline]
pub(crate) fn len_of(min: i64, max: i64) -> usize {
    count(min, max) as usize
}

/// Validates growing an array of `len` slots ending at `max` by `extra`
/// slots and returns the new length.
pub(crate) fn grown_len<T>(
    len: usize,
    max: i64,
    extra: usize,
    operation: &'static str,
) -> Result<usize, Error> {
    match len.checked_add(extra) {
        Some(new_len)
            if new_len <= max_len::<T>()
                && i128::from(max) + extra as i128 <= i128::from(MAX_INDEX) =>
        {
            Ok(new_len)
        }
        _ => Err(Error::memory(operation)),
    }
}

/// Validates that an empty array can be anchored at `min`.
#[inline]
pub(crate) fn empty_at(min: i64, operation: &'static str) -> Result<(), Error> {
    if min == MIN_INDEX {
        Err(Error::range(
            operation,
            "cannot create an empty array at the minimum index",
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "./index_tests.rs"]
mod tests;
