//! In-place quicksort with an insertion-sort fallback for short spans.
//!
//! The pivot is always the middle element of the span, so the sort is fully
//! deterministic. It is not stable, and adversarial inputs degrade it to
//! quadratic time. No memory is allocated.

use std::cmp::Ordering;

/// Spans whose last offset is less than this many slots past the first are
/// sorted by insertion.
pub const QSORT_LIMIT: usize = 8;

/// Sorts `v` so that `compare(v[i], v[i + 1])` is never `Greater`.
pub fn sort_ascending<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if v.len() > 1 {
        quicksort(v, 0, v.len() - 1, &mut |a, b| compare(a, b));
    }
}

/// Sorts `v` so that `compare(v[i], v[i + 1])` is never `Less`.
///
/// This mirrors [`sort_ascending`] step by step rather than reversing its
/// output, so ties are arranged the same way from the other end.
pub fn sort_descending<T, F>(v: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if v.len() > 1 {
        quicksort(v, 0, v.len() - 1, &mut |a, b| compare(a, b).reverse());
    }
}

// `before(a, b) == Less` means `a` belongs in front of `b`.
fn quicksort<T>(
    v: &mut [T],
    lo: usize,
    hi: usize,
    before: &mut dyn FnMut(&T, &T) -> Ordering,
) {
    if hi - lo < QSORT_LIMIT {
        insertion_sort(v, lo, hi, before);
        return;
    }
    let middle = lo + ((hi - lo) >> 1);
    v.swap(middle, hi);

    let mut less = lo;
    let mut greater = hi;
    loop {
        while less < hi && before(&v[less], &v[hi]) == Ordering::Less {
            less += 1;
        }
        loop {
            greater -= 1;
            if greater == lo || before(&v[greater], &v[hi]) != Ordering::Greater {
                break;
            }
        }
        if greater <= less {
            break;
        }
        v.swap(less, greater);
        less += 1;
    }
    v.swap(less, hi);

    if less > lo + 1 {
        quicksort(v, lo, less - 1, before);
    }
    if less + 1 < hi {
        quicksort(v, less + 1, hi, before);
    }
}

fn insertion_sort<T>(
    v: &mut [T],
    lo: usize,
    hi: usize,
    before: &mut dyn FnMut(&T, &T) -> Ordering,
) {
    for current in lo + 1..=hi {
        let mut slot = lo;
        while slot < current && before(&v[slot], &v[current]) == Ordering::Less {
            slot += 1;
        }
        v[slot..=current].rotate_right(1);
    }
}

#[cfg(test)]
#[path = "./sort_tests.rs"]
mod tests;
