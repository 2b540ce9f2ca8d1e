#![allow(unsafe_code)]

//! Exact-fit slot buffers on top of the global allocator.
//!
//! Buffers never carry spare capacity: the slot count an array reports is the
//! slot count its allocation was made with. Zero-byte buffers (empty arrays or
//! zero-sized `T`) are never handed to the allocator.

use std::alloc::{Layout, alloc, dealloc, realloc};
use std::ptr::NonNull;

use crate::index::max_len;

#[cfg(test)]
thread_local! {
    static FAIL_AFTER: std::cell::Cell<Option<u32>> = const { std::cell::Cell::new(None) };
}

/// Lets `successes` allocator requests on this thread through, then makes the
/// next one fail.
#[cfg(test)]
pub(crate) fn fail_alloc_after(successes: u32) {
    FAIL_AFTER.with(|f| f.set(Some(successes)));
}

/// Makes the next allocator request on this thread fail.
#[cfg(test)]
pub(crate) fn fail_next_alloc() {
    fail_alloc_after(0);
}

#[cfg(test)]
fn injected_failure() -> bool {
    FAIL_AFTER.with(|f| match f.get() {
        Some(0) => {
            f.set(None);
            true
        }
        Some(n) => {
            f.set(Some(n - 1));
            false
        }
        None => false,
    })
}

#[cfg(not(test))]
#[inline(always)]
fn injected_failure() -> bool {
    false
}

/// Marker for a failed allocator request. Callers turn it into a
/// [`Memory`](crate::ErrorKind::Memory) error naming their operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AllocError;

#[inline]
fn layout_for<T>(len: usize) -> Result<Layout, AllocError> {
    if len > max_len::<T>() {
        return Err(AllocError);
    }
    Layout::array::<T>(len).map_err(|_| AllocError)
}

/// Allocates an uninitialized buffer of exactly `len` slots.
pub(crate) fn alloc_slots<T>(len: usize) -> Result<NonNull<T>, AllocError> {
    let layout = layout_for::<T>(len)?;
    if injected_failure() {
        return Err(AllocError);
    }
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    // Safety: layout has a non-zero size.
    let raw = unsafe { alloc(layout) };
    NonNull::new(raw.cast()).ok_or(AllocError)
}

/// Resizes a buffer from `old_len` to exactly `new_len` slots, preserving the
/// first `min(old_len, new_len)` slots.
///
/// On failure the original buffer is untouched and still owned by the caller.
///
/// # Safety
///
/// `ptr` must come from [`alloc_slots`] or [`realloc_slots`] with `old_len`
/// slots. Slots past `new_len` must not hold values that still need dropping.
pub(crate) unsafe fn realloc_slots<T>(
    ptr: NonNull<T>,
    old_len: usize,
    new_len: usize,
) -> Result<NonNull<T>, AllocError> {
    let new_layout = layout_for::<T>(new_len)?;
    if injected_failure() {
        return Err(AllocError);
    }
    // Safety: old_len was accepted by layout_for when the buffer was made.
    let old_layout = unsafe { Layout::array::<T>(old_len).unwrap_unchecked() };
    match (old_layout.size(), new_layout.size()) {
        (0, 0) => Ok(ptr),
        (0, _) => {
            // Safety: new_layout has a non-zero size.
            let raw = unsafe { alloc(new_layout) };
            NonNull::new(raw.cast()).ok_or(AllocError)
        }
        (_, 0) => {
            // Safety: ptr was allocated with old_layout.
            unsafe { dealloc(ptr.as_ptr().cast(), old_layout) };
            Ok(NonNull::dangling())
        }
        (_, new_size) => {
            // Safety: ptr was allocated with old_layout and new_size is non-zero
            // and does not exceed isize::MAX.
            let raw = unsafe { realloc(ptr.as_ptr().cast(), old_layout, new_size) };
            NonNull::new(raw.cast()).ok_or(AllocError)
        }
    }
}

/// Releases a buffer without touching its slots.
///
/// # Safety
///
/// `ptr` must come from [`alloc_slots`] or [`realloc_slots`] with `len`
/// slots, and must not be used afterwards.
pub(crate) unsafe fn free_slots<T>(ptr: NonNull<T>, len: usize) {
    // Safety: len was accepted by layout_for when the buffer was made.
    let layout = unsafe { Layout::array::<T>(len).unwrap_unchecked() };
    if layout.size() != 0 {
        // Safety: ptr was allocated with this layout.
        unsafe { dealloc(ptr.as_ptr().cast(), layout) };
    }
}

#[cfg(test)]
#[path = "./raw_tests.rs"]
mod tests;
