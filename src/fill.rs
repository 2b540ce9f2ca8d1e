#![allow(unsafe_code)]

use std::mem::MaybeUninit;

const STRIDE: usize = 32;

/// Drops the initialized prefix of a partially filled slice if a clone panics.
struct Filled<'a, T> {
    slots: &'a mut [MaybeUninit<T>],
    len: usize,
}

impl<T> Drop for Filled<'_, T> {
    fn drop(&mut self) {
        for slot in &mut self.slots[..self.len] {
            // Safety: the first `len` slots were written.
            unsafe { slot.assume_init_drop() };
        }
    }
}

/// Writes `value` into every slot of `slots`.
///
/// Slots are filled in fixed blocks of 32 so the inner loop has a constant
/// trip count; the tail is filled one by one. The last slot receives `value`
/// itself. Nothing is written for an empty slice.
pub(crate) fn fill_repeated<T: Clone>(slots: &mut [MaybeUninit<T>], value: T) {
    let Some(last) = slots.len().checked_sub(1) else {
        return;
    };
    let mut guard = Filled { slots, len: 0 };
    for block in 0..last / STRIDE {
        let base = block * STRIDE;
        for k in 0..STRIDE {
            guard.slots[base + k].write(value.clone());
            guard.len = base + k + 1;
        }
    }
    for pos in guard.len..last {
        guard.slots[pos].write(value.clone());
        guard.len = pos + 1;
    }
    guard.slots[last].write(value);
    std::mem::forget(guard);
}

#[cfg(test)]
#[path = "./fill_tests.rs"]
mod tests;
