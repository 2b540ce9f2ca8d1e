#![allow(unsafe_code)]

use crate::Error;
use crate::fill::fill_repeated;
use crate::index::{
    MAX_INDEX, MIN_INDEX, below_pred, count, empty_at, len_of, max_from_count, max_len, offset_of,
};
use crate::raw::{alloc_slots, free_slots, realloc_slots};
use crate::sort;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ptr::NonNull;

/// A contiguous array addressed by the inclusive index range
/// `min_index ..= max_index`.
///
/// The origin is arbitrary: `min_index` may be any `i64` and the empty array
/// anchored at `m` has `max_index == m - 1`. The buffer always holds exactly
/// [`len`](Self::len) slots; every size change reallocates to fit.
pub struct FlexArray<T> {
    min: i64,
    max: i64,
    ptr: NonNull<T>,
    _owns: PhantomData<T>,
}

// Safety: FlexArray owns its elements exactly like Vec<T>.
unsafe impl<T: Send> Send for FlexArray<T> {}
unsafe impl<T: Sync> Sync for FlexArray<T> {}

#[cold]
#[inline(never)]
fn consumed(operation: &'static str) -> ! {
    panic!("{operation}: temporary array was already consumed")
}

impl<T> FlexArray<T> {
    /// Largest number of elements an array of `T` can hold.
    pub const MAX_LEN: usize = max_len::<T>();

    /// Wraps a buffer holding `count(min, max)` initialized slots.
    #[inline]
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<T>, min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            ptr,
            _owns: PhantomData,
        }
    }

    /// Creates an empty array anchored at `min_index`.
    ///
    /// Fails with [`Range`](crate::ErrorKind::Range) when `min_index` is
    /// [`MIN_INDEX`], since `min_index - 1` is not representable.
    pub fn empty(min_index: i64) -> Result<Self, Error> {
        Self::empty_result(min_index, "empty")
    }

    pub(crate) fn empty_result(min: i64, operation: &'static str) -> Result<Self, Error> {
        empty_at(min, operation)?;
        let ptr = alloc_slots::<T>(0).map_err(|_| Error::memory(operation))?;
        // Safety: zero slots, min > MIN_INDEX.
        Ok(unsafe { Self::from_raw_parts(ptr, min, min - 1) })
    }

    /// Moves the elements of `vec` into an array anchored at `min_index`.
    pub fn from_vec(min_index: i64, vec: Vec<T>) -> Result<Self, Error> {
        let len = vec.len();
        if len == 0 {
            return Self::empty_result(min_index, "from_vec");
        }
        if len > Self::MAX_LEN || i128::from(min_index) + len as i128 - 1 > i128::from(MAX_INDEX) {
            return Err(Error::memory("from_vec"));
        }
        let ptr = alloc_slots::<T>(len).map_err(|_| Error::memory("from_vec"))?;
        let mut vec = ManuallyDrop::new(vec);
        // Safety: the elements are moved bitwise; the Vec is then released
        // as an empty buffer so they are not dropped twice.
        unsafe {
            std::ptr::copy_nonoverlapping(vec.as_ptr(), ptr.as_ptr(), len);
            vec.set_len(0);
            ManuallyDrop::drop(&mut vec);
            Ok(Self::from_raw_parts(
                ptr,
                min_index,
                max_from_count(min_index, len as u64),
            ))
        }
    }

    /// Allocates an array over `min_index ..= max_index` and initializes each
    /// slot with `f(index)`, in ascending index order.
    pub fn from_fn<F>(min_index: i64, max_index: i64, mut f: F) -> Result<Self, Error>
    where
        F: FnMut(i64) -> T,
    {
        let mut out = FlexArray::<MaybeUninit<T>>::allocate(min_index, max_index)
            .map_err(|e| e.during("from_fn"))?;
        for (k, slot) in out.as_mut_slice().iter_mut().enumerate() {
            slot.write(f(min_index.wrapping_add(k as i64)));
        }
        // Safety: every slot was written above.
        Ok(unsafe { out.assume_init() })
    }

    /// Creates an array over `min_index ..= max_index` holding `element` in
    /// every slot.
    ///
    /// Bounds are validated like [`FlexArray::allocate`].
    pub fn times(min_index: i64, max_index: i64, element: T) -> Result<Self, Error>
    where
        T: Clone,
    {
        log::trace!("times({min_index}, {max_index})");
        let mut out = FlexArray::<MaybeUninit<T>>::allocate(min_index, max_index)
            .map_err(|e| e.during("times"))?;
        fill_repeated(out.as_mut_slice(), element);
        // Safety: fill_repeated writes every slot.
        Ok(unsafe { out.assume_init() })
    }

    /// Creates the one element array `[element]` with bounds `1 ..= 1`.
    pub fn base_lit(element: T) -> Result<Self, Error> {
        Self::base_lit_at(1, element)
    }

    /// Creates the one element array `[element]` with bounds
    /// `start ..= start`.
    pub fn base_lit_at(start: i64, element: T) -> Result<Self, Error> {
        let ptr = alloc_slots::<T>(1).map_err(|_| Error::memory("base_lit"))?;
        // Safety: one freshly allocated slot.
        unsafe {
            ptr.as_ptr().write(element);
            Ok(Self::from_raw_parts(ptr, start, start))
        }
    }

    /// Creates the two element array `[first, second]` with bounds `1 ..= 2`.
    pub fn pair(first: T, second: T) -> Result<Self, Error> {
        let ptr = alloc_slots::<T>(2).map_err(|_| Error::memory("pair"))?;
        // Safety: two freshly allocated slots.
        unsafe {
            ptr.as_ptr().write(first);
            ptr.as_ptr().add(1).write(second);
            Ok(Self::from_raw_parts(ptr, 1, 2))
        }
    }

    /// Moves the origin of the array to `start`, keeping its elements.
    ///
    /// Fails with [`Range`](crate::ErrorKind::Range) if the last index would
    /// exceed [`MAX_INDEX`] or an empty array would be anchored at
    /// [`MIN_INDEX`]. The array is unchanged on failure.
    pub fn rebase(&mut self, start: i64) -> Result<(), Error> {
        log::trace!("rebase([{}..{}], {start})", self.min, self.max);
        let len = self.len();
        if (len != 0 && i128::from(start) + len as i128 - 1 > i128::from(MAX_INDEX))
            || (len == 0 && start == MIN_INDEX)
        {
            return Err(Error::range(
                "rebase",
                "minimum or maximum index out of range",
            ));
        }
        self.min = start;
        self.max = max_from_count(start, len as u64);
        Ok(())
    }

    /// Returns the smallest valid index.
    #[inline]
    pub fn min_index(&self) -> i64 {
        self.min
    }

    /// Returns the largest valid index, `min_index() - 1` when empty.
    #[inline]
    pub fn max_index(&self) -> i64 {
        self.max
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        len_of(self.min, self.max)
    }

    /// Returns `true` if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        count(self.min, self.max) == 0
    }

    #[inline]
    fn contains(&self, index: i64) -> bool {
        index >= self.min && index <= self.max
    }

    /// Returns a reference to the element at `index`.
    #[inline]
    pub fn get(&self, index: i64) -> Option<&T> {
        if self.contains(index) {
            Some(unsafe { &*self.ptr.as_ptr().add(offset_of(self.min, index)) })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the element at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: i64) -> Option<&mut T> {
        if self.contains(index) {
            Some(unsafe { &mut *self.ptr.as_ptr().add(offset_of(self.min, index)) })
        } else {
            None
        }
    }

    /// Returns the element at `min_index()`.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the element at `max_index()`.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the contents as a slice; slice offset `0` is `min_index()`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // Safety: ptr holds len() initialized slots (dangling and aligned when empty).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len()) }
    }

    /// Returns the contents as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safety: see as_slice.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len()) }
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator over mutable references to the elements.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Sorts the elements in place so that no adjacent pair compares
    /// `Greater`. Not stable.
    pub fn sort_ascending<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        log::trace!("sort_ascending([{}..{}])", self.min, self.max);
        sort::sort_ascending(self.as_mut_slice(), compare);
    }

    /// Sorts the elements in place so that no adjacent pair compares
    /// `Less`. Not stable.
    pub fn sort_descending<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        log::trace!("sort_descending([{}..{}])", self.min, self.max);
        sort::sort_descending(self.as_mut_slice(), compare);
    }

    #[inline]
    pub(crate) fn base(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Takes the array out of a temporary slot.
    pub(crate) fn take_slot(temp: &mut Option<Self>, operation: &'static str) -> Self {
        match temp.take() {
            Some(arr) => arr,
            None => consumed(operation),
        }
    }

    /// Borrows the array held by a temporary slot.
    pub(crate) fn in_slot<'a>(temp: &'a mut Option<Self>, operation: &'static str) -> &'a mut Self {
        match temp {
            Some(arr) => arr,
            None => consumed(operation),
        }
    }

    /// Clones `len` elements starting at buffer offset `offset` into a new
    /// array anchored at `min`.
    pub(crate) fn clone_run(
        &self,
        offset: usize,
        len: usize,
        min: i64,
        operation: &'static str,
    ) -> Result<Self, Error>
    where
        T: Clone,
    {
        let source = &self.as_slice()[offset..offset + len];
        let ptr = alloc_slots::<MaybeUninit<T>>(len).map_err(|_| Error::memory(operation))?;
        // Safety: len fresh slots. On a panicking clone `out` still frees
        // the buffer; only the clones already written leak.
        let mut out = unsafe {
            FlexArray::from_raw_parts(ptr, min, max_from_count(min, len as u64))
        };
        for (slot, value) in out.as_mut_slice().iter_mut().zip(source) {
            slot.write(value.clone());
        }
        // Safety: every slot was written above.
        Ok(unsafe { out.assume_init() })
    }

    /// Copies `len` slots starting at `offset` bitwise into a new array
    /// anchored at `min`.
    ///
    /// # Safety
    ///
    /// On success the copied source slots are moved out: the caller must
    /// close the gap (or forget the source) before they could be dropped.
    pub(crate) unsafe fn move_run_out(
        &self,
        offset: usize,
        len: usize,
        min: i64,
        operation: &'static str,
    ) -> Result<Self, Error> {
        let ptr = alloc_slots::<T>(len).map_err(|_| Error::memory(operation))?;
        // Safety: offset + len <= self.len() and the buffers are distinct.
        unsafe {
            std::ptr::copy_nonoverlapping(self.base().add(offset), ptr.as_ptr(), len);
            Ok(Self::from_raw_parts(
                ptr,
                min,
                max_from_count(min, len as u64),
            ))
        }
    }

    /// Reallocates the buffer from `len()` to `new_len` slots. The bounds are
    /// not updated.
    ///
    /// # Safety
    ///
    /// When shrinking, slots past `new_len` must already be moved out. When
    /// growing, the caller must write the new slots and call
    /// [`set_len`](Self::set_len) before anything can panic or drop `self`.
    pub(crate) unsafe fn realloc_raw(
        &mut self,
        new_len: usize,
        operation: &'static str,
    ) -> Result<(), Error> {
        // Safety: forwarded from the caller.
        let ptr = unsafe { realloc_slots(self.ptr, self.len(), new_len) }
            .map_err(|_| Error::memory(operation))?;
        self.ptr = ptr;
        Ok(())
    }

    /// # Safety
    ///
    /// The buffer must hold `new_len` initialized slots and
    /// `min + new_len - 1` must be representable.
    #[inline]
    pub(crate) unsafe fn set_len(&mut self, new_len: usize) {
        self.max = max_from_count(self.min, new_len as u64);
    }

    /// Shrinks the buffer to `new_len` slots and updates the bounds.
    ///
    /// # Safety
    ///
    /// Slots past `new_len` must already be moved out. On failure nothing is
    /// changed.
    pub(crate) unsafe fn shrink_to(
        &mut self,
        new_len: usize,
        operation: &'static str,
    ) -> Result<(), Error> {
        // Safety: forwarded from the caller.
        unsafe {
            self.realloc_raw(new_len, operation)?;
            self.set_len(new_len);
        }
        Ok(())
    }

    /// Frees the buffer without dropping its slots.
    ///
    /// # Safety
    ///
    /// Every slot must have been moved elsewhere.
    pub(crate) unsafe fn release_buffer(self) {
        let this = ManuallyDrop::new(self);
        // Safety: the buffer was allocated with len() slots.
        unsafe { free_slots(this.ptr, this.len()) };
    }
}

impl<T> FlexArray<MaybeUninit<T>> {
    /// Allocates an array over `min_index ..= max_index` with uninitialized
    /// slots.
    ///
    /// # Errors
    ///
    /// - [`Memory`](crate::ErrorKind::Memory) if the range spans the whole
    ///   index space, if the element count exceeds
    ///   [`MAX_LEN`](FlexArray::MAX_LEN) or if the allocator fails.
    /// - [`Range`](crate::ErrorKind::Range) if `max_index < min_index - 1`.
    pub fn allocate(min_index: i64, max_index: i64) -> Result<Self, Error> {
        log::trace!("allocate({min_index}, {max_index})");
        if min_index == MIN_INDEX && max_index == MAX_INDEX {
            return Err(Error::new(
                crate::ErrorKind::Memory,
                "allocate",
                "index range covers the whole index space",
            ));
        }
        if below_pred(max_index, min_index) {
            return Err(Error::range(
                "allocate",
                "max_index is less than min_index - 1",
            ));
        }
        let count = count(min_index, max_index);
        if count > Self::MAX_LEN as u64 {
            return Err(Error::memory("allocate"));
        }
        let ptr = alloc_slots::<MaybeUninit<T>>(count as usize)
            .map_err(|_| Error::memory("allocate"))?;
        // Safety: MaybeUninit slots need no initialization.
        Ok(unsafe { Self::from_raw_parts(ptr, min_index, max_index) })
    }

    /// Reallocates to exactly `new_len` slots, keeping `min_index` and the
    /// first `min(len, new_len)` slots.
    ///
    /// On failure the array is unchanged.
    pub fn resize(&mut self, new_len: usize) -> Result<(), Error> {
        log::trace!("resize([{}..{}], {new_len})", self.min, self.max);
        if new_len == 0 {
            empty_at(self.min, "resize")?;
        }
        if new_len > Self::MAX_LEN
            || i128::from(self.min) + new_len as i128 - 1 > i128::from(MAX_INDEX)
        {
            return Err(Error::memory("resize"));
        }
        // Safety: MaybeUninit slots never need dropping and new slots are
        // valid uninitialized.
        unsafe { self.shrink_to(new_len, "resize") }
    }

    /// Converts to an array of initialized elements.
    ///
    /// # Safety
    ///
    /// Every slot must have been written.
    pub unsafe fn assume_init(self) -> FlexArray<T> {
        let this = ManuallyDrop::new(self);
        // Safety: MaybeUninit<T> has the layout of T.
        unsafe { FlexArray::from_raw_parts(this.ptr.cast(), this.min, this.max) }
    }
}

impl<T> Drop for FlexArray<T> {
    fn drop(&mut self) {
        let len = self.len();
        // Safety: the buffer holds len initialized slots.
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(self.base(), len));
            free_slots(self.ptr, len);
        }
    }
}

impl<T: Clone> Clone for FlexArray<T> {
    fn clone(&self) -> Self {
        match self.clone_run(0, self.len(), self.min, "clone") {
            Ok(arr) => arr,
            Err(_) => match std::alloc::Layout::array::<T>(self.len()) {
                Ok(layout) => std::alloc::handle_alloc_error(layout),
                Err(_) => panic!("clone: layout overflow"),
            },
        }
    }
}

impl<T: PartialEq> PartialEq for FlexArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max && self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for FlexArray<T> {}

impl<T> std::ops::Index<i64> for FlexArray<T> {
    type Output = T;

    fn index(&self, index: i64) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!(
                "index {index} out of range {}..={}",
                self.min, self.max
            ),
        }
    }
}

impl<T> std::ops::IndexMut<i64> for FlexArray<T> {
    fn index_mut(&mut self, index: i64) -> &mut T {
        let (min, max) = (self.min, self.max);
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range {min}..={max}"),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for FlexArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{}] ", self.min, self.max)?;
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// &FlexArray -> yields &T
impl<'a, T> IntoIterator for &'a FlexArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

// &mut FlexArray -> yields &mut T
impl<'a, T> IntoIterator for &'a mut FlexArray<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

/// Consuming iterator over a [`FlexArray`], in ascending index order.
pub struct IntoIter<T> {
    ptr: NonNull<T>,
    len: usize,
    index: usize,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.index < self.len {
            let value = unsafe { self.ptr.as_ptr().add(self.index).read() };
            self.index += 1;
            Some(value)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // Safety: slots index..len were not yielded; the buffer has len slots.
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr().add(self.index),
                self.len - self.index,
            ));
            free_slots(self.ptr, self.len);
        }
    }
}

impl<T> IntoIterator for FlexArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        IntoIter {
            ptr: this.ptr,
            len: this.len(),
            index: 0,
        }
    }
}

#[cfg(test)]
#[path = "./array_tests.rs"]
mod tests;
