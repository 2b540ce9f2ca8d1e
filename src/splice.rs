#![allow(unsafe_code)]

//! Growing and shrinking an array in place.
//!
//! Every size change reallocates the buffer to fit exactly. A failed call
//! leaves the receiver unchanged; by-value inputs of a failed call are
//! dropped.

use crate::index::{beyond_succ, empty_at, grown_len, offset_of};
use crate::{Error, FlexArray};

impl<T> FlexArray<T> {
    /// Appends the elements of `other` to `self`. The result keeps
    /// `self.min_index()`.
    ///
    /// Fails with [`Memory`](crate::ErrorKind::Memory) when the combined
    /// length or its last index is not representable.
    pub fn concat(mut self, other: Self) -> Result<Self, Error> {
        log::trace!(
            "concat([{}..{}], [{}..{}])",
            self.min_index(),
            self.max_index(),
            other.min_index(),
            other.max_index()
        );
        self.append_moved(other, "concat")?;
        Ok(self)
    }

    /// Moves the elements of `extension` onto the end of `self`.
    pub fn append(&mut self, extension: Self) -> Result<(), Error> {
        log::trace!(
            "append([{}..{}], [{}..{}])",
            self.min_index(),
            self.max_index(),
            extension.min_index(),
            extension.max_index()
        );
        self.append_moved(extension, "append")
    }

    fn append_moved(&mut self, extension: Self, operation: &'static str) -> Result<(), Error> {
        let extra = extension.len();
        if extra == 0 {
            return Ok(());
        }
        let old_len = self.len();
        let new_len = grown_len::<T>(old_len, self.max_index(), extra, operation)?;
        // Safety: the new slots are written from `extension`, whose buffer is
        // then released without dropping.
        unsafe {
            self.realloc_raw(new_len, operation)?;
            std::ptr::copy_nonoverlapping(extension.base(), self.base().add(old_len), extra);
            self.set_len(new_len);
            extension.release_buffer();
        }
        Ok(())
    }

    /// Appends `element` and returns the grown array.
    pub fn extend_one(mut self, element: T) -> Result<Self, Error> {
        log::trace!("extend_one([{}..{}])", self.min_index(), self.max_index());
        self.push_one(element, "extend_one")?;
        Ok(self)
    }

    /// Appends `element` at `max_index() + 1`.
    pub fn push(&mut self, element: T) -> Result<(), Error> {
        log::trace!("push([{}..{}])", self.min_index(), self.max_index());
        self.push_one(element, "push")
    }

    fn push_one(&mut self, element: T, operation: &'static str) -> Result<(), Error> {
        let old_len = self.len();
        let new_len = grown_len::<T>(old_len, self.max_index(), 1, operation)?;
        // Safety: the single new slot is written before the bounds grow.
        unsafe {
            self.realloc_raw(new_len, operation)?;
            self.base().add(old_len).write(element);
            self.set_len(new_len);
        }
        Ok(())
    }

    // Offset of an insertion position within min_index ..= max_index + 1.
    fn insert_offset(&self, position: i64, operation: &'static str) -> Result<usize, Error> {
        if position < self.min_index() || beyond_succ(position, self.max_index()) {
            Err(Error::index(
                operation,
                "position is outside min_index ..= max_index + 1",
            ))
        } else {
            Ok(offset_of(self.min_index(), position))
        }
    }

    // Offset of an existing element.
    fn element_offset(&self, position: i64, operation: &'static str) -> Result<usize, Error> {
        if position < self.min_index() || position > self.max_index() {
            Err(Error::index(
                operation,
                "position is outside min_index ..= max_index",
            ))
        } else {
            Ok(offset_of(self.min_index(), position))
        }
    }

    /// Inserts `element` at `position`, shifting later elements up by one.
    ///
    /// `position` may be anything from `min_index` to `max_index + 1`.
    pub fn insert(&mut self, position: i64, element: T) -> Result<(), Error> {
        log::trace!(
            "insert([{}..{}], {position})",
            self.min_index(),
            self.max_index()
        );
        let offset = self.insert_offset(position, "insert")?;
        let old_len = self.len();
        let new_len = grown_len::<T>(old_len, self.max_index(), 1, "insert")?;
        let base = unsafe {
            self.realloc_raw(new_len, "insert")?;
            self.base()
        };
        // Safety: the buffer now has room for old_len + 1 slots.
        unsafe {
            std::ptr::copy(base.add(offset), base.add(offset + 1), old_len - offset);
            base.add(offset).write(element);
            self.set_len(new_len);
        }
        Ok(())
    }

    /// Inserts clones of all elements of `elements` at `position`.
    ///
    /// An empty `elements` leaves `self` unchanged. To insert an array into
    /// itself use [`insert_self`](Self::insert_self).
    pub fn insert_array(&mut self, position: i64, elements: &Self) -> Result<(), Error>
    where
        T: Clone,
    {
        log::trace!(
            "insert_array([{}..{}], {position}, [{}..{}])",
            self.min_index(),
            self.max_index(),
            elements.min_index(),
            elements.max_index()
        );
        let offset = self.insert_offset(position, "insert_array")?;
        if elements.is_empty() {
            return Ok(());
        }
        grown_len::<T>(self.len(), self.max_index(), elements.len(), "insert_array")?;
        let copies = elements.clone_run(0, elements.len(), elements.min_index(), "insert_array")?;
        self.insert_moved(offset, copies, "insert_array")
    }

    /// Inserts a copy of the whole array at `position`.
    ///
    /// The result is the elements before `position`, then every original
    /// element, then the elements from `position` on.
    pub fn insert_self(&mut self, position: i64) -> Result<(), Error>
    where
        T: Clone,
    {
        log::trace!(
            "insert_self([{}..{}], {position})",
            self.min_index(),
            self.max_index()
        );
        let offset = self.insert_offset(position, "insert_self")?;
        if self.is_empty() {
            return Ok(());
        }
        grown_len::<T>(self.len(), self.max_index(), self.len(), "insert_self")?;
        let copies = self.clone_run(0, self.len(), self.min_index(), "insert_self")?;
        self.insert_moved(offset, copies, "insert_self")
    }

    /// Moves all elements of `elements` into `self` at `position`.
    pub fn insert_array_temp(&mut self, position: i64, elements: Self) -> Result<(), Error> {
        log::trace!(
            "insert_array_temp([{}..{}], {position}, [{}..{}])",
            self.min_index(),
            self.max_index(),
            elements.min_index(),
            elements.max_index()
        );
        let offset = self.insert_offset(position, "insert_array_temp")?;
        self.insert_moved(offset, elements, "insert_array_temp")
    }

    fn insert_moved(
        &mut self,
        offset: usize,
        elements: Self,
        operation: &'static str,
    ) -> Result<(), Error> {
        let extra = elements.len();
        if extra == 0 {
            return Ok(());
        }
        let old_len = self.len();
        let new_len = grown_len::<T>(old_len, self.max_index(), extra, operation)?;
        // Safety: the hole opened at offset is filled from `elements`, whose
        // buffer is then released without dropping.
        unsafe {
            self.realloc_raw(new_len, operation)?;
            let base = self.base();
            std::ptr::copy(base.add(offset), base.add(offset + extra), old_len - offset);
            std::ptr::copy_nonoverlapping(elements.base(), base.add(offset), extra);
            self.set_len(new_len);
            elements.release_buffer();
        }
        Ok(())
    }

    /// Removes and returns the element at `position`, shifting later
    /// elements down by one.
    pub fn remove(&mut self, position: i64) -> Result<T, Error> {
        log::trace!(
            "remove([{}..{}], {position})",
            self.min_index(),
            self.max_index()
        );
        let offset = self.element_offset(position, "remove")?;
        let len = self.len();
        if len == 1 {
            empty_at(self.min_index(), "remove")?;
        }
        let moved = len - offset - 1;
        let base = self.base();
        // Safety: the slot at offset is read out and the gap closed before
        // the shrink; both are undone if the shrink fails.
        unsafe {
            let value = base.add(offset).read();
            std::ptr::copy(base.add(offset + 1), base.add(offset), moved);
            if let Err(err) = self.shrink_to(len - 1, "remove") {
                std::ptr::copy(base.add(offset), base.add(offset + 1), moved);
                base.add(offset).write(value);
                return Err(err);
            }
            Ok(value)
        }
    }

    /// Removes up to `length` elements starting at `position` and returns
    /// them as an array anchored at `min_index`.
    ///
    /// A `length` reaching past `max_index` is clamped. A negative `length`
    /// is a [`Range`](crate::ErrorKind::Range) error and a `position`
    /// outside the array an [`Index`](crate::ErrorKind::Index) error.
    pub fn remove_array(&mut self, position: i64, length: i64) -> Result<Self, Error> {
        log::trace!(
            "remove_array([{}..{}], {position}, {length})",
            self.min_index(),
            self.max_index()
        );
        if length < 0 {
            return Err(Error::range("remove_array", "length is negative"));
        }
        let offset = self.element_offset(position, "remove_array")?;
        let len = self.len();
        let count = (length as u64).min((len - offset) as u64) as usize;
        if count == 0 || count == len {
            empty_at(self.min_index(), "remove_array")?;
        }
        // Safety: offset + count <= len and the anchor was validated above.
        unsafe { self.cut_run(offset, count, "remove_array") }
    }

    /// Removes the element at `position` by moving the last element into its
    /// place, then shrinks by one. Does not preserve order.
    pub fn swap_remove(&mut self, position: i64) -> Result<T, Error> {
        log::trace!(
            "swap_remove([{}..{}], {position})",
            self.min_index(),
            self.max_index()
        );
        let offset = self.element_offset(position, "swap_remove")?;
        let len = self.len();
        if len == 1 {
            empty_at(self.min_index(), "swap_remove")?;
        }
        let last = len - 1;
        let base = self.base();
        // Safety: see remove.
        unsafe {
            let value = base.add(offset).read();
            if offset != last {
                std::ptr::copy_nonoverlapping(base.add(last), base.add(offset), 1);
            }
            if let Err(err) = self.shrink_to(last, "swap_remove") {
                if offset != last {
                    std::ptr::copy_nonoverlapping(base.add(offset), base.add(last), 1);
                }
                base.add(offset).write(value);
                return Err(err);
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
#[path = "./splice_tests.rs"]
mod tests;
