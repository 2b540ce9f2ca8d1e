#![allow(unsafe_code)]

//! Prefix, suffix and interior extraction.
//!
//! Each operation comes in two forms. The borrowing form clones the selected
//! elements into a fresh array. The `_temp` form takes the source out of an
//! `Option` slot: when the whole array is selected the slot is emptied and
//! the buffer handed over as is, otherwise the selected elements are moved
//! out and the slot keeps the shrunk remainder.
//!
//! Out-of-range stops and lengths are clamped silently. Starts before
//! `min_index` are rejected with [`Index`](crate::ErrorKind::Index).

use crate::index::{below_pred, len_of, offset_of};
use crate::{Error, FlexArray};

impl<T> FlexArray<T> {
    /// Returns a copy of the elements at `min_index ..= stop`, anchored at
    /// `min_index`.
    ///
    /// A `stop` past `max_index` is clamped. `stop == min_index - 1` yields
    /// an empty array; anything smaller is an
    /// [`Index`](crate::ErrorKind::Index) error.
    pub fn head(&self, stop: i64) -> Result<Self, Error>
    where
        T: Clone,
    {
        log::trace!("head([{}..{}], {stop})", self.min_index(), self.max_index());
        let min = self.min_index();
        if stop >= min && !self.is_empty() {
            let stop = stop.min(self.max_index());
            self.clone_run(0, len_of(min, stop), min, "head")
        } else if below_pred(stop, min) {
            Err(Error::index("head", "stop is less than min_index - 1"))
        } else {
            Self::empty_result(min, "head")
        }
    }

    /// Moving form of [`head`](Self::head).
    ///
    /// When `stop >= max_index` the whole array is returned and `temp`
    /// becomes `None`. Otherwise the slot keeps `stop + 1 ..= max_index`.
    ///
    /// # Panics
    ///
    /// If `temp` is `None`.
    pub fn head_temp(temp: &mut Option<Self>, stop: i64) -> Result<Self, Error> {
        let arr = Self::in_slot(temp, "head_temp");
        log::trace!("head_temp([{}..{}], {stop})", arr.min_index(), arr.max_index());
        let min = arr.min_index();
        if stop >= min && !arr.is_empty() {
            if stop >= arr.max_index() {
                return Ok(Self::take_slot(temp, "head_temp"));
            }
            let keep = len_of(min, stop);
            let rest_len = arr.len() - keep;
            // Safety: the moved-out tail is cut off by shrink_to, or its copy
            // is released without dropping if the shrink fails.
            unsafe {
                let rest = arr.move_run_out(keep, rest_len, stop + 1, "head_temp")?;
                if let Err(err) = arr.shrink_to(keep, "head_temp") {
                    rest.release_buffer();
                    return Err(err);
                }
                Ok(std::mem::replace(arr, rest))
            }
        } else if below_pred(stop, min) {
            Err(Error::index("head_temp", "stop is less than min_index - 1"))
        } else {
            Self::empty_result(min, "head_temp")
        }
    }

    /// Returns a copy of the elements at `start ..= max_index`. The result
    /// keeps their positions, so its `min_index` is `start`.
    ///
    /// A `start` past `max_index` yields an empty array anchored at
    /// `min_index`. `start < min_index` is an
    /// [`Index`](crate::ErrorKind::Index) error.
    pub fn tail(&self, start: i64) -> Result<Self, Error>
    where
        T: Clone,
    {
        log::trace!("tail([{}..{}], {start})", self.min_index(), self.max_index());
        let min = self.min_index();
        if start < min {
            Err(Error::index("tail", "start is less than min_index"))
        } else if start <= self.max_index() {
            let offset = offset_of(min, start);
            self.clone_run(offset, len_of(start, self.max_index()), start, "tail")
        } else {
            Self::empty_result(min, "tail")
        }
    }

    /// Moving form of [`tail`](Self::tail).
    ///
    /// When `start == min_index` the whole array is returned and `temp`
    /// becomes `None`. Otherwise the slot keeps `min_index ..= start - 1`.
    ///
    /// # Panics
    ///
    /// If `temp` is `None`.
    pub fn tail_temp(temp: &mut Option<Self>, start: i64) -> Result<Self, Error> {
        let arr = Self::in_slot(temp, "tail_temp");
        log::trace!("tail_temp([{}..{}], {start})", arr.min_index(), arr.max_index());
        let min = arr.min_index();
        if start < min {
            Err(Error::index("tail_temp", "start is less than min_index"))
        } else if start == min {
            Ok(Self::take_slot(temp, "tail_temp"))
        } else if start <= arr.max_index() {
            let keep = offset_of(min, start);
            let out_len = arr.len() - keep;
            // Safety: see head_temp.
            unsafe {
                let out = arr.move_run_out(keep, out_len, start, "tail_temp")?;
                if let Err(err) = arr.shrink_to(keep, "tail_temp") {
                    out.release_buffer();
                    return Err(err);
                }
                Ok(out)
            }
        } else {
            Self::empty_result(min, "tail_temp")
        }
    }

    // Length of `start ..= stop` after clamping `stop` to `max_index`.
    fn range_len(&self, start: i64, stop: i64, operation: &'static str) -> Result<usize, Error> {
        let stop = stop.min(self.max_index());
        if below_pred(stop, start) {
            Err(Error::index(operation, "stop is less than start - 1"))
        } else {
            Ok(len_of(start, stop))
        }
    }

    /// Returns a copy of the elements at `start ..= stop`, re-anchored at
    /// `min_index`.
    ///
    /// A `stop` past `max_index` is clamped first. `start < min_index` and a
    /// clamped `stop < start - 1` are [`Index`](crate::ErrorKind::Index)
    /// errors, so a `start` beyond `max_index + 1` is rejected. A clamped
    /// `stop == start - 1` yields an empty array.
    pub fn range(&self, start: i64, stop: i64) -> Result<Self, Error>
    where
        T: Clone,
    {
        log::trace!(
            "range([{}..{}], {start}, {stop})",
            self.min_index(),
            self.max_index()
        );
        let min = self.min_index();
        if start < min {
            return Err(Error::index("range", "start is less than min_index"));
        }
        match self.range_len(start, stop, "range")? {
            0 => Self::empty_result(min, "range"),
            len => self.clone_run(offset_of(min, start), len, min, "range"),
        }
    }

    /// Moving form of [`range`](Self::range).
    ///
    /// When the selection covers the whole array it is returned and `temp`
    /// becomes `None`. Otherwise the slot keeps the remaining elements,
    /// closed up and still anchored at `min_index`.
    ///
    /// # Panics
    ///
    /// If `temp` is `None`.
    pub fn range_temp(temp: &mut Option<Self>, start: i64, stop: i64) -> Result<Self, Error> {
        let arr = Self::in_slot(temp, "range_temp");
        log::trace!(
            "range_temp([{}..{}], {start}, {stop})",
            arr.min_index(),
            arr.max_index()
        );
        let min = arr.min_index();
        if start < min {
            return Err(Error::index("range_temp", "start is less than min_index"));
        }
        match arr.range_len(start, stop, "range_temp")? {
            0 => Self::empty_result(min, "range_temp"),
            len if len == arr.len() => Ok(Self::take_slot(temp, "range_temp")),
            len => unsafe { arr.cut_run(offset_of(min, start), len, "range_temp") },
        }
    }

    // Clamped length of `length` elements from `start`, or None when empty.
    fn subarr_len(&self, start: i64, length: i64) -> Option<usize> {
        if length != 0 && start <= self.max_index() && !self.is_empty() {
            let available = len_of(start, self.max_index()) as u64;
            Some((length as u64).min(available) as usize)
        } else {
            None
        }
    }

    /// Returns a copy of up to `length` elements starting at `start`,
    /// re-anchored at `min_index`.
    ///
    /// A `length` reaching past `max_index` is clamped. `start < min_index`
    /// and a negative `length` are [`Index`](crate::ErrorKind::Index) errors.
    pub fn subarr(&self, start: i64, length: i64) -> Result<Self, Error>
    where
        T: Clone,
    {
        log::trace!(
            "subarr([{}..{}], {start}, {length})",
            self.min_index(),
            self.max_index()
        );
        let min = self.min_index();
        if start < min || length < 0 {
            return Err(Error::index(
                "subarr",
                "start is less than min_index or length is negative",
            ));
        }
        match self.subarr_len(start, length) {
            Some(len) => self.clone_run(offset_of(min, start), len, min, "subarr"),
            None => Self::empty_result(min, "subarr"),
        }
    }

    /// Moving form of [`subarr`](Self::subarr).
    ///
    /// # Panics
    ///
    /// If `temp` is `None`.
    pub fn subarr_temp(temp: &mut Option<Self>, start: i64, length: i64) -> Result<Self, Error> {
        let arr = Self::in_slot(temp, "subarr_temp");
        log::trace!(
            "subarr_temp([{}..{}], {start}, {length})",
            arr.min_index(),
            arr.max_index()
        );
        let min = arr.min_index();
        if start < min || length < 0 {
            return Err(Error::index(
                "subarr_temp",
                "start is less than min_index or length is negative",
            ));
        }
        match arr.subarr_len(start, length) {
            Some(len) if len == arr.len() => Ok(Self::take_slot(temp, "subarr_temp")),
            Some(len) => unsafe { arr.cut_run(offset_of(min, start), len, "subarr_temp") },
            None => Self::empty_result(min, "subarr_temp"),
        }
    }

    /// Moves `len` elements at buffer offset `offset` into a new array
    /// anchored at `min_index`, closes the gap and shrinks the buffer.
    ///
    /// On failure the array is left exactly as it was.
    ///
    /// # Safety
    ///
    /// `offset + len <= self.len()`, and `len` must not be the whole array
    /// when `min_index` is `MIN_INDEX`.
    pub(crate) unsafe fn cut_run(
        &mut self,
        offset: usize,
        len: usize,
        operation: &'static str,
    ) -> Result<Self, Error> {
        let total = self.len();
        let moved = total - offset - len;
        let base = self.base();
        // Safety: offsets are within the buffer; the gap is closed before
        // the shrink and reopened if the shrink fails.
        unsafe {
            let out = self.move_run_out(offset, len, self.min_index(), operation)?;
            std::ptr::copy(base.add(offset + len), base.add(offset), moved);
            if let Err(err) = self.shrink_to(total - len, operation) {
                std::ptr::copy(base.add(offset), base.add(offset + len), moved);
                std::ptr::copy_nonoverlapping(out.base(), base.add(offset), len);
                out.release_buffer();
                return Err(err);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
#[path = "./slice_tests.rs"]
mod tests;
