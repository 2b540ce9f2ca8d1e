//! Flexible arrays addressed by an arbitrary signed index range.
//!
//! A [`FlexArray`] covers `min_index ..= max_index` for any `i64` origin and
//! always owns a buffer of exactly its length. Slicing, splicing and removal
//! either copy (`head`, `range`, ...) or move out of a temporary slot
//! (`head_temp`, `range_temp`, ...), so large arrays can be split without
//! cloning a single element.
//!
//! Failures are reported as an [`Error`] carrying an [`ErrorKind`]; a failed
//! call never leaves the array it was working on half modified.
//!
//! # Examples
//!
//! ```
//! use flexarr::{Error, FlexArray};
//!
//! let mut a = FlexArray::from_vec(1, vec![10, 20, 30, 40, 50])?;
//!
//! let head = a.head(3)?;
//! assert_eq!(head.as_slice(), [10, 20, 30]);
//!
//! let tail = a.tail(3)?;
//! assert_eq!((tail.min_index(), tail.max_index()), (3, 5));
//!
//! a.insert(1, 5)?;
//! assert_eq!(a.remove(6)?, 50);
//! a.sort_descending(|x, y| x.cmp(y));
//! assert_eq!(a.as_slice(), [40, 30, 20, 10, 5]);
//!
//! // Split without copying: the slot keeps the prefix.
//! let mut slot = Some(a);
//! let rest = FlexArray::tail_temp(&mut slot, 3)?;
//! assert_eq!(rest.as_slice(), [20, 10, 5]);
//! assert_eq!(slot.unwrap().as_slice(), [40, 30]);
//! # Ok::<(), Error>(())
//! ```

mod argv;
mod array;
mod error;
mod fill;
mod index;
mod raw;
mod slice;
pub mod sort;
mod splice;

pub use argv::{ArgVector, program_name};
pub use array::{FlexArray, IntoIter};
pub use error::{Error, ErrorKind};
pub use index::{MAX_INDEX, MIN_INDEX, count, max_from_count, offset_of};

#[cfg(feature = "serde")]
pub mod impl_serde;
