#![cfg_attr(docsrs, doc(cfg(feature = "serde")))]

//! Provides [`serde::Serialize`] support for [`FlexArray`]
//!
//! An array serializes as a plain sequence of its elements in ascending index
//! order. The bounds are not part of the output.

use serde::ser::SerializeSeq;

use crate::FlexArray;

impl<T> serde::Serialize for FlexArray<T>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}
