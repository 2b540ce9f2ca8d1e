use std::fmt::{self, Debug, Display};

/// Error returned by a failed array operation.
///
/// A failed operation leaves every `&mut` receiver and temporary slot it was
/// given exactly as it found them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// Name of the operation that failed, e.g. `"head"`.
    pub operation: &'static str,
    /// Short description of the violated condition.
    pub reason: &'static str,
}

impl Error {
    #[cold]
    pub(crate) fn new(kind: ErrorKind, operation: &'static str, reason: &'static str) -> Self {
        log::debug!("{operation}: {reason} ({kind})");
        Self {
            kind,
            operation,
            reason,
        }
    }

    #[cold]
    pub(crate) fn memory(operation: &'static str) -> Self {
        Self::new(ErrorKind::Memory, operation, "not enough memory")
    }

    #[cold]
    pub(crate) fn index(operation: &'static str, reason: &'static str) -> Self {
        Self::new(ErrorKind::Index, operation, reason)
    }

    #[cold]
    pub(crate) fn range(operation: &'static str, reason: &'static str) -> Self {
        Self::new(ErrorKind::Range, operation, reason)
    }

    /// Re-labels an error raised by a helper with the public operation name.
    #[inline]
    pub(crate) fn during(self, operation: &'static str) -> Self {
        Self { operation, ..self }
    }
}

impl std::error::Error for Error {}

/// The three failure classes of the array engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An allocation failed, or a computed length or index exceeds the
    /// representable limits.
    Memory,

    /// A request is internally inconsistent (negative length, `max < min - 1`)
    /// or would produce an array state that cannot be encoded, such as an
    /// empty array anchored at [`MIN_INDEX`](crate::MIN_INDEX).
    Range,

    /// A position lies outside the addressable range of the array.
    Index,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Memory => "memory-error",
            Self::Range => "range-error",
            Self::Index => "index-error",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation)?;
        f.write_str(": ")?;
        f.write_str(self.reason)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in `{}`: {}", self.kind, self.operation, self.reason)
    }
}

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
