//! Error types returned by the fallible table operations.

use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

/// ErrorKind is every kind of failure a table operation can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A construction parameter was out of range (zero capacity, load factor
    /// outside `(0, 1)`, or a capacity that would overflow).
    InvalidArgument,
    /// The backing store could not be allocated.
    AllocationFailure,
    /// The requested value is not present.
    NotFound,
    /// The operation needs at least one element.
    Empty,
    /// A resize could not be satisfied under the current load factor.
    Invalid,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::AllocationFailure => "AllocationFailure",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Empty => "Empty",
            ErrorKind::Invalid => "Invalid",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into_static())
    }
}

/// Error is the error struct returned by all fallible table operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}{} => {message}", DisplayContext(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add more context in error.
    ///
    /// # Examples
    ///
    /// ```
    /// use robin_hash::error::Error;
    /// use robin_hash::error::ErrorKind;
    ///
    /// let error = Error::new(ErrorKind::Invalid, "cannot shrink").with_context("count", 10);
    /// assert_eq!(error.kind(), ErrorKind::Invalid);
    /// assert_eq!(error.to_string(), "Invalid, context: { count: 10 } => cannot shrink");
    /// ```
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub(crate) fn empty() -> Self {
        Self::new(ErrorKind::Empty, "the collection is empty")
    }

    pub(crate) fn not_found() -> Self {
        Self::new(ErrorKind::NotFound, "value not present")
    }

    pub(crate) fn cardinality_overflow(cardinality: usize, added: usize) -> Self {
        Self::new(ErrorKind::InvalidArgument, "cardinality overflows usize")
            .with_context("cardinality", cardinality)
            .with_context("added", added)
    }
}

struct DisplayContext<'a>(&'a [(&'static str, String)]);

impl fmt::Display for DisplayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(", context: { ")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v}")?;
        }
        f.write_str(" }")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_without_context() {
        let error = Error::new(ErrorKind::NotFound, "missing");
        assert_eq!(error.to_string(), "NotFound => missing");
        assert_eq!(error.message(), "missing");
    }

    #[test]
    fn display_with_context() {
        let error = Error::new(ErrorKind::InvalidArgument, "bad load")
            .with_context("load", 1.5)
            .with_context("capacity", 3);
        assert_eq!(
            error.to_string(),
            "InvalidArgument, context: { load: 1.5, capacity: 3 } => bad load"
        );
    }

    #[test]
    fn kinds_have_stable_names() {
        assert_eq!(ErrorKind::AllocationFailure.to_string(), "AllocationFailure");
        assert_eq!(ErrorKind::Empty.into_static(), "Empty");
        assert_eq!(Error::empty().kind(), ErrorKind::Empty);
        assert_eq!(Error::not_found().kind(), ErrorKind::NotFound);
    }
}
