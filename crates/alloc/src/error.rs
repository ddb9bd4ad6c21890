use core::fmt;

/// An error from checked element access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The index is not less than the number of elements.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The number of elements at the time of the request.
        len: usize,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} is out of range for length {len}")
            }
        }
    }
}

impl std::error::Error for AccessError {}
