//! Error types

use std::collections::TryReserveError;
use std::fmt;

use crate::buffer::ContentType;

/// Error returned when buffer storage could not be obtained
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AllocationError {
    /// The allocator refused to provide the requested storage.
    Reserve(TryReserveError),
    /// Growing the buffer would take it past its configured maximum length.
    LimitExceeded { limit: usize },
}

impl From<TryReserveError> for AllocationError {
    fn from(error: TryReserveError) -> Self {
        AllocationError::Reserve(error)
    }
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::Reserve(err) => write!(f, "unable to reserve storage: {}", err),
            AllocationError::LimitExceeded { limit } => {
                write!(f, "buffer length limit of {} exceeded", limit)
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Error returned from buffer operations
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum BufferError {
    Allocation(AllocationError),
    /// The operation is not valid for the buffer's current content type.
    ContentType {
        expected: ContentType,
        actual: ContentType,
    },
    /// The item range does not lie within the supplied text.
    ItemOutOfBounds {
        offset: usize,
        length: usize,
        text_length: usize,
    },
    /// The text is too long for its offsets to be stored as clusters.
    ClusterOverflow,
}

impl From<AllocationError> for BufferError {
    fn from(error: AllocationError) -> Self {
        BufferError::Allocation(error)
    }
}

impl From<TryReserveError> for BufferError {
    fn from(error: TryReserveError) -> Self {
        BufferError::Allocation(AllocationError::Reserve(error))
    }
}

impl From<std::num::TryFromIntError> for BufferError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        BufferError::ClusterOverflow
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Allocation(err) => write!(f, "buffer allocation: {}", err),
            BufferError::ContentType { expected, actual } => write!(
                f,
                "expected {} buffer content, found {}",
                expected, actual
            ),
            BufferError::ItemOutOfBounds {
                offset,
                length,
                text_length,
            } => write!(
                f,
                "item at offset {} with length {} exceeds text length {}",
                offset, length, text_length
            ),
            BufferError::ClusterOverflow => write!(f, "text offsets do not fit in a cluster"),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::Allocation(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors that originate when parsing tags, directions, scripts and languages
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
    BadValue,
    Empty,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BadValue => write!(f, "invalid value"),
            ParseError::Empty => write!(f, "empty value"),
        }
    }
}

impl std::error::Error for ParseError {}
