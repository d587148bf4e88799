//! Error handling for the virtual coordinate engine

use thiserror::Error;

/// Main error type for virtual chromosome operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VirtError {
    /// No regions to build a virtual space from
    #[error("Region table is empty")]
    EmptyRegionTable,

    /// Requested range has `start >= end`
    #[error("Empty virtual range: {start}-{end}")]
    EmptyRange {
        /// Requested start
        start: u64,
        /// Requested end
        end: u64,
    },

    /// Offset beyond the virtual length
    #[error("Virtual offset {offset} outside virtual space of length {length}")]
    OutOfRange {
        /// Offending offset
        offset: u64,
        /// Virtual length, or the count being indexed
        length: u64,
    },

    /// Regions overlap or descend within a sequence, or a region is invalid
    #[error("Region table invariant violated: {message}")]
    InvariantViolation {
        /// What was violated
        message: String,
    },

    /// Position string could not be parsed
    #[error("Malformed position '{input}': {reason}")]
    MalformedPosition {
        /// Text as entered
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Range would materialize more windows than allowed
    #[error("Too many windows: {count} exceeds limit of {limit}")]
    TooManyWindows {
        /// Windows the range spans
        count: usize,
        /// Configured cap
        limit: usize,
    },

    /// Sequence missing from the size lookup
    #[error("Unknown sequence: {name}")]
    UnknownSequence {
        /// Sequence id
        name: String,
    },

    /// Materialized windows do not cover the requested range
    #[error("Internal consistency failure: {message}")]
    Consistency {
        /// Details of the mismatch
        message: String,
    },
}

impl VirtError {
    /// Create an empty range error
    pub fn empty_range(start: u64, end: u64) -> Self {
        Self::EmptyRange { start, end }
    }

    /// Create an out of range error
    pub fn out_of_range(offset: u64, length: u64) -> Self {
        Self::OutOfRange { offset, length }
    }

    /// Create an invariant violation error
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        Self::InvariantViolation { message: message.into() }
    }

    /// Create a malformed position error
    pub fn malformed<S: Into<String>, R: Into<String>>(input: S, reason: R) -> Self {
        Self::MalformedPosition {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown sequence error
    pub fn unknown_sequence<S: Into<String>>(name: S) -> Self {
        Self::UnknownSequence { name: name.into() }
    }

    /// Create a consistency error
    pub fn consistency<S: Into<String>>(message: S) -> Self {
        Self::Consistency { message: message.into() }
    }

    /// Errors the caller should surface to the user as "re-enter a position".
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::MalformedPosition { .. })
    }

    /// Errors that indicate a caller bug. These abort the current view
    /// construction and are never recovered.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::EmptyRegionTable
                | Self::EmptyRange { .. }
                | Self::OutOfRange { .. }
                | Self::Consistency { .. }
        )
    }
}

/// Result type for virtual chromosome operations
pub type VirtResult<T> = Result<T, VirtError>;
