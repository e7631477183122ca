//! # Codec Errors
//!
//! Every decode failure names the record being read so a rejected
//! transaction can be traced back to the offending cell or witness.

use thiserror::Error;

/// Errors produced while decoding molecule-encoded records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer is too short to hold the record header.
    #[error("{record}: header too short ({len} bytes)")]
    HeaderTooShort {
        /// Record being decoded.
        record: &'static str,
        /// Bytes available.
        len: usize,
    },

    /// Declared total size disagrees with the buffer length.
    #[error("{record}: declared size {declared} != actual {actual}")]
    SizeMismatch {
        /// Record being decoded.
        record: &'static str,
        /// Size written in the header.
        declared: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// First field offset is misaligned or points inside the header.
    #[error("{record}: invalid first offset {offset}")]
    InvalidOffset {
        /// Record being decoded.
        record: &'static str,
        /// Offending offset.
        offset: usize,
    },

    /// Table carries the wrong number of fields.
    #[error("{record}: expected {expected} fields, found {found}")]
    FieldCount {
        /// Record being decoded.
        record: &'static str,
        /// Fields in the schema.
        expected: usize,
        /// Fields in the buffer.
        found: usize,
    },

    /// Field offsets decrease or overrun the record.
    #[error("{record}: field offsets out of order")]
    OffsetOrder {
        /// Record being decoded.
        record: &'static str,
    },

    /// A fixed-size field has the wrong length.
    #[error("{record}: fixed field is {actual} bytes, expected {expected}")]
    FixedLength {
        /// Record being decoded.
        record: &'static str,
        /// Schema length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Union item id is not part of the schema.
    #[error("{record}: unknown union item id {id}")]
    UnknownUnionItem {
        /// Record being decoded.
        record: &'static str,
        /// Item id found in the buffer.
        id: u32,
    },
}
