//! # Error Types
//!
//! Every rejection the account book script can produce. All are fatal: the
//! first violation aborts validation and the transaction is refused.

use sb_types::CodecError;
use thiserror::Error;

// =============================================================================
// HOST ERRORS
// =============================================================================

/// Failure of a host introspection primitive.
///
/// Out-of-range lookups are not errors; they surface as `None` from the
/// transaction view.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A syscall returned a non-success code.
    #[error("host call {call} failed with code {code}")]
    Syscall { call: &'static str, code: i64 },

    /// The host could not serve the request at all.
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Reasons an account book transaction is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountBookError {
    /// Wrong number or wiring of cells for the transition.
    #[error("transaction shape violation: {0}")]
    TransactionShape(String),

    /// A configuration field differs between the old and new cell.
    #[error("immutable field changed: {field}")]
    ImmutableField { field: &'static str },

    /// Token totals or balances do not match.
    #[error("conservation violation: {0}")]
    Conservation(String),

    /// The ledger proof does not open the asserted entries.
    #[error("ledger proof rejected at {stage} (root {root})")]
    LedgerProof { stage: &'static str, root: String },

    /// Overflow, division by zero or a malformed distribution table.
    #[error("arithmetic violation: {0}")]
    Arithmetic(String),

    /// The sale counter did not move as required.
    #[error("buyer count violation: expected {expected}, found {found}")]
    BuyerCount { expected: u32, found: u32 },

    /// Claimant, spore or marker cell is not entitled to act.
    #[error("eligibility violation: {0}")]
    Eligibility(String),

    /// A required witness slot is empty.
    #[error("missing witness: {slot}")]
    MissingWitness { slot: &'static str },

    /// Record bytes failed to decode.
    #[error("encoding violation: {0}")]
    Encoding(#[from] CodecError),

    /// A host primitive failed.
    #[error("host failure: {0}")]
    Host(#[from] HostError),
}

/// Coarse classification used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    HostFailure,
    EncodingViolation,
    TransactionShapeViolation,
    ConservationViolation,
    EligibilityViolation,
    LedgerProofViolation,
    BuyerCountViolation,
    ArithmeticViolation,
    ImmutableFieldViolation,
}

impl ErrorKind {
    /// Stable, non-zero process exit code.
    #[must_use]
    pub fn exit_code(self) -> i8 {
        match self {
            Self::HostFailure => 2,
            Self::EncodingViolation => 3,
            Self::TransactionShapeViolation => 6,
            Self::ConservationViolation => 8,
            Self::EligibilityViolation => 10,
            Self::LedgerProofViolation => 11,
            Self::BuyerCountViolation => 12,
            Self::ArithmeticViolation => 13,
            Self::ImmutableFieldViolation => 16,
        }
    }
}

impl AccountBookError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransactionShape(_) => ErrorKind::TransactionShapeViolation,
            Self::ImmutableField { .. } => ErrorKind::ImmutableFieldViolation,
            Self::Conservation(_) => ErrorKind::ConservationViolation,
            Self::LedgerProof { .. } => ErrorKind::LedgerProofViolation,
            Self::Arithmetic(_) => ErrorKind::ArithmeticViolation,
            Self::BuyerCount { .. } => ErrorKind::BuyerCountViolation,
            Self::Eligibility(_) => ErrorKind::EligibilityViolation,
            Self::MissingWitness { .. } | Self::Encoding(_) => ErrorKind::EncodingViolation,
            Self::Host(_) => ErrorKind::HostFailure,
        }
    }

    /// Exit code reported to the chain.
    #[must_use]
    pub fn exit_code(&self) -> i8 {
        self.kind().exit_code()
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        Self::TransactionShape(msg.into())
    }

    pub(crate) fn conservation(msg: impl Into<String>) -> Self {
        Self::Conservation(msg.into())
    }

    pub(crate) fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    pub(crate) fn eligibility(msg: impl Into<String>) -> Self {
        Self::Eligibility(msg.into())
    }
}
