//! # Account Book Type Script
//!
//! On-chain validation of an "account book" cell: the consensus record of a
//! royalty ledger for sales of a spore cluster. Author, platform and buyers
//! share sale proceeds with no off-chain authority.
//!
//! ## Lifecycle
//!
//! | Transition | Trigger | Validator |
//! |------------|---------|-----------|
//! | Creation | no group input, one group output | `validators/creation.rs` |
//! | Selling | update + sale listing among inputs | `validators/selling.rs` |
//! | Withdrawal | update + withdrawal intent among inputs | `validators/withdrawal.rs` |
//!
//! Consuming the book without a successor is always rejected.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Configuration is immutable | `domain/invariants.rs` - `check_immutable()` |
//! | INVARIANT-2 | `buyer_count` +1 per sale, unchanged otherwise | `domain/invariants.rs` - `check_buyer_count()` |
//! | INVARIANT-3 | Token totals conserved, one book token cell per side | `validators/udt.rs` - `check_udt()` |
//! | INVARIANT-4 | Ratios sum to 100 over `level + 2` entries | `domain/distribution.rs` - `check_ratio()` |
//! | INVARIANT-5 | Every root change is proven | `validators/proof.rs` - `verify_snapshot()` |
//!
//! ## Ledger
//!
//! The ledger (`key -> u128`) lives off-chain; only its SMT root is stored.
//! See [`domain::ledger`] for the key and value conventions.
//!
//! ## Outbound Dependencies
//!
//! | Capability | Trait | Purpose |
//! |------------|-------|---------|
//! | Introspection | `TransactionView` | Cells, witnesses, inputs, current script |
//! | Hashing | `ContentHasher` | Ledger keys, data hashes, type ids |
//! | SMT | `ProofVerifier` | Open ledger entries under a root |
//!
//! ## Error Codes
//!
//! | Kind | Exit code |
//! |------|-----------|
//! | HostFailure | 2 |
//! | EncodingViolation | 3 |
//! | TransactionShapeViolation | 6 |
//! | ConservationViolation | 8 |
//! | EligibilityViolation | 10 |
//! | LedgerProofViolation | 11 |
//! | BuyerCountViolation | 12 |
//! | ArithmeticViolation | 13 |
//! | ImmutableFieldViolation | 16 |
//!
//! ## Usage Example
//!
//! ```ignore
//! use sb_account_book::prelude::*;
//!
//! let code = program_entry(&host, &ScriptConfig::default());
//! assert_eq!(code, 0);
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod instrumentation;
pub mod ports;
pub mod service;
pub mod validators;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Configuration
    pub use crate::config::{ScriptConfig, TypeIdConfig, DEFAULT_MAX_CELLS, EMPTY_LEDGER_ROOT};

    // Domain
    pub use crate::domain::{
        Claimant, LedgerKey, LedgerSnapshot, LedgerValue, Share, Stakeholder, Transition,
    };

    // Errors
    pub use crate::errors::{AccountBookError, ErrorKind, HostError};

    // Ports
    pub use crate::ports::{
        CellMeta, ContentHasher, Host, ProofVerifier, Source, TransactionView,
    };

    // Adapters
    pub use crate::adapters::{Blake2bHasher, InMemoryLedger, InMemoryTransaction, MockCell};

    // Instrumentation
    pub use crate::instrumentation::{CycleMeter, Profiler, SteppingMeter};

    // Service
    pub use crate::service::{program_entry, validate, AccountBookScript};
}

pub use errors::{AccountBookError, ErrorKind};
pub use service::{program_entry, validate, AccountBookScript};
