//! # Ledger Conventions
//!
//! The ledger is a map `key -> u128` committed only through the book's SMT
//! root. Keys are host hashes of fixed labels (or of a spore id); a present
//! value `v` is committed as `hash(v as 16 LE bytes)` and an absent key as
//! the zero word.
//!
//! A transaction proves exactly three entries against a root: the two
//! reserved totals plus the entry of the party it touches.

use crate::domain::entities::{Claimant, Stakeholder};
use crate::ports::ContentHasher;
use sb_types::{Hash, ZERO_HASH};
use serde::{Deserialize, Serialize};

/// A ledger key before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKey {
    /// Lifetime income of the book.
    TotalIncome,
    /// Tokens currently held by the book.
    AccountBalance,
    /// Cumulative withdrawal of the author.
    Author,
    /// Cumulative withdrawal of the platform.
    Platform,
    /// Cumulative withdrawal of one buyer, keyed by spore id.
    Buyer(Hash),
}

impl LedgerKey {
    /// Bytes hashed to form the SMT key.
    pub fn preimage(&self) -> &[u8] {
        match self {
            Self::TotalIncome => b"TotalIncome".as_slice(),
            Self::AccountBalance => b"AccountBalance".as_slice(),
            // Deployed books use this spelling.
            Self::Author => b"Auther".as_slice(),
            Self::Platform => b"Platform".as_slice(),
            Self::Buyer(spore_id) => spore_id.as_slice(),
        }
    }

    /// SMT key.
    pub fn hashed(&self, hasher: &(impl ContentHasher + ?Sized)) -> Hash {
        hasher.hash(self.preimage())
    }

    /// Entry holding `claimant`'s cumulative withdrawal.
    pub fn for_claimant(claimant: &Claimant) -> Self {
        match claimant {
            Claimant::Stakeholder(Stakeholder::Platform) => Self::Platform,
            Claimant::Stakeholder(Stakeholder::Author) => Self::Author,
            Claimant::Buyer { spore_id, .. } => Self::Buyer(*spore_id),
        }
    }
}

/// A ledger value before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerValue {
    /// Never written.
    Absent,
    /// Written, possibly with zero.
    Amount(u128),
}

impl LedgerValue {
    /// Map an optional amount (`None` = absent).
    pub fn from_option(value: Option<u128>) -> Self {
        value.map_or(Self::Absent, Self::Amount)
    }

    /// Numeric value, treating absence as zero.
    pub fn amount(self) -> u128 {
        match self {
            Self::Absent => 0,
            Self::Amount(v) => v,
        }
    }

    /// SMT value.
    pub fn hashed(&self, hasher: &(impl ContentHasher + ?Sized)) -> Hash {
        match self {
            Self::Absent => ZERO_HASH,
            Self::Amount(v) => hasher.hash(&v.to_le_bytes()),
        }
    }
}

/// The three entries a single proof check asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Value under [`LedgerKey::TotalIncome`].
    pub total_income: u128,
    /// Value under [`LedgerKey::AccountBalance`].
    pub account_balance: u128,
    /// The touched party's key.
    pub key: LedgerKey,
    /// The touched party's value.
    pub value: LedgerValue,
}

impl LedgerSnapshot {
    /// Build a snapshot.
    pub fn new(total_income: u128, account_balance: u128, key: LedgerKey, value: LedgerValue) -> Self {
        Self {
            total_income,
            account_balance,
            key,
            value,
        }
    }

    /// `(key, value)` pairs as the SMT sees them.
    pub fn leaves(&self, hasher: &(impl ContentHasher + ?Sized)) -> [(Hash, Hash); 3] {
        [
            (
                LedgerKey::TotalIncome.hashed(hasher),
                LedgerValue::Amount(self.total_income).hashed(hasher),
            ),
            (
                LedgerKey::AccountBalance.hashed(hasher),
                LedgerValue::Amount(self.account_balance).hashed(hasher),
            ),
            (self.key.hashed(hasher), self.value.hashed(hasher)),
        ]
    }
}
