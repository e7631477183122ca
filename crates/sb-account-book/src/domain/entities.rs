//! # Domain Entities
//!
//! Lifecycle transitions and withdrawal claimants.

use sb_types::Hash;
use serde::{Deserialize, Serialize};

/// The lifecycle step a transaction performs on the account book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// A new book appears with no predecessor.
    Creation,
    /// A spore is sold and the proceeds enter the book.
    Selling,
    /// A claimant takes its share out of the book.
    Withdrawal,
}

impl Transition {
    /// Lowercase name for log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Selling => "selling",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Fixed parties that take a cut of every sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stakeholder {
    /// Share at `ratio[0]`.
    Platform,
    /// Share at `ratio[1]`.
    Author,
}

/// Who is withdrawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Claimant {
    /// Platform or author.
    Stakeholder(Stakeholder),
    /// Holder of a spore bought through this book.
    Buyer {
        /// Tier of the held spore.
        spore_level: u8,
        /// Type id of the held spore.
        spore_id: Hash,
    },
}
