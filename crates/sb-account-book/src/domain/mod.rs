//! # Domain Layer
//!
//! Pure account book rules: transitions, claimants, ledger conventions,
//! distribution arithmetic and invariants. Nothing here talks to the host
//! except through the hashing port.

pub mod distribution;
pub mod entities;
pub mod invariants;
pub mod ledger;
pub mod spore;

pub use distribution::*;
pub use entities::*;
pub use invariants::*;
pub use ledger::*;
pub use spore::*;
