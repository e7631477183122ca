//! # Adapters
//!
//! In-memory implementations of the host ports, used by unit tests, the
//! workspace test suite and off-chain simulation.

pub mod memory_ledger;
pub mod mock_tx;

pub use memory_ledger::{blake2b_256, Blake2bHasher, InMemoryLedger, SmtHasher};
pub use mock_tx::{InMemoryTransaction, MockCell};
