//! # Driven Ports (SPI - Outbound)
//!
//! Host capabilities the account book script depends on:
//! - Transaction introspection (cells, witnesses, inputs, current script)
//! - Content hashing
//! - SMT proof verification
//!
//! On chain these are syscalls; tests use [`crate::adapters::InMemoryTransaction`].
//! Every accessor returns `Ok(None)` for an index past the end, so cell
//! enumeration is an explicit walk that stops at the first `None`.

use crate::errors::{AccountBookError, HostError};
use sb_types::{CellInput, Hash, Script};

/// Which cell list an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// All transaction inputs.
    Input,
    /// All transaction outputs.
    Output,
    /// Inputs carrying the current script.
    GroupInput,
    /// Outputs carrying the current script.
    GroupOutput,
}

/// Scripts attached to a cell, with their hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMeta {
    /// Lock script.
    pub lock: Script,
    /// Hash of `lock`.
    pub lock_hash: Hash,
    /// Type script, if any.
    pub type_script: Option<Script>,
    /// Hash of `type_script`, if any.
    pub type_hash: Option<Hash>,
}

impl CellMeta {
    /// Code hash of the type script, if any.
    pub fn type_code_hash(&self) -> Option<Hash> {
        self.type_script.as_ref().map(|s| s.code_hash)
    }
}

// =============================================================================
// TRANSACTION INTROSPECTION
// =============================================================================

/// Read-only view of the transaction being validated.
pub trait TransactionView {
    /// The script being executed.
    fn current_script(&self) -> Result<Script, HostError>;

    /// Hash of the script being executed.
    fn current_script_hash(&self) -> Result<Hash, HostError>;

    /// Scripts of cell `index` in `source`.
    fn cell(&self, index: usize, source: Source) -> Result<Option<CellMeta>, HostError>;

    /// Data of cell `index` in `source`.
    fn cell_data(&self, index: usize, source: Source) -> Result<Option<Vec<u8>>, HostError>;

    /// Raw witness at `index` in `source`.
    fn witness(&self, index: usize, source: Source) -> Result<Option<Vec<u8>>, HostError>;

    /// Input record (`since` + out-point) at `index`.
    ///
    /// Always `None` for output sources.
    fn cell_input(&self, index: usize, source: Source) -> Result<Option<CellInput>, HostError>;

    /// Whether cell `index` exists in `source`.
    fn exists(&self, index: usize, source: Source) -> Result<bool, HostError> {
        Ok(self.cell(index, source)?.is_some())
    }
}

// =============================================================================
// HASHING / PROOFS
// =============================================================================

/// The host's 32-byte content hash.
pub trait ContentHasher {
    /// Hash `data`.
    fn hash(&self, data: &[u8]) -> Hash;
}

/// SMT proof verification.
pub trait ProofVerifier {
    /// Check that `proof` opens `leaves` (key, value-hash) under `root`.
    ///
    /// A zero value-hash asserts absence. Malformed proofs return `Ok(false)`.
    fn verify_proof(
        &self,
        root: &Hash,
        proof: &[u8],
        leaves: &[(Hash, Hash)],
    ) -> Result<bool, HostError>;
}

/// Everything the script needs from its host.
pub trait Host: TransactionView + ContentHasher + ProofVerifier {}

impl<T: TransactionView + ContentHasher + ProofVerifier + ?Sized> Host for T {}

// =============================================================================
// CELL ENUMERATION
// =============================================================================

/// Walk over the cells of one source, refusing transactions larger than
/// `limit`.
pub struct Cells<'a, V: ?Sized> {
    view: &'a V,
    source: Source,
    index: usize,
    limit: usize,
    done: bool,
}

impl<'a, V: TransactionView + ?Sized> Cells<'a, V> {
    /// Start a walk from index 0.
    pub fn new(view: &'a V, source: Source, limit: usize) -> Self {
        Self {
            view,
            source,
            index: 0,
            limit,
            done: false,
        }
    }
}

impl<V: TransactionView + ?Sized> Iterator for Cells<'_, V> {
    type Item = Result<(usize, CellMeta), AccountBookError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let index = self.index;
        let cell = match self.view.cell(index, self.source) {
            Ok(cell) => cell,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };
        let Some(cell) = cell else {
            self.done = true;
            return None;
        };
        if index >= self.limit {
            self.done = true;
            return Some(Err(AccountBookError::shape(format!(
                "more than {} cells in {:?}",
                self.limit, self.source
            ))));
        }
        self.index += 1;
        Some(Ok((index, cell)))
    }
}

/// Count cells in `source`, stopping at two.
pub fn count_up_to_two<V: TransactionView + ?Sized>(
    view: &V,
    source: Source,
) -> Result<usize, HostError> {
    if !view.exists(0, source)? {
        return Ok(0);
    }
    if !view.exists(1, source)? {
        return Ok(1);
    }
    Ok(2)
}
