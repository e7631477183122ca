//! # In-Memory Transaction
//!
//! A transaction assembled in memory, implementing every host port so the
//! script can run without a chain. Script hashes are CKB blake2b of the
//! script's molecule encoding; proofs are checked by [`InMemoryLedger`].

use super::memory_ledger::{blake2b_256, InMemoryLedger};
use crate::errors::HostError;
use crate::ports::{CellMeta, ContentHasher, ProofVerifier, Source, TransactionView};
use sb_types::{CellInput, Hash, OutPoint, Record, Script, WitnessArgs};

/// A cell before it is placed in a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MockCell {
    /// Lock script.
    pub lock: Script,
    /// Type script, if any.
    pub type_script: Option<Script>,
    /// Cell data.
    pub data: Vec<u8>,
}

impl MockCell {
    /// Cell with only a lock.
    pub fn new(lock: Script) -> Self {
        Self {
            lock,
            type_script: None,
            data: Vec::new(),
        }
    }

    /// Attach a type script.
    #[must_use]
    pub fn with_type(mut self, type_script: Script) -> Self {
        self.type_script = Some(type_script);
        self
    }

    /// Set the cell data.
    #[must_use]
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// Transaction held in memory.
#[derive(Debug, Clone)]
pub struct InMemoryTransaction {
    script: Script,
    inputs: Vec<(CellInput, MockCell)>,
    outputs: Vec<MockCell>,
    witnesses: Vec<Option<Vec<u8>>>,
}

impl InMemoryTransaction {
    /// Previous transaction of inputs added without an explicit out-point.
    pub const DEFAULT_PREVIOUS_TX: Hash = [0x11; 32];

    /// Start a transaction executing `script` as its type script.
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script,
            inputs: Vec::new(),
            outputs: Vec::new(),
            witnesses: Vec::new(),
        }
    }

    /// Hash of `script` as this host computes it.
    pub fn script_hash(script: &Script) -> Hash {
        blake2b_256(&script.encode())
    }

    /// Append an input spending `(DEFAULT_PREVIOUS_TX, index)`.
    #[must_use]
    pub fn with_input(self, cell: MockCell) -> Self {
        let index = u32::try_from(self.inputs.len()).unwrap_or(u32::MAX);
        self.with_input_from(cell, OutPoint::new(Self::DEFAULT_PREVIOUS_TX, index))
    }

    /// Append an input spending `out_point`.
    #[must_use]
    pub fn with_input_from(mut self, cell: MockCell, out_point: OutPoint) -> Self {
        self.inputs.push((CellInput::new(out_point, 0), cell));
        self
    }

    /// Append an output.
    #[must_use]
    pub fn with_output(mut self, cell: MockCell) -> Self {
        self.outputs.push(cell);
        self
    }

    /// Set the witness at absolute `index`.
    #[must_use]
    pub fn with_witness(self, index: usize, witness: &WitnessArgs) -> Self {
        self.with_raw_witness(index, witness.encode())
    }

    /// Set raw witness bytes at absolute `index`.
    #[must_use]
    pub fn with_raw_witness(mut self, index: usize, bytes: Vec<u8>) -> Self {
        if self.witnesses.len() <= index {
            self.witnesses.resize(index + 1, None);
        }
        self.witnesses[index] = Some(bytes);
        self
    }

    /// The script being executed.
    pub fn script(&self) -> &Script {
        &self.script
    }

    fn carries_script(&self, cell: &MockCell) -> bool {
        cell.type_script.as_ref() == Some(&self.script)
    }

    /// Absolute index and whether it refers to the input side.
    fn resolve(&self, index: usize, source: Source) -> Option<(usize, bool)> {
        match source {
            Source::Input => (index < self.inputs.len()).then_some((index, true)),
            Source::Output => (index < self.outputs.len()).then_some((index, false)),
            Source::GroupInput => self
                .inputs
                .iter()
                .enumerate()
                .filter(|(_, (_, cell))| self.carries_script(cell))
                .nth(index)
                .map(|(i, _)| (i, true)),
            Source::GroupOutput => self
                .outputs
                .iter()
                .enumerate()
                .filter(|(_, cell)| self.carries_script(cell))
                .nth(index)
                .map(|(i, _)| (i, false)),
        }
    }

    fn resolve_cell(&self, index: usize, source: Source) -> Option<&MockCell> {
        let (abs, is_input) = self.resolve(index, source)?;
        if is_input {
            self.inputs.get(abs).map(|(_, cell)| cell)
        } else {
            self.outputs.get(abs)
        }
    }
}

impl TransactionView for InMemoryTransaction {
    fn current_script(&self) -> Result<Script, HostError> {
        Ok(self.script.clone())
    }

    fn current_script_hash(&self) -> Result<Hash, HostError> {
        Ok(Self::script_hash(&self.script))
    }

    fn cell(&self, index: usize, source: Source) -> Result<Option<CellMeta>, HostError> {
        Ok(self.resolve_cell(index, source).map(|cell| CellMeta {
            lock: cell.lock.clone(),
            lock_hash: Self::script_hash(&cell.lock),
            type_script: cell.type_script.clone(),
            type_hash: cell.type_script.as_ref().map(Self::script_hash),
        }))
    }

    fn cell_data(&self, index: usize, source: Source) -> Result<Option<Vec<u8>>, HostError> {
        Ok(self
            .resolve_cell(index, source)
            .map(|cell| cell.data.clone()))
    }

    fn witness(&self, index: usize, source: Source) -> Result<Option<Vec<u8>>, HostError> {
        let abs = match source {
            Source::Input | Source::Output => Some(index),
            Source::GroupInput | Source::GroupOutput => {
                self.resolve(index, source).map(|(abs, _)| abs)
            }
        };
        Ok(abs.and_then(|abs| self.witnesses.get(abs).cloned().flatten()))
    }

    fn cell_input(&self, index: usize, source: Source) -> Result<Option<CellInput>, HostError> {
        match source {
            Source::Output | Source::GroupOutput => Ok(None),
            Source::Input | Source::GroupInput => Ok(self
                .resolve(index, source)
                .and_then(|(abs, _)| self.inputs.get(abs))
                .map(|(input, _)| *input)),
        }
    }
}

impl ContentHasher for InMemoryTransaction {
    fn hash(&self, data: &[u8]) -> Hash {
        blake2b_256(data)
    }
}

impl ProofVerifier for InMemoryTransaction {
    fn verify_proof(
        &self,
        root: &Hash,
        proof: &[u8],
        leaves: &[(Hash, Hash)],
    ) -> Result<bool, HostError> {
        Ok(InMemoryLedger::verify(root, proof, leaves))
    }
}
