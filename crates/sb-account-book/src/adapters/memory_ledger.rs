//! # In-Memory Ledger
//!
//! Off-chain copy of a book's ledger, committed through the same sparse
//! Merkle tree the deployed script checks against: CKB blake2b
//! (`ckb-default-hash` personalization) for keys, values and inner nodes.
//!
//! Only the hashed leaves are kept; the tree is rebuilt from them when a
//! root or a proof is needed. A proof opens exactly the requested keys, so
//! its size follows the tree depth rather than the number of buyers.

use crate::domain::ledger::{LedgerKey, LedgerSnapshot, LedgerValue};
use crate::ports::ContentHasher;
use sb_types::{Hash, ZERO_HASH};
use sparse_merkle_tree::default_store::DefaultStore;
use sparse_merkle_tree::traits::Hasher;
use sparse_merkle_tree::{CompiledMerkleProof, SparseMerkleTree, H256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::error;

/// Personalization of every CKB blake2b hash.
pub const CKB_HASH_PERSONALIZATION: &[u8] = b"ckb-default-hash";

const HASH_SIZE: usize = 32;

fn new_blake2b() -> blake2b_ref::Blake2b {
    blake2b_ref::Blake2bBuilder::new(HASH_SIZE)
        .personal(CKB_HASH_PERSONALIZATION)
        .build()
}

/// CKB blake2b-256 of `data`.
pub fn blake2b_256(data: &[u8]) -> Hash {
    let mut hasher = new_blake2b();
    hasher.update(data);
    let mut output = [0u8; HASH_SIZE];
    hasher.finalize(&mut output);
    output
}

/// [`ContentHasher`] backed by CKB blake2b.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2bHasher;

impl ContentHasher for Blake2bHasher {
    fn hash(&self, data: &[u8]) -> Hash {
        blake2b_256(data)
    }
}

/// Node hasher of the ledger SMT.
pub struct SmtHasher(blake2b_ref::Blake2b);

impl Default for SmtHasher {
    fn default() -> Self {
        Self(new_blake2b())
    }
}

impl Hasher for SmtHasher {
    fn write_h256(&mut self, h: &H256) {
        self.0.update(h.as_slice());
    }

    fn write_byte(&mut self, b: u8) {
        self.0.update(&[b]);
    }

    fn finish(self) -> H256 {
        let mut output = [0u8; HASH_SIZE];
        self.0.finalize(&mut output);
        output.into()
    }
}

type LedgerTree = SparseMerkleTree<SmtHasher, H256, DefaultStore<H256>>;

/// Leaf map of a ledger, keyed by hashed ledger key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryLedger {
    leaves: BTreeMap<Hash, Hash>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger of a freshly created book: both totals written as zero.
    ///
    /// Its root is [`crate::config::EMPTY_LEDGER_ROOT`].
    #[must_use]
    pub fn genesis() -> Self {
        let mut ledger = Self::new();
        ledger.set(LedgerKey::TotalIncome, LedgerValue::Amount(0));
        ledger.set(LedgerKey::AccountBalance, LedgerValue::Amount(0));
        ledger
    }

    /// Write one entry. Writing [`LedgerValue::Absent`] deletes it.
    pub fn set(&mut self, key: LedgerKey, value: LedgerValue) {
        let key = key.hashed(&Blake2bHasher);
        match value.hashed(&Blake2bHasher) {
            ZERO_HASH => {
                self.leaves.remove(&key);
            }
            hashed => {
                self.leaves.insert(key, hashed);
            }
        }
    }

    /// Write all three entries of a snapshot.
    pub fn apply(&mut self, snapshot: &LedgerSnapshot) {
        self.set(
            LedgerKey::TotalIncome,
            LedgerValue::Amount(snapshot.total_income),
        );
        self.set(
            LedgerKey::AccountBalance,
            LedgerValue::Amount(snapshot.account_balance),
        );
        self.set(snapshot.key, snapshot.value);
    }

    /// Number of stored (non-zero) leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    fn tree(&self) -> Result<LedgerTree, sparse_merkle_tree::error::Error> {
        let mut tree = LedgerTree::default();
        for (key, value) in &self.leaves {
            tree.update((*key).into(), (*value).into())?;
        }
        Ok(tree)
    }

    /// Current root (zero word when empty).
    pub fn root(&self) -> Hash {
        match self.tree() {
            Ok(tree) => (*tree.root()).into(),
            Err(e) => {
                error!(error = %e, "ledger tree rebuild failed");
                ZERO_HASH
            }
        }
    }

    /// Compiled proof opening `keys`. Empty if no proof can be built, which
    /// never verifies.
    pub fn prove(&self, keys: &[LedgerKey]) -> Vec<u8> {
        let keys: Vec<H256> = keys
            .iter()
            .map(|k| k.hashed(&Blake2bHasher))
            .collect::<BTreeSet<Hash>>()
            .into_iter()
            .map(H256::from)
            .collect();

        let compiled = self
            .tree()
            .and_then(|tree| tree.merkle_proof(keys.clone()))
            .and_then(|proof| proof.compile(keys));
        match compiled {
            Ok(proof) => proof.0,
            Err(e) => {
                error!(error = %e, "ledger proof generation failed");
                Vec::new()
            }
        }
    }

    /// Proof opening the keys of `snapshot`.
    pub fn prove_snapshot(&self, snapshot: &LedgerSnapshot) -> Vec<u8> {
        self.prove(&[
            LedgerKey::TotalIncome,
            LedgerKey::AccountBalance,
            snapshot.key,
        ])
    }

    /// Check `proof` opens `asserted` under `root`.
    pub fn verify(root: &Hash, proof: &[u8], asserted: &[(Hash, Hash)]) -> bool {
        let mut seen = BTreeSet::new();
        if !asserted.iter().all(|(key, _)| seen.insert(*key)) {
            return false;
        }

        let leaves: Vec<(H256, H256)> = asserted
            .iter()
            .map(|(key, value)| ((*key).into(), (*value).into()))
            .collect();
        CompiledMerkleProof(proof.to_vec())
            .verify::<SmtHasher>(&(*root).into(), leaves)
            .unwrap_or(false)
    }
}
