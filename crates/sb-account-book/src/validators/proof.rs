//! # Ledger Proof Verifier
//!
//! Checks a [`LedgerSnapshot`] against an SMT root. The proof bytes come from
//! the witness and are opaque here; the host does the cryptography.

use crate::domain::LedgerSnapshot;
use crate::errors::AccountBookError;
use crate::ports::Host;
use sb_types::{to_hex, Hash};
use tracing::{debug, warn};

/// Verify `snapshot` under `root`, tagging failures with `stage`.
pub fn verify_snapshot<H: Host + ?Sized>(
    host: &H,
    root: &Hash,
    proof: &[u8],
    snapshot: &LedgerSnapshot,
    stage: &'static str,
) -> Result<(), AccountBookError> {
    let leaves = snapshot.leaves(host);
    if host.verify_proof(root, proof, &leaves)? {
        debug!(stage, root = %to_hex(root), "ledger proof verified");
        return Ok(());
    }

    warn!(
        stage,
        root = %to_hex(root),
        total_income = %snapshot.total_income,
        account_balance = %snapshot.account_balance,
        key = ?snapshot.key,
        value = ?snapshot.value,
        "ledger proof rejected"
    );
    Err(AccountBookError::LedgerProof {
        stage,
        root: to_hex(root),
    })
}
