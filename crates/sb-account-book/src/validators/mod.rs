//! # Validators
//!
//! One module per lifecycle step, plus the shared checks they compose:
//!
//! | Module | Role |
//! |--------|------|
//! | `dispatcher` | Classify the transaction and load the book state |
//! | `creation` | Wiring and zero state of a new book |
//! | `udt` | Token conservation and the proxy-locked balance pair |
//! | `proof` | Ledger snapshots against an SMT root |
//! | `selling` | A sale adds `price` and marks the buyer |
//! | `withdrawal` | A claimant takes its entitlement |

pub mod creation;
pub mod dispatcher;
pub mod proof;
pub mod selling;
pub mod udt;
pub mod withdrawal;

use crate::errors::{AccountBookError, HostError};
use crate::ports::{CellMeta, Cells, Source, TransactionView};
use sb_types::{AccountBookCellData, AccountBookData, Hash, Record, WitnessArgs};

/// Everything loaded once per execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookContext {
    /// Hash of the account book type script.
    pub script_hash: Hash,
    /// Witness of group output 0.
    pub witness: AccountBookData,
    /// Successor state (group output 0).
    pub new: AccountBookCellData,
    /// Predecessor state (group input 0); `None` on creation.
    pub old: Option<AccountBookCellData>,
}

/// First cell in `source` matching `pred`.
pub(crate) fn find_first<V, F>(
    view: &V,
    source: Source,
    limit: usize,
    mut pred: F,
) -> Result<Option<(usize, CellMeta)>, AccountBookError>
where
    V: TransactionView + ?Sized,
    F: FnMut(&CellMeta) -> bool,
{
    for cell in Cells::new(view, source, limit) {
        let (index, meta) = cell?;
        if pred(&meta) {
            return Ok(Some((index, meta)));
        }
    }
    Ok(None)
}

/// Data of a cell the caller already knows exists.
pub(crate) fn load_data<V: TransactionView + ?Sized>(
    view: &V,
    index: usize,
    source: Source,
) -> Result<Vec<u8>, AccountBookError> {
    view.cell_data(index, source)?.ok_or_else(|| {
        HostError::Syscall {
            call: "load_cell_data",
            code: 1,
        }
        .into()
    })
}

/// Decode the record stored in a cell.
pub(crate) fn load_record<R: Record, V: TransactionView + ?Sized>(
    view: &V,
    index: usize,
    source: Source,
) -> Result<R, AccountBookError> {
    Ok(R::decode(&load_data(view, index, source)?)?)
}

/// Decode the witness args at `index` in `source`.
pub(crate) fn load_witness_args<V: TransactionView + ?Sized>(
    view: &V,
    index: usize,
    source: Source,
) -> Result<WitnessArgs, AccountBookError> {
    let raw = view
        .witness(index, source)?
        .ok_or(AccountBookError::MissingWitness { slot: "witness" })?;
    Ok(WitnessArgs::decode(&raw)?)
}

/// Decode the record carried in the `input_type` slot of input `index`.
pub(crate) fn load_input_type_record<R: Record, V: TransactionView + ?Sized>(
    view: &V,
    index: usize,
) -> Result<R, AccountBookError> {
    let payload = load_witness_args(view, index, Source::Input)?
        .input_type
        .ok_or(AccountBookError::MissingWitness { slot: "input_type" })?;
    Ok(R::decode(&payload)?)
}
