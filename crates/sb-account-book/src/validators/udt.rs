//! # UDT Conservation Checker
//!
//! Two properties of the settlement token (xUDT) in one scan per side:
//!
//! 1. **Conservation**: the token total over inputs equals the total over
//!    outputs. Other scripts mint and burn; this book never does.
//! 2. **Book balance**: exactly one token cell per side is locked by the
//!    proxy lock bound to this book (`lock.args == script_hash`). Its input
//!    must come from the same transaction as the book cell itself, which
//!    ties the pair together.

use super::{find_first, load_data, BookContext};
use crate::config::ScriptConfig;
use crate::errors::AccountBookError;
use crate::ports::{CellMeta, Cells, Source, TransactionView};
use sb_types::{AccountBookCellInfo, Hash};
use tracing::{debug, warn};

/// Size of the little-endian amount prefix of token cell data.
pub const UDT_AMOUNT_SIZE: usize = 16;

/// Balances of the book's proxy-locked token cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookBalances {
    /// Before the transaction.
    pub input: u128,
    /// After the transaction.
    pub output: u128,
}

/// Token amount stored in a cell's data.
pub fn udt_amount(data: &[u8]) -> Result<u128, AccountBookError> {
    let prefix: [u8; UDT_AMOUNT_SIZE] = data
        .get(..UDT_AMOUNT_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| {
            AccountBookError::conservation(format!(
                "token data is {} bytes, needs {UDT_AMOUNT_SIZE}",
                data.len()
            ))
        })?;
    Ok(u128::from_le_bytes(prefix))
}

/// Whether `cell` is locked by the proxy lock bound to this book.
pub fn is_book_proxy(cell: &CellMeta, info: &AccountBookCellInfo, script_hash: &Hash) -> bool {
    cell.lock.code_hash == info.input_type_proxy_lock_code_hash
        && cell.lock.args.as_slice() == script_hash.as_slice()
}

/// Whether `cell` carries the book's settlement token.
pub fn is_udt(cell: &CellMeta, info: &AccountBookCellInfo) -> bool {
    cell.type_hash == Some(info.xudt_script_hash)
}

#[derive(Debug, Default)]
struct SideTotals {
    total: u128,
    proxy: Option<(usize, u128)>,
}

fn scan_side<V: TransactionView + ?Sized>(
    view: &V,
    source: Source,
    limit: usize,
    info: &AccountBookCellInfo,
    script_hash: &Hash,
) -> Result<SideTotals, AccountBookError> {
    let mut side = SideTotals::default();
    for cell in Cells::new(view, source, limit) {
        let (index, meta) = cell?;
        if !is_udt(&meta, info) {
            continue;
        }
        let amount = udt_amount(&load_data(view, index, source)?)?;
        side.total = side
            .total
            .checked_add(amount)
            .ok_or_else(|| AccountBookError::arithmetic(format!("token sum overflows in {source:?}")))?;

        if is_book_proxy(&meta, info, script_hash) {
            if side.proxy.is_some() {
                warn!(?source, index, "second proxy-locked token cell");
                return Err(AccountBookError::conservation(format!(
                    "more than one book token cell in {source:?}"
                )));
            }
            side.proxy = Some((index, amount));
        }
    }
    Ok(side)
}

/// Check conservation and return the book's balance pair.
pub fn check_udt<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
    ctx: &BookContext,
) -> Result<BookBalances, AccountBookError> {
    let info = &ctx.new.info;
    let inputs = scan_side(view, Source::Input, config.max_cells, info, &ctx.script_hash)?;
    let outputs = scan_side(view, Source::Output, config.max_cells, info, &ctx.script_hash)?;

    if inputs.total != outputs.total {
        warn!(
            input_total = %inputs.total,
            output_total = %outputs.total,
            "token totals differ"
        );
        return Err(AccountBookError::conservation(format!(
            "token inputs {} != outputs {}",
            inputs.total, outputs.total
        )));
    }

    let (Some((proxy_index, input)), Some((_, output))) = (inputs.proxy, outputs.proxy) else {
        warn!("book token cell missing on one side");
        return Err(AccountBookError::conservation(
            "book token cell missing in inputs or outputs",
        ));
    };

    let proxy_tx = view
        .cell_input(proxy_index, Source::Input)?
        .map(|input| input.previous_output.tx_hash);
    let book_tx = view
        .cell_input(0, Source::GroupInput)?
        .map(|input| input.previous_output.tx_hash);
    if proxy_tx.is_none() || proxy_tx != book_tx {
        warn!(proxy_index, "book token cell not created with the book");
        return Err(AccountBookError::conservation(
            "book token cell does not share the book's origin transaction",
        ));
    }

    debug!(input = %input, output = %output, "book balances");
    Ok(BookBalances { input, output })
}

/// Amount of the first token output locked by `lock_hash`, never counting
/// the book's own token cell.
pub fn payout_to<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
    info: &AccountBookCellInfo,
    script_hash: &Hash,
    lock_hash: &Hash,
) -> Result<u128, AccountBookError> {
    let found = find_first(view, Source::Output, config.max_cells, |cell| {
        is_udt(cell, info)
            && cell.lock_hash == *lock_hash
            && !is_book_proxy(cell, info, script_hash)
    })?;
    let Some((index, _)) = found else {
        return Err(AccountBookError::conservation("payout cell not found"));
    };
    udt_amount(&load_data(view, index, Source::Output)?)
}
