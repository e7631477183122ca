//! # Creation Validator
//!
//! A new book must be born empty and wired to its own token cell:
//!
//! - output 0 is the book's token cell (proxy lock bound to this script,
//!   settlement token type, zero balance)
//! - the distribution tables are well-formed and `buyer_count` is zero
//! - the SMT root is the canonical empty ledger, proven by opening
//!   `TotalIncome = 0`, `AccountBalance = 0` and an absent author entry
//! - the script args carry the type id derived from the first input

use super::proof::verify_snapshot;
use super::udt::{is_book_proxy, udt_amount};
use super::{find_first, load_data, BookContext};
use crate::config::{ScriptConfig, TypeIdConfig};
use crate::domain::{
    check_buyer_count, check_distribution, LedgerKey, LedgerSnapshot, LedgerValue, Transition,
};
use crate::errors::AccountBookError;
use crate::ports::{Host, Source, TransactionView};
use sb_types::{to_hex, Hash, Record, HASH_SIZE};
use tracing::{debug, warn};

/// Validate a creation transaction.
pub fn validate_creation<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    ctx: &BookContext,
) -> Result<(), AccountBookError> {
    check_bounds(host)?;
    check_token_cell(host, ctx)?;

    check_distribution(&ctx.new)?;
    check_buyer_count(Transition::Creation, 0, ctx.new.buyer_count)?;

    if ctx.new.smt_root_hash != config.empty_ledger_root {
        warn!(root = %to_hex(&ctx.new.smt_root_hash), "new book root is not the empty ledger");
        return Err(AccountBookError::LedgerProof {
            stage: "creation",
            root: to_hex(&ctx.new.smt_root_hash),
        });
    }
    let genesis = LedgerSnapshot::new(0, 0, LedgerKey::Author, LedgerValue::Absent);
    verify_snapshot(
        host,
        &config.empty_ledger_root,
        &ctx.witness.proof,
        &genesis,
        "creation",
    )?;

    if let Some(type_id) = &config.type_id {
        check_type_id(host, config, type_id, &ctx.script_hash)?;
    }

    debug!(level = ctx.new.info.level, price = %ctx.new.info.price, "account book created");
    Ok(())
}

/// Exactly one of `Input[1]` and `Output[1]` exists.
fn check_bounds<V: TransactionView + ?Sized>(view: &V) -> Result<(), AccountBookError> {
    let second_input = view.exists(1, Source::Input)?;
    let second_output = view.exists(1, Source::Output)?;
    if second_input == second_output {
        warn!(second_input, second_output, "creation transaction bounds");
        return Err(AccountBookError::shape(
            "creation needs exactly one of a second input or a second output",
        ));
    }
    Ok(())
}

/// Output 0 is the book's empty token cell.
fn check_token_cell<V: TransactionView + ?Sized>(
    view: &V,
    ctx: &BookContext,
) -> Result<(), AccountBookError> {
    let info = &ctx.new.info;
    let cell = view
        .cell(0, Source::Output)?
        .ok_or_else(|| AccountBookError::shape("no outputs"))?;

    if !is_book_proxy(&cell, info, &ctx.script_hash) {
        warn!(
            code_hash = %to_hex(&cell.lock.code_hash),
            "output 0 is not locked by the book's proxy lock"
        );
        return Err(AccountBookError::shape(
            "output 0 must be locked by the proxy lock bound to this book",
        ));
    }
    if cell.type_hash != Some(info.xudt_script_hash) {
        warn!("output 0 does not carry the settlement token");
        return Err(AccountBookError::shape(
            "output 0 must carry the settlement token",
        ));
    }

    let balance = udt_amount(&load_data(view, 0, Source::Output)?)?;
    if balance != 0 {
        warn!(balance = %balance, "new book token cell is not empty");
        return Err(AccountBookError::conservation(format!(
            "new book token cell holds {balance}"
        )));
    }
    Ok(())
}

/// Type id of a script created in this transaction.
pub fn type_id<H: Host + ?Sized>(
    host: &H,
    first_input: &[u8],
    output_index: u64,
) -> Hash {
    let mut preimage = Vec::with_capacity(first_input.len() + 8);
    preimage.extend_from_slice(first_input);
    preimage.extend_from_slice(&output_index.to_le_bytes());
    host.hash(&preimage)
}

fn check_type_id<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    type_id_config: &TypeIdConfig,
    script_hash: &Hash,
) -> Result<(), AccountBookError> {
    let args = host.current_script()?.args;
    let start = type_id_config.args_offset;
    let Some(expected) = args.get(start..start + HASH_SIZE) else {
        return Err(AccountBookError::shape(format!(
            "script args too short for a type id at offset {start}"
        )));
    };

    let first_input = host
        .cell_input(0, Source::Input)?
        .ok_or_else(|| AccountBookError::shape("creation has no inputs"))?;
    let (output_index, _) = find_first(host, Source::Output, config.max_cells, |cell| {
        cell.type_hash.as_ref() == Some(script_hash)
    })?
    .ok_or_else(|| AccountBookError::shape("book output not found"))?;

    let actual = type_id(host, &first_input.encode(), output_index as u64);
    if expected != actual.as_slice() {
        warn!(
            expected = %hex::encode(expected),
            actual = %to_hex(&actual),
            "type id mismatch"
        );
        return Err(AccountBookError::shape("type id does not match first input"));
    }
    Ok(())
}
