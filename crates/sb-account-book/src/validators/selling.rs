//! # Selling Validator
//!
//! A sale moves `price` tokens into the book, bumps `TotalIncome` by the same
//! amount and marks the sold spore's ledger entry as present. The entry must
//! be absent beforehand, so the same spore can never be sold through the
//! book twice.

use super::proof::verify_snapshot;
use super::udt::check_udt;
use super::{find_first, load_data, load_input_type_record, BookContext};
use crate::config::ScriptConfig;
use crate::domain::{
    check_buyer_count, tier_from_content, LedgerKey, LedgerSnapshot, LedgerValue, Transition,
};
use crate::errors::AccountBookError;
use crate::ports::{Cells, Host, Source};
use sb_types::{to_hex, AccountBookCellData, DobSellingData, Hash, Record, Script, SporeData};
use tracing::{debug, warn};

/// The spore changing hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoldSpore {
    /// Type id of the spore.
    pub spore_id: Hash,
    /// Decoded spore data.
    pub data: SporeData,
}

/// Validate a selling transaction.
pub fn validate_selling<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    ctx: &BookContext,
    old: &AccountBookCellData,
) -> Result<(), AccountBookError> {
    let info = &ctx.new.info;

    let listing = load_listing(host, config, ctx)?;
    let spore = find_sold_spore(host, config, &listing)?;
    check_spore_eligibility(&spore, ctx)?;

    let balances = check_udt(host, config, ctx)?;
    let expected = balances
        .input
        .checked_add(info.price)
        .ok_or_else(|| AccountBookError::arithmetic("book balance + price overflows"))?;
    if expected != balances.output {
        warn!(
            old_balance = %balances.input,
            new_balance = %balances.output,
            price = %info.price,
            "sale does not pay the price into the book"
        );
        return Err(AccountBookError::conservation(format!(
            "book balance {} + price {} != {}",
            balances.input, info.price, balances.output
        )));
    }

    let old_income = ctx.witness.total_income_udt;
    let new_income = old_income
        .checked_add(info.price)
        .ok_or_else(|| AccountBookError::arithmetic("total income overflows"))?;

    let key = LedgerKey::Buyer(spore.spore_id);
    verify_snapshot(
        host,
        &old.smt_root_hash,
        &ctx.witness.proof,
        &LedgerSnapshot::new(old_income, balances.input, key, LedgerValue::Absent),
        "selling input",
    )?;
    verify_snapshot(
        host,
        &ctx.new.smt_root_hash,
        &ctx.witness.proof,
        &LedgerSnapshot::new(new_income, balances.output, key, LedgerValue::Amount(0)),
        "selling output",
    )?;

    check_buyer_count(Transition::Selling, old.buyer_count, ctx.new.buyer_count)?;

    debug!(
        spore_id = %to_hex(&spore.spore_id),
        total_income = %new_income,
        buyer_count = ctx.new.buyer_count,
        "sale recorded"
    );
    Ok(())
}

/// The listing record of the first sale-listing input.
fn load_listing<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    ctx: &BookContext,
) -> Result<DobSellingData, AccountBookError> {
    let code_hash = ctx.new.info.dob_selling_code_hash;
    let (index, _) = find_first(host, Source::Input, config.max_cells, |cell| {
        cell.type_code_hash() == Some(code_hash)
    })?
    .ok_or_else(|| AccountBookError::eligibility("sale listing not found"))?;

    let listing: DobSellingData = load_input_type_record(host, index)?;
    if listing.account_book_script_hash != ctx.script_hash {
        warn!(
            listed = %to_hex(&listing.account_book_script_hash),
            "listing pays a different account book"
        );
        return Err(AccountBookError::eligibility(
            "listing names another account book",
        ));
    }
    Ok(listing)
}

/// First output carrying the listed spore code whose data hash matches.
pub fn find_sold_spore<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    listing: &DobSellingData,
) -> Result<SoldSpore, AccountBookError> {
    for cell in Cells::new(host, Source::Output, config.max_cells) {
        let (index, meta) = cell?;
        if meta.type_code_hash() != Some(listing.spore_code_hash) {
            continue;
        }
        let data = load_data(host, index, Source::Output)?;
        if host.hash(&data) != listing.spore_data_hash {
            continue;
        }

        let spore_id = meta
            .type_script
            .as_ref()
            .and_then(Script::args_as_hash)
            .ok_or_else(|| AccountBookError::eligibility("spore args are not a 32-byte id"))?;
        return Ok(SoldSpore {
            spore_id,
            data: SporeData::decode(&data)?,
        });
    }

    warn!(
        code_hash = %to_hex(&listing.spore_code_hash),
        "sold spore not found in outputs"
    );
    Err(AccountBookError::eligibility("sold spore not found in outputs"))
}

/// Cluster and tier of the sold spore match the book.
fn check_spore_eligibility(spore: &SoldSpore, ctx: &BookContext) -> Result<(), AccountBookError> {
    let info = &ctx.new.info;
    let cluster = spore
        .data
        .cluster_id
        .as_deref()
        .ok_or_else(|| AccountBookError::eligibility("spore has no cluster"))?;
    if cluster != info.cluster_id.as_slice() {
        warn!(cluster = %hex::encode(cluster), "spore belongs to another cluster");
        return Err(AccountBookError::eligibility("spore cluster differs from book"));
    }

    let tier = tier_from_content(&spore.data.content)?;
    if tier != info.level {
        warn!(tier, level = info.level, "spore tier differs from book level");
        return Err(AccountBookError::eligibility(format!(
            "spore tier {tier} != book level {}",
            info.level
        )));
    }
    Ok(())
}
