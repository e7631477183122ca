//! # Withdrawal Validator
//!
//! A claimant raises its cumulative withdrawal to its full entitlement
//! `floor(total_income * ratio / (100 * divisor))` and the book pays out
//! exactly the difference. The previous cumulative amount is whatever the
//! ledger proves under the old root; the witness only proposes it. A key
//! never written before counts as zero.

use super::proof::verify_snapshot;
use super::udt::{check_udt, payout_to};
use super::{find_first, load_input_type_record, BookContext};
use crate::config::ScriptConfig;
use crate::domain::{
    check_buyer_count, entitlement, share_of, Claimant, LedgerKey, LedgerSnapshot, LedgerValue,
    Stakeholder, Transition,
};
use crate::errors::AccountBookError;
use crate::ports::{Host, Source, TransactionView};
use sb_types::{to_hex, AccountBookCellData, AccountBookCellInfo, WithdrawalBuyer, WithdrawalIntentData};
use tracing::{debug, warn};

/// Validate a withdrawal transaction.
pub fn validate_withdrawal<H: Host + ?Sized>(
    host: &H,
    config: &ScriptConfig,
    ctx: &BookContext,
    old: &AccountBookCellData,
) -> Result<(), AccountBookError> {
    let info = &ctx.new.info;
    let intent = load_intent(host, config, info)?;
    let claimant = resolve_claimant(host, config, info, &intent)?;

    let total_income = ctx.witness.total_income_udt;
    let share = share_of(&claimant, &ctx.new)?;
    let entitled = entitlement(total_income, share)?;

    let balances = check_udt(host, config, ctx)?;
    let payout = payout_to(
        host,
        config,
        info,
        &ctx.script_hash,
        &intent.xudt_lock_script_hash,
    )?;
    let after_payout = balances
        .output
        .checked_add(payout)
        .ok_or_else(|| AccountBookError::arithmetic("book balance + payout overflows"))?;
    if after_payout != balances.input {
        warn!(
            old_balance = %balances.input,
            new_balance = %balances.output,
            payout = %payout,
            "book balance change differs from payout"
        );
        return Err(AccountBookError::conservation(format!(
            "book balance {} != {} + payout {payout}",
            balances.input, balances.output
        )));
    }

    // The candidate becomes authoritative only once the old root opens it.
    let key = LedgerKey::for_claimant(&claimant);
    let old_value = LedgerValue::from_option(ctx.witness.withdrawn_udt);
    verify_snapshot(
        host,
        &old.smt_root_hash,
        &ctx.witness.proof,
        &LedgerSnapshot::new(total_income, balances.input, key, old_value),
        "withdrawal input",
    )?;
    let old_withdrawn = old_value.amount();
    let owed = entitled.checked_sub(old_withdrawn).ok_or_else(|| {
        AccountBookError::conservation(format!(
            "already withdrew {old_withdrawn}, entitled to {entitled}"
        ))
    })?;
    if payout != owed {
        warn!(
            payout = %payout,
            entitled = %entitled,
            old_withdrawn = %old_withdrawn,
            "payout differs from amount owed"
        );
        return Err(AccountBookError::conservation(format!(
            "payout {payout} != owed {owed}"
        )));
    }

    verify_snapshot(
        host,
        &ctx.new.smt_root_hash,
        &ctx.witness.proof,
        &LedgerSnapshot::new(
            total_income,
            balances.output,
            key,
            LedgerValue::Amount(entitled),
        ),
        "withdrawal output",
    )?;

    check_buyer_count(Transition::Withdrawal, old.buyer_count, ctx.new.buyer_count)?;

    debug!(?claimant, payout = %payout, withdrawn = %entitled, "withdrawal recorded");
    Ok(())
}

/// The intent record of the first withdrawal-intent input.
fn load_intent<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
    info: &AccountBookCellInfo,
) -> Result<WithdrawalIntentData, AccountBookError> {
    let code_hash = info.withdrawal_intent_code_hash;
    let (index, _) = find_first(view, Source::Input, config.max_cells, |cell| {
        cell.type_code_hash() == Some(code_hash)
    })?
    .ok_or_else(|| AccountBookError::eligibility("withdrawal intent not found"))?;

    let intent: WithdrawalIntentData = load_input_type_record(view, index)?;
    if intent.xudt_script_hash != info.xudt_script_hash {
        warn!(
            xudt = %to_hex(&intent.xudt_script_hash),
            "intent asks for another token"
        );
        return Err(AccountBookError::eligibility(
            "intent token differs from book token",
        ));
    }
    Ok(intent)
}

/// Map the intent's buyer descriptor to a claimant.
pub fn resolve_claimant<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
    info: &AccountBookCellInfo,
    intent: &WithdrawalIntentData,
) -> Result<Claimant, AccountBookError> {
    match &intent.buyer {
        WithdrawalBuyer::Stakeholder(id) => {
            let stakeholder = if *id == info.platform_id {
                Stakeholder::Platform
            } else if *id == info.author_id {
                Stakeholder::Author
            } else {
                warn!(id = %to_hex(id), "claimant is neither platform nor author");
                return Err(AccountBookError::eligibility("unknown stakeholder"));
            };

            let signed = find_first(view, Source::Input, config.max_cells, |cell| {
                cell.lock_hash == *id
            })?;
            if signed.is_none() {
                warn!(?stakeholder, "stakeholder lock absent from inputs");
                return Err(AccountBookError::eligibility(
                    "stakeholder did not sign the withdrawal",
                ));
            }
            Ok(Claimant::Stakeholder(stakeholder))
        }
        WithdrawalBuyer::Spore(spore) => {
            if spore.cluster_id != info.cluster_id {
                warn!(cluster = %to_hex(&spore.cluster_id), "claim for another cluster");
                return Err(AccountBookError::eligibility(
                    "spore cluster differs from book",
                ));
            }
            Ok(Claimant::Buyer {
                spore_level: spore.spore_level,
                spore_id: spore.spore_id,
            })
        }
    }
}
