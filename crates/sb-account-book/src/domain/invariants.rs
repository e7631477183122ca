//! # Domain Invariants
//!
//! Checks that hold across every update of an account book:
//! - INVARIANT-1: configuration (`info`, distribution tables) never changes
//! - INVARIANT-2: `buyer_count` grows by exactly one per sale, never otherwise

use crate::domain::entities::Transition;
use crate::errors::AccountBookError;
use sb_types::{AccountBookCellData, AccountBookCellInfo};

/// INVARIANT-1: Immutable configuration.
///
/// Reports the first differing field by name.
pub fn check_immutable(
    old: &AccountBookCellData,
    new: &AccountBookCellData,
) -> Result<(), AccountBookError> {
    if let Some(field) = changed_info_field(&old.info, &new.info) {
        return Err(AccountBookError::ImmutableField { field });
    }
    if old.profit_distribution_number != new.profit_distribution_number {
        return Err(AccountBookError::ImmutableField {
            field: "profit_distribution_number",
        });
    }
    if old.profit_distribution_ratio != new.profit_distribution_ratio {
        return Err(AccountBookError::ImmutableField {
            field: "profit_distribution_ratio",
        });
    }
    Ok(())
}

fn changed_info_field(old: &AccountBookCellInfo, new: &AccountBookCellInfo) -> Option<&'static str> {
    let fields: [(&'static str, bool); 9] = [
        ("level", old.level == new.level),
        ("price", old.price == new.price),
        ("cluster_id", old.cluster_id == new.cluster_id),
        ("author_id", old.author_id == new.author_id),
        ("platform_id", old.platform_id == new.platform_id),
        ("xudt_script_hash", old.xudt_script_hash == new.xudt_script_hash),
        (
            "input_type_proxy_lock_code_hash",
            old.input_type_proxy_lock_code_hash == new.input_type_proxy_lock_code_hash,
        ),
        (
            "dob_selling_code_hash",
            old.dob_selling_code_hash == new.dob_selling_code_hash,
        ),
        (
            "withdrawal_intent_code_hash",
            old.withdrawal_intent_code_hash == new.withdrawal_intent_code_hash,
        ),
    ];
    fields
        .into_iter()
        .find_map(|(name, same)| (!same).then_some(name))
}

/// INVARIANT-2: Counter transition.
pub fn check_buyer_count(
    transition: Transition,
    old: u32,
    new: u32,
) -> Result<(), AccountBookError> {
    let expected = match transition {
        Transition::Creation => 0,
        Transition::Selling => old
            .checked_add(1)
            .ok_or_else(|| AccountBookError::arithmetic("buyer count overflows"))?,
        Transition::Withdrawal => old,
    };
    if new != expected {
        return Err(AccountBookError::BuyerCount {
            expected,
            found: new,
        });
    }
    Ok(())
}
