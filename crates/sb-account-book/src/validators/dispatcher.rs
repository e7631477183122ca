//! # Lifecycle Dispatcher
//!
//! Decides which transition a transaction performs:
//!
//! - no group input, one group output: **Creation**
//! - one group input, one group output: **Update**, refined by the marker
//!   cells among the inputs (sale listing first, then withdrawal intent)
//!
//! Anything else is a shape violation, including consuming the book without
//! a successor.

use super::{find_first, load_record, load_witness_args, BookContext};
use crate::config::ScriptConfig;
use crate::domain::Transition;
use crate::errors::AccountBookError;
use crate::ports::{count_up_to_two, Source, TransactionView};
use sb_types::{AccountBookCellData, AccountBookCellInfo, AccountBookData, Record};
use tracing::{debug, warn};

/// Classify the transaction and load the book state.
pub fn dispatch<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
) -> Result<(Transition, BookContext), AccountBookError> {
    let inputs = count_up_to_two(view, Source::GroupInput)?;
    let outputs = count_up_to_two(view, Source::GroupOutput)?;
    debug!(inputs, outputs, "account book group shape");

    let is_creation = match (inputs, outputs) {
        (0, 1) => true,
        (1, 1) => false,
        (_, 0) => {
            warn!(inputs, "account book consumed without successor");
            return Err(AccountBookError::shape("account book has no successor"));
        }
        _ => {
            warn!(inputs, outputs, "multiple account book cells");
            return Err(AccountBookError::shape(
                "more than one account book cell per side",
            ));
        }
    };

    let context = BookContext {
        script_hash: view.current_script_hash()?,
        witness: load_book_witness(view)?,
        new: load_record::<AccountBookCellData, _>(view, 0, Source::GroupOutput)?,
        old: if is_creation {
            None
        } else {
            Some(load_record::<AccountBookCellData, _>(
                view,
                0,
                Source::GroupInput,
            )?)
        },
    };

    let transition = match &context.old {
        None => Transition::Creation,
        Some(old) => classify_update(view, config, &old.info)?,
    };
    debug!(transition = transition.as_str(), "transition selected");
    Ok((transition, context))
}

/// Selling if a listing cell is present among the inputs, else Withdrawal if
/// a withdrawal intent is.
pub fn classify_update<V: TransactionView + ?Sized>(
    view: &V,
    config: &ScriptConfig,
    info: &AccountBookCellInfo,
) -> Result<Transition, AccountBookError> {
    let selling = find_first(view, Source::Input, config.max_cells, |cell| {
        cell.type_code_hash() == Some(info.dob_selling_code_hash)
    })?;
    if selling.is_some() {
        return Ok(Transition::Selling);
    }

    let withdrawal = find_first(view, Source::Input, config.max_cells, |cell| {
        cell.type_code_hash() == Some(info.withdrawal_intent_code_hash)
    })?;
    if withdrawal.is_some() {
        return Ok(Transition::Withdrawal);
    }

    warn!("no listing or withdrawal intent among inputs");
    Err(AccountBookError::eligibility(
        "update without listing or withdrawal intent",
    ))
}

/// The `output_type` payload of group output 0's witness.
pub fn load_book_witness<V: TransactionView + ?Sized>(
    view: &V,
) -> Result<AccountBookData, AccountBookError> {
    let payload = load_witness_args(view, 0, Source::GroupOutput)?
        .output_type
        .ok_or(AccountBookError::MissingWitness {
            slot: "output_type",
        })?;
    Ok(AccountBookData::decode(&payload)?)
}
