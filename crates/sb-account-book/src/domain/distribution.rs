//! # Profit Distribution
//!
//! `profit_distribution_ratio` holds `level + 2` percentages:
//! `[platform, author, tier_0, .., tier_{level-1}]`, summing to 100.
//! `profit_distribution_number` holds one divisor per tier; a tier's share is
//! split pro-rata among that many buyers.

use crate::domain::entities::{Claimant, Stakeholder};
use crate::errors::AccountBookError;
use sb_types::AccountBookCellData;

/// Percentage points that make up the whole.
pub const RATIO_TOTAL: u128 = 100;

/// A claimant's slice of the income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    /// Percentage of total income.
    pub ratio: u8,
    /// Number of claimants splitting `ratio`.
    pub divisor: u8,
}

/// Check the ratio table length and that it sums to 100.
pub fn check_ratio(level: u8, ratio: &[u8]) -> Result<(), AccountBookError> {
    let expected = usize::from(level) + 2;
    if ratio.len() != expected {
        return Err(AccountBookError::arithmetic(format!(
            "ratio has {} entries, expected {expected}",
            ratio.len()
        )));
    }
    let sum: u32 = ratio.iter().map(|r| u32::from(*r)).sum();
    if u128::from(sum) != RATIO_TOTAL {
        return Err(AccountBookError::arithmetic(format!(
            "ratio sums to {sum}, expected {RATIO_TOTAL}"
        )));
    }
    Ok(())
}

/// Check both distribution tables of a cell.
pub fn check_distribution(data: &AccountBookCellData) -> Result<(), AccountBookError> {
    let level = data.info.level;
    if data.profit_distribution_number.len() != usize::from(level) {
        return Err(AccountBookError::arithmetic(format!(
            "distribution number has {} entries, expected {level}",
            data.profit_distribution_number.len()
        )));
    }
    check_ratio(level, &data.profit_distribution_ratio)
}

/// Look up `claimant`'s share in the book's tables.
pub fn share_of(claimant: &Claimant, data: &AccountBookCellData) -> Result<Share, AccountBookError> {
    let ratio = &data.profit_distribution_ratio;
    let (ratio_index, divisor) = match claimant {
        Claimant::Stakeholder(Stakeholder::Platform) => (0, Some(1)),
        Claimant::Stakeholder(Stakeholder::Author) => (1, Some(1)),
        Claimant::Buyer { spore_level, .. } => {
            if *spore_level >= data.info.level {
                return Err(AccountBookError::eligibility(format!(
                    "spore level {spore_level} not below book level {}",
                    data.info.level
                )));
            }
            let tier = usize::from(*spore_level);
            (
                tier + 2,
                data.profit_distribution_number.get(tier).copied(),
            )
        }
    };

    let ratio = ratio.get(ratio_index).copied().ok_or_else(|| {
        AccountBookError::arithmetic(format!("no ratio entry at {ratio_index}"))
    })?;
    let divisor = divisor
        .ok_or_else(|| AccountBookError::arithmetic("no distribution number for tier"))?;
    if divisor == 0 {
        return Err(AccountBookError::arithmetic("distribution number is zero"));
    }
    Ok(Share { ratio, divisor })
}

/// `floor(total_income * ratio / (100 * divisor))`.
pub fn entitlement(total_income: u128, share: Share) -> Result<u128, AccountBookError> {
    if share.divisor == 0 {
        return Err(AccountBookError::arithmetic("distribution number is zero"));
    }
    let scaled = total_income
        .checked_mul(u128::from(share.ratio))
        .ok_or_else(|| AccountBookError::arithmetic("income * ratio overflows"))?;
    Ok(scaled / (RATIO_TOTAL * u128::from(share.divisor)))
}
