//! # Account Book Records
//!
//! Schemas persisted in cells or supplied in witnesses.
//!
//! ## Persisted
//!
//! - [`AccountBookCellInfo`]: configuration, fixed at creation
//! - [`AccountBookCellData`]: info + distribution tables + counters + SMT root
//!
//! ## Witness
//!
//! - [`AccountBookData`]: ledger proof and income figures for one transaction
//! - [`WithdrawalIntentData`]: claimant descriptor of a withdrawal request
//! - [`DobSellingData`]: listing descriptor of a spore sale
//!
//! ## Collectible
//!
//! - [`SporeData`]: content and cluster of a spore cell

use crate::codec::{
    read_array, read_bytes, read_option, read_u128, read_u32, read_u64, read_u8, read_union,
    write_bytes, write_table, write_union, Record, TableReader,
};
use crate::entities::Hash;
use crate::errors::CodecError;
use serde::{Deserialize, Serialize};

// =============================================================================
// ACCOUNT BOOK CELL
// =============================================================================

/// Immutable configuration of an account book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountBookCellInfo {
    /// Number of buyer tiers that share proceeds.
    pub level: u8,
    /// Token units paid per sale.
    pub price: u128,
    /// Collection the sold spores must belong to.
    pub cluster_id: Hash,
    /// Lock hash of the author.
    pub author_id: Hash,
    /// Lock hash of the platform.
    pub platform_id: Hash,
    /// Type script hash of the settlement token.
    pub xudt_script_hash: Hash,
    /// Code hash of the proxy lock guarding the book's token cell.
    pub input_type_proxy_lock_code_hash: Hash,
    /// Code hash of the sale listing script.
    pub dob_selling_code_hash: Hash,
    /// Code hash of the withdrawal request script.
    pub withdrawal_intent_code_hash: Hash,
}

impl Record for AccountBookCellInfo {
    const NAME: &'static str = "AccountBookCellInfo";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            vec![self.level],
            self.price.to_le_bytes().to_vec(),
            self.cluster_id.to_vec(),
            self.author_id.to_vec(),
            self.platform_id.to_vec(),
            self.xudt_script_hash.to_vec(),
            self.input_type_proxy_lock_code_hash.to_vec(),
            self.dob_selling_code_hash.to_vec(),
            self.withdrawal_intent_code_hash.to_vec(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 9)?;
        Ok(Self {
            level: read_u8(Self::NAME, t.field(0))?,
            price: read_u128(Self::NAME, t.field(1))?,
            cluster_id: read_array(Self::NAME, t.field(2))?,
            author_id: read_array(Self::NAME, t.field(3))?,
            platform_id: read_array(Self::NAME, t.field(4))?,
            xudt_script_hash: read_array(Self::NAME, t.field(5))?,
            input_type_proxy_lock_code_hash: read_array(Self::NAME, t.field(6))?,
            dob_selling_code_hash: read_array(Self::NAME, t.field(7))?,
            withdrawal_intent_code_hash: read_array(Self::NAME, t.field(8))?,
        })
    }
}

/// Consensus state stored in the account book cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountBookCellData {
    /// Immutable configuration.
    pub info: AccountBookCellInfo,
    /// Pro-rata divisor per tier (`len == level`).
    pub profit_distribution_number: Vec<u8>,
    /// Percentages `[platform, author, tier_0 .. tier_{level-1}]`.
    pub profit_distribution_ratio: Vec<u8>,
    /// Number of completed sales.
    pub buyer_count: u32,
    /// Root of the ledger commitment.
    pub smt_root_hash: Hash,
}

impl Record for AccountBookCellData {
    const NAME: &'static str = "AccountBookCellData";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            self.info.encode(),
            write_bytes(&self.profit_distribution_number),
            write_bytes(&self.profit_distribution_ratio),
            self.buyer_count.to_le_bytes().to_vec(),
            self.smt_root_hash.to_vec(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 5)?;
        Ok(Self {
            info: AccountBookCellInfo::decode(t.field(0))?,
            profit_distribution_number: read_bytes(Self::NAME, t.field(1))?.to_vec(),
            profit_distribution_ratio: read_bytes(Self::NAME, t.field(2))?.to_vec(),
            buyer_count: read_u32(Self::NAME, t.field(3))?,
            smt_root_hash: read_array(Self::NAME, t.field(4))?,
        })
    }
}

// =============================================================================
// ACCOUNT BOOK WITNESS
// =============================================================================

/// Witness supplied with every account book transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountBookData {
    /// Compiled SMT proof covering the touched ledger entries.
    pub proof: Vec<u8>,
    /// Lifetime income before this transaction.
    pub total_income_udt: u128,
    /// Claimed cumulative withdrawal of the claimant, if any.
    pub withdrawn_udt: Option<u128>,
}

impl Record for AccountBookData {
    const NAME: &'static str = "AccountBookData";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            write_bytes(&self.proof),
            self.total_income_udt.to_le_bytes().to_vec(),
            self.withdrawn_udt
                .map(|v| v.to_le_bytes().to_vec())
                .unwrap_or_default(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 3)?;
        Ok(Self {
            proof: read_bytes(Self::NAME, t.field(0))?.to_vec(),
            total_income_udt: read_u128(Self::NAME, t.field(1))?,
            withdrawn_udt: read_option(t.field(2))
                .map(|v| read_u128(Self::NAME, v))
                .transpose()?,
        })
    }
}

// =============================================================================
// WITHDRAWAL INTENT
// =============================================================================

/// Spore-holder descriptor inside a withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WithdrawalSporeInfo {
    /// Code hash of the spore type script.
    pub spore_code_hash: Hash,
    /// Tier of the held spore.
    pub spore_level: u8,
    /// Type id of the held spore.
    pub spore_id: Hash,
    /// Cluster of the held spore.
    pub cluster_id: Hash,
}

impl Record for WithdrawalSporeInfo {
    const NAME: &'static str = "WithdrawalSporeInfo";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            self.spore_code_hash.to_vec(),
            vec![self.spore_level],
            self.spore_id.to_vec(),
            self.cluster_id.to_vec(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 4)?;
        Ok(Self {
            spore_code_hash: read_array(Self::NAME, t.field(0))?,
            spore_level: read_u8(Self::NAME, t.field(1))?,
            spore_id: read_array(Self::NAME, t.field(2))?,
            cluster_id: read_array(Self::NAME, t.field(3))?,
        })
    }
}

/// Who is asking to be paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalBuyer {
    /// A spore holder claiming its tier share.
    Spore(WithdrawalSporeInfo),
    /// A fixed stakeholder identified by lock hash.
    Stakeholder(Hash),
}

impl WithdrawalBuyer {
    const SPORE_ID: u32 = 0;
    const STAKEHOLDER_ID: u32 = 1;
}

impl Default for WithdrawalBuyer {
    fn default() -> Self {
        Self::Stakeholder(Hash::default())
    }
}

impl Record for WithdrawalBuyer {
    const NAME: &'static str = "WithdrawalBuyer";

    fn encode(&self) -> Vec<u8> {
        match self {
            Self::Spore(info) => write_union(Self::SPORE_ID, &info.encode()),
            Self::Stakeholder(id) => write_union(Self::STAKEHOLDER_ID, id),
        }
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let (id, item) = read_union(Self::NAME, data)?;
        match id {
            Self::SPORE_ID => Ok(Self::Spore(WithdrawalSporeInfo::decode(item)?)),
            Self::STAKEHOLDER_ID => Ok(Self::Stakeholder(read_array(Self::NAME, item)?)),
            other => Err(CodecError::UnknownUnionItem {
                record: Self::NAME,
                id: other,
            }),
        }
    }
}

/// Witness of a withdrawal-intent cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WithdrawalIntentData {
    /// Claimant descriptor.
    pub buyer: WithdrawalBuyer,
    /// Token being withdrawn.
    pub xudt_script_hash: Hash,
    /// Lock hash that must receive the payout.
    pub xudt_lock_script_hash: Hash,
    /// Creator of the intent (refund target on revocation).
    pub owner_script_hash: Hash,
    /// `since` after which the intent may be revoked.
    pub expire_since: u64,
}

impl Record for WithdrawalIntentData {
    const NAME: &'static str = "WithdrawalIntentData";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            self.buyer.encode(),
            self.xudt_script_hash.to_vec(),
            self.xudt_lock_script_hash.to_vec(),
            self.owner_script_hash.to_vec(),
            self.expire_since.to_le_bytes().to_vec(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 5)?;
        Ok(Self {
            buyer: WithdrawalBuyer::decode(t.field(0))?,
            xudt_script_hash: read_array(Self::NAME, t.field(1))?,
            xudt_lock_script_hash: read_array(Self::NAME, t.field(2))?,
            owner_script_hash: read_array(Self::NAME, t.field(3))?,
            expire_since: read_u64(Self::NAME, t.field(4))?,
        })
    }
}

// =============================================================================
// DOB SELLING
// =============================================================================

/// Witness of a sale listing cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DobSellingData {
    /// Code hash of the spore type script being sold.
    pub spore_code_hash: Hash,
    /// Hash of the sold spore's cell data.
    pub spore_data_hash: Hash,
    /// Code hash of the buyer's intent script.
    pub buy_intent_code_hash: Hash,
    /// Seller lock hash.
    pub owner_script_hash: Hash,
    /// Type hash of the account book receiving the proceeds.
    pub account_book_script_hash: Hash,
}

impl Record for DobSellingData {
    const NAME: &'static str = "DobSellingData";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            self.spore_code_hash.to_vec(),
            self.spore_data_hash.to_vec(),
            self.buy_intent_code_hash.to_vec(),
            self.owner_script_hash.to_vec(),
            self.account_book_script_hash.to_vec(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 5)?;
        Ok(Self {
            spore_code_hash: read_array(Self::NAME, t.field(0))?,
            spore_data_hash: read_array(Self::NAME, t.field(1))?,
            buy_intent_code_hash: read_array(Self::NAME, t.field(2))?,
            owner_script_hash: read_array(Self::NAME, t.field(3))?,
            account_book_script_hash: read_array(Self::NAME, t.field(4))?,
        })
    }
}

// =============================================================================
// SPORE
// =============================================================================

/// Data of a spore (collectible) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SporeData {
    /// MIME type of `content`.
    pub content_type: Vec<u8>,
    /// Collectible payload.
    pub content: Vec<u8>,
    /// Cluster the spore belongs to.
    pub cluster_id: Option<Vec<u8>>,
}

impl Record for SporeData {
    const NAME: &'static str = "SporeData";

    fn encode(&self) -> Vec<u8> {
        write_table(&[
            write_bytes(&self.content_type),
            write_bytes(&self.content),
            self.cluster_id
                .as_deref()
                .map(write_bytes)
                .unwrap_or_default(),
        ])
    }

    fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let t = TableReader::parse(Self::NAME, data, 3)?;
        Ok(Self {
            content_type: read_bytes(Self::NAME, t.field(0))?.to_vec(),
            content: read_bytes(Self::NAME, t.field(1))?.to_vec(),
            cluster_id: read_option(t.field(2))
                .map(|v| read_bytes(Self::NAME, v).map(<[u8]>::to_vec))
                .transpose()?,
        })
    }
}
