//! # Test Fixtures
//!
//! A [`BookFixture`] is the chain-side state of one account book (the cell
//! data, the off-chain ledger behind its root and the proxy balance) plus
//! builders for the transactions that move it forward. Each builder returns
//! the transaction together with the fixture as it would look once the
//! transaction is committed, so flows can be chained.

use std::collections::HashMap;

use sb_account_book::adapters::{blake2b_256, InMemoryLedger, InMemoryTransaction, MockCell};
use sb_account_book::config::ScriptConfig;
use sb_account_book::domain::{LedgerKey, LedgerSnapshot, LedgerValue};
use sb_account_book::validators::creation::type_id;
use sb_types::{
    AccountBookCellData, AccountBookCellInfo, AccountBookData, CellInput, DobSellingData, Hash,
    OutPoint, Record, Script, SporeData, WithdrawalBuyer, WithdrawalIntentData,
    WithdrawalSporeInfo, WitnessArgs,
};
use tracing_subscriber::EnvFilter;

// =============================================================================
// DEPLOYMENT CONSTANTS
// =============================================================================

pub const BOOK_CODE: Hash = [0xB0; 32];
pub const PROXY_CODE: Hash = [0xA1; 32];
pub const SELLING_CODE: Hash = [0x5E; 32];
pub const INTENT_CODE: Hash = [0x1E; 32];
pub const SPORE_CODE: Hash = [0x5B; 32];
pub const BUY_INTENT_CODE: Hash = [0xB1; 32];
pub const CLUSTER_ID: Hash = [0xC1; 32];

pub fn xudt() -> Script {
    Script::new([0xC0; 32], 1, vec![0x01; 32])
}

pub fn author_lock() -> Script {
    Script::new([0xA0; 32], 1, vec![0x01])
}

pub fn platform_lock() -> Script {
    Script::new([0xA0; 32], 1, vec![0x02])
}

pub fn buyer_lock() -> Script {
    Script::new([0xA0; 32], 1, vec![0x03])
}

pub fn seller_lock() -> Script {
    Script::new([0xA0; 32], 1, vec![0x04])
}

pub fn hash_of(script: &Script) -> Hash {
    InMemoryTransaction::script_hash(script)
}

/// Route script logs to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Token cell holding `amount`.
pub fn token(lock: Script, amount: u128) -> MockCell {
    MockCell::new(lock)
        .with_type(xudt())
        .with_data(amount.to_le_bytes().to_vec())
}

// =============================================================================
// BOOK FIXTURE
// =============================================================================

/// One account book and everything needed to spend it.
#[derive(Debug, Clone)]
pub struct BookFixture {
    pub script: Script,
    pub config: ScriptConfig,
    pub data: AccountBookCellData,
    pub ledger: InMemoryLedger,
    pub income: u128,
    pub balance: u128,
    /// Present non-total entries, mirroring `ledger`.
    pub withdrawn: HashMap<LedgerKey, u128>,
}

impl BookFixture {
    /// A fresh book, not yet created on chain.
    pub fn new(level: u8, price: u128, number: Vec<u8>, ratio: Vec<u8>) -> Self {
        let host = InMemoryTransaction::new(Script::default());
        // The book is output 1, after its token cell.
        let id = type_id(&host, &Self::creation_input().encode(), 1);
        let script = Script::new(BOOK_CODE, 1, id.to_vec());
        let ledger = InMemoryLedger::genesis();

        let data = AccountBookCellData {
            info: AccountBookCellInfo {
                level,
                price,
                cluster_id: CLUSTER_ID,
                author_id: hash_of(&author_lock()),
                platform_id: hash_of(&platform_lock()),
                xudt_script_hash: hash_of(&xudt()),
                input_type_proxy_lock_code_hash: PROXY_CODE,
                dob_selling_code_hash: SELLING_CODE,
                withdrawal_intent_code_hash: INTENT_CODE,
            },
            profit_distribution_number: number,
            profit_distribution_ratio: ratio,
            buyer_count: 0,
            smt_root_hash: ledger.root(),
        };

        Self {
            script,
            config: ScriptConfig::for_testing(),
            data,
            ledger,
            income: 0,
            balance: 0,
            withdrawn: HashMap::new(),
        }
    }

    /// Level 2, price 100, one holder per tier, ratios 10/20/30/40.
    pub fn standard() -> Self {
        Self::new(2, 100, vec![1, 1], vec![10, 20, 30, 40])
    }

    /// Jump to a book that has already seen activity.
    #[must_use]
    pub fn at_state(mut self, income: u128, balance: u128, buyer_count: u32) -> Self {
        self.income = income;
        self.balance = balance;
        self.data.buyer_count = buyer_count;
        self.ledger.set(LedgerKey::TotalIncome, LedgerValue::Amount(income));
        self.ledger
            .set(LedgerKey::AccountBalance, LedgerValue::Amount(balance));
        self.data.smt_root_hash = self.ledger.root();
        self
    }

    /// Record a cumulative withdrawal (or a sold spore at 0).
    #[must_use]
    pub fn with_entry(mut self, key: LedgerKey, amount: u128) -> Self {
        self.ledger.set(key, LedgerValue::Amount(amount));
        self.withdrawn.insert(key, amount);
        self.data.smt_root_hash = self.ledger.root();
        self
    }

    pub fn script_hash(&self) -> Hash {
        hash_of(&self.script)
    }

    pub fn proxy_lock(&self) -> Script {
        Script::new(PROXY_CODE, 1, self.script_hash().to_vec())
    }

    pub fn book_cell(&self, data: &AccountBookCellData) -> MockCell {
        MockCell::new(Script::default())
            .with_type(self.script.clone())
            .with_data(data.encode())
    }

    fn creation_input() -> CellInput {
        CellInput::new(OutPoint::new(InMemoryTransaction::DEFAULT_PREVIOUS_TX, 0), 0)
    }

    fn entry(&self, key: LedgerKey) -> LedgerValue {
        LedgerValue::from_option(self.withdrawn.get(&key).copied())
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Deploy the book: token cell at output 0, book at output 1.
    pub fn creation_tx(&self) -> InMemoryTransaction {
        let genesis = LedgerSnapshot::new(0, 0, LedgerKey::Author, LedgerValue::Absent);
        let witness = AccountBookData {
            proof: self.ledger.prove_snapshot(&genesis),
            total_income_udt: 0,
            withdrawn_udt: None,
        };

        InMemoryTransaction::new(self.script.clone())
            .with_input(MockCell::new(seller_lock()))
            .with_output(token(self.proxy_lock(), 0))
            .with_output(self.book_cell(&self.data))
            .with_witness(1, &WitnessArgs::with_output_type(witness.encode()))
    }

    // =========================================================================
    // SELLING
    // =========================================================================

    /// Sell a spore through the book.
    pub fn sale(&self, plan: &SaleSpec) -> Step {
        self.sale_with(plan, |_| {})
    }

    /// Sell a spore, letting `tamper` edit the successor cell data last.
    pub fn sale_with(
        &self,
        plan: &SaleSpec,
        tamper: impl FnOnce(&mut AccountBookCellData),
    ) -> Step {
        let key = LedgerKey::Buyer(plan.spore_id);
        let price = self.data.info.price;
        let new_balance = self.balance + plan.paid;
        let new_income = self.income + price;

        let old_snapshot = LedgerSnapshot::new(self.income, self.balance, key, LedgerValue::Absent);
        let proof = self.ledger.prove_snapshot(&old_snapshot);

        let mut next = self.clone();
        next.ledger.apply(&LedgerSnapshot::new(
            new_income,
            new_balance,
            key,
            LedgerValue::Amount(0),
        ));
        next.income = new_income;
        next.balance = new_balance;
        next.withdrawn.insert(key, 0);
        next.data.buyer_count = plan
            .buyer_count
            .unwrap_or(self.data.buyer_count + 1);
        next.data.smt_root_hash = next.ledger.root();
        tamper(&mut next.data);

        let spore = SporeData {
            content_type: b"text/plain".to_vec(),
            content: plan.content.clone(),
            cluster_id: plan.cluster_id.clone(),
        }
        .encode();
        let listing = DobSellingData {
            spore_code_hash: SPORE_CODE,
            spore_data_hash: blake2b_256(&spore),
            buy_intent_code_hash: BUY_INTENT_CODE,
            owner_script_hash: hash_of(&seller_lock()),
            account_book_script_hash: plan.listed_book.unwrap_or_else(|| self.script_hash()),
        };
        let witness = AccountBookData {
            proof,
            total_income_udt: self.income,
            withdrawn_udt: None,
        };

        let proxy_origin = plan
            .proxy_origin
            .unwrap_or_else(|| OutPoint::new(InMemoryTransaction::DEFAULT_PREVIOUS_TX, 1));
        let tx = InMemoryTransaction::new(self.script.clone())
            .with_input(self.book_cell(&self.data))
            .with_input_from(token(self.proxy_lock(), self.balance), proxy_origin)
            .with_input(
                MockCell::new(seller_lock()).with_type(Script::new(SELLING_CODE, 1, vec![])),
            )
            .with_input(token(buyer_lock(), plan.paid))
            .with_output(next.book_cell(&next.data))
            .with_output(token(self.proxy_lock(), new_balance))
            .with_output(
                MockCell::new(buyer_lock())
                    .with_type(Script::new(SPORE_CODE, 1, plan.spore_id.to_vec()))
                    .with_data(spore),
            )
            .with_witness(0, &WitnessArgs::with_output_type(witness.encode()))
            .with_witness(2, &WitnessArgs::with_input_type(listing.encode()));

        Step { tx, next }
    }

    // =========================================================================
    // WITHDRAWAL
    // =========================================================================

    /// Withdraw for the claimant described by `plan`.
    pub fn withdrawal(&self, plan: &WithdrawalSpec) -> Step {
        self.withdrawal_with(plan, |_| {})
    }

    /// Withdraw, letting `tamper` edit the successor cell data last.
    pub fn withdrawal_with(
        &self,
        plan: &WithdrawalSpec,
        tamper: impl FnOnce(&mut AccountBookCellData),
    ) -> Step {
        let key = self.key_of(&plan.buyer);
        let claimed = plan
            .claimed_withdrawn
            .map_or_else(|| self.entry(key), LedgerValue::Amount);
        let new_balance = self.balance.saturating_sub(plan.payout);

        let old_snapshot = LedgerSnapshot::new(self.income, self.balance, key, claimed);
        let proof = self.ledger.prove_snapshot(&old_snapshot);

        let mut next = self.clone();
        next.ledger.apply(&LedgerSnapshot::new(
            self.income,
            new_balance,
            key,
            LedgerValue::Amount(plan.new_withdrawn),
        ));
        next.balance = new_balance;
        next.withdrawn.insert(key, plan.new_withdrawn);
        next.data.buyer_count = plan.buyer_count.unwrap_or(self.data.buyer_count);
        next.data.smt_root_hash = next.ledger.root();
        tamper(&mut next.data);

        let intent = WithdrawalIntentData {
            buyer: plan.buyer.clone(),
            xudt_script_hash: hash_of(&xudt()),
            xudt_lock_script_hash: hash_of(plan.target.as_ref().unwrap_or(&plan.payee)),
            owner_script_hash: hash_of(&plan.signer),
            expire_since: 0,
        };
        let witness = AccountBookData {
            proof,
            total_income_udt: self.income,
            withdrawn_udt: match claimed {
                LedgerValue::Absent => None,
                LedgerValue::Amount(v) => Some(v),
            },
        };

        let tx = InMemoryTransaction::new(self.script.clone())
            .with_input(self.book_cell(&self.data))
            .with_input(token(self.proxy_lock(), self.balance))
            .with_input(
                MockCell::new(plan.signer.clone())
                    .with_type(Script::new(INTENT_CODE, 1, vec![])),
            )
            .with_output(next.book_cell(&next.data))
            .with_output(token(self.proxy_lock(), new_balance))
            .with_output(token(plan.payee.clone(), plan.payout))
            .with_witness(0, &WitnessArgs::with_output_type(witness.encode()))
            .with_witness(2, &WitnessArgs::with_input_type(intent.encode()));

        Step { tx, next }
    }

    fn key_of(&self, buyer: &WithdrawalBuyer) -> LedgerKey {
        match buyer {
            WithdrawalBuyer::Stakeholder(id) if *id == self.data.info.platform_id => {
                LedgerKey::Platform
            }
            WithdrawalBuyer::Stakeholder(_) => LedgerKey::Author,
            WithdrawalBuyer::Spore(spore) => LedgerKey::Buyer(spore.spore_id),
        }
    }
}

/// A built transaction and the book state after it commits.
#[derive(Debug, Clone)]
pub struct Step {
    pub tx: InMemoryTransaction,
    pub next: BookFixture,
}

// =============================================================================
// SPECS
// =============================================================================

/// Parameters of a sale.
#[derive(Debug, Clone)]
pub struct SaleSpec {
    pub spore_id: Hash,
    pub content: Vec<u8>,
    pub cluster_id: Option<Vec<u8>>,
    /// Tokens the buyer moves into the book.
    pub paid: u128,
    /// Successor `buyer_count`; defaults to old + 1.
    pub buyer_count: Option<u32>,
    /// Out-point of the proxy token input; defaults to the book's origin.
    pub proxy_origin: Option<OutPoint>,
    /// Book named by the listing; defaults to this book.
    pub listed_book: Option<Hash>,
}

impl SaleSpec {
    /// An eligible sale of `spore_id` at the book's price.
    pub fn new(book: &BookFixture, spore_id: Hash) -> Self {
        Self {
            spore_id,
            content: format!("level:{:02x}", book.data.info.level).into_bytes(),
            cluster_id: Some(CLUSTER_ID.to_vec()),
            paid: book.data.info.price,
            buyer_count: None,
            proxy_origin: None,
            listed_book: None,
        }
    }
}

/// Parameters of a withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawalSpec {
    pub buyer: WithdrawalBuyer,
    /// Previous cumulative amount put in the witness; defaults to the truth.
    pub claimed_withdrawn: Option<u128>,
    pub new_withdrawn: u128,
    pub payout: u128,
    /// Lock of the intent cell.
    pub signer: Script,
    /// Lock receiving the payout.
    pub payee: Script,
    /// Lock the intent names as recipient; defaults to `payee`.
    pub target: Option<Script>,
    pub buyer_count: Option<u32>,
}

impl WithdrawalSpec {
    /// Author withdrawal signed and received by the author.
    pub fn author(new_withdrawn: u128, payout: u128) -> Self {
        Self::stakeholder(author_lock(), new_withdrawn, payout)
    }

    /// Platform withdrawal signed and received by the platform.
    pub fn platform(new_withdrawn: u128, payout: u128) -> Self {
        Self::stakeholder(platform_lock(), new_withdrawn, payout)
    }

    fn stakeholder(lock: Script, new_withdrawn: u128, payout: u128) -> Self {
        Self {
            buyer: WithdrawalBuyer::Stakeholder(hash_of(&lock)),
            claimed_withdrawn: None,
            new_withdrawn,
            payout,
            signer: lock.clone(),
            payee: lock,
            target: None,
            buyer_count: None,
        }
    }

    /// Withdrawal for the holder of a spore.
    pub fn spore(spore_id: Hash, spore_level: u8, new_withdrawn: u128, payout: u128) -> Self {
        Self {
            buyer: WithdrawalBuyer::Spore(WithdrawalSporeInfo {
                spore_code_hash: SPORE_CODE,
                spore_level,
                spore_id,
                cluster_id: CLUSTER_ID,
            }),
            claimed_withdrawn: None,
            new_withdrawn,
            payout,
            signer: buyer_lock(),
            payee: buyer_lock(),
            target: None,
            buyer_count: None,
        }
    }
}
