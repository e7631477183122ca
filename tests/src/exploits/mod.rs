//! # Exploit Simulations
//!
//! Transactions an attacker would try against a live book. Each must be
//! rejected, and with the violation kind that names the broken rule.
//!
//! | Module | Target |
//! |--------|--------|
//! | `ledger` | Replayed sales, forged history, forged proofs |
//! | `tokens` | Proxy cell games, over-withdrawal, shape abuse |
//! | `eligibility` | Wrong tier or cluster, unsold spores, impostors |

pub mod eligibility;
pub mod ledger;
