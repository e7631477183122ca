//! # Silent Berry Test Suite
//!
//! Unified test crate for the account book script, run against the
//! in-memory host.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Book state + transaction builders
//! │
//! ├── exploits/         # Attack simulations
//! │   ├── ledger.rs     # Replayed sales, forged withdrawal history
//! │   ├── tokens.rs     # Proxy substitution, over-withdrawal
//! │   └── eligibility.rs# Wrong tier, unsold spores, impostors
//! │
//! └── integration/      # Full lifecycle scenarios
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sb-tests
//!
//! # By category
//! cargo test -p sb-tests integration::
//! cargo test -p sb-tests exploits::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod exploits;
pub mod fixtures;
pub mod integration;
