//! # Silent Berry Types
//!
//! Record schemas and molecule codec shared by the account book script and
//! its tooling.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every on-chain schema is declared once here.
//! - **Strict Decoding**: tables must carry exactly their schema's fields, so
//!   equal records always have equal bytes.
//! - **No Panics on Input**: all reads are bounds-checked and return
//!   [`CodecError`] for malformed bytes.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod records;

pub use codec::Record;
pub use entities::*;
pub use errors::*;
pub use records::*;
