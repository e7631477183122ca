//! # Integration Scenarios
//!
//! Whole transactions through [`sb_account_book::validate`], one lifecycle
//! step at a time (`scenarios`) and chained across a book's life (`flows`).
