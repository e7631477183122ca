//! # Ports
//!
//! The account book script is driven by a single entry point
//! ([`crate::service`]) and drives the host through [`outbound`].

pub mod outbound;

pub use outbound::*;
