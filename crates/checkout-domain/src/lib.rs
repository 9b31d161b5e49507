//! checkout-domain
//!
//! Pure checkout models (tabs, steps, step records, reference catalog).
//! No I/O, no CLI, no validation logic. Only data types and core enums.

pub mod catalog;
pub mod common;
pub mod records;
pub mod transaction;

pub use catalog::*;
pub use common::*;
pub use records::*;
pub use transaction::*;
