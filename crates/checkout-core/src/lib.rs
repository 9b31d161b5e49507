//! checkout-core
//!
//! Checkout wizard logic: validation rules, amount conversion, account name
//! derivation and the step/tab state machine.
//! Depends on checkout-domain. No CLI, no terminal I/O, no network.

pub mod account_name;
pub mod conversion;
pub mod error;
pub mod validation;
pub mod wizard;

pub use account_name::*;
pub use conversion::*;
pub use error::*;
pub use validation::*;
pub use wizard::*;

#[cfg(test)]
mod tests;
