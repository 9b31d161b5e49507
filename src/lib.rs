#![doc(test(attr(deny(warnings))))]

//! Nova Checkout: terminal front end for the crypto-to-cash checkout wizard.
//!
//! The wizard itself lives in `checkout_core`; this crate wires it to the
//! user's configuration, tracing and the interactive shell.

pub mod cli;
pub mod errors;
pub mod session;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Nova Checkout tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
