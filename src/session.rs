//! Builds checkout sessions from the user's configuration.

use checkout_config::Config;
use checkout_core::{CheckoutSession, ConversionError, ConversionRate, RateBook, SessionOptions};
use checkout_domain::ReferenceData;

/// Maps persisted preferences onto session options. Unset placeholders keep
/// their built-in values.
pub fn session_options(config: &Config) -> Result<SessionOptions, ConversionError> {
    let fallback = config
        .conversion
        .default_rate
        .map(ConversionRate::new)
        .transpose()?;
    let mut rates = RateBook::new(fallback);
    for pair in &config.conversion.pairs {
        rates.insert(&*pair.pay, &*pair.receive, ConversionRate::new(pair.rate)?);
    }

    let builtin = SessionOptions::default();
    let placeholders = &config.placeholders;
    Ok(SessionOptions {
        defaults: config.defaults.clone(),
        rates,
        send_address: placeholders
            .send_address
            .clone()
            .unwrap_or(builtin.send_address),
        transaction_id: placeholders
            .transaction_id
            .clone()
            .unwrap_or(builtin.transaction_id),
        account_display_name: placeholders
            .account_display_name
            .clone()
            .unwrap_or(builtin.account_display_name),
    })
}

/// Fresh session over the built-in reference catalog.
pub fn build_session(config: &Config) -> Result<CheckoutSession, ConversionError> {
    Ok(CheckoutSession::new(
        ReferenceData::builtin(),
        session_options(config)?,
    ))
}
