use checkout_domain::Field;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Rejected navigation. State is left untouched, except that `Blocked`
/// also replaces the session's error mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Step is incomplete: {0}")]
    Blocked(FieldErrors),
    #[error("Already at the first step")]
    AtFirstStep,
    #[error("Checkout is processing; restart to begin a new one")]
    TerminalStep,
    #[error("This tab has no checkout steps yet")]
    PlaceholderActive,
    #[error("The active tab has no waitlist")]
    NotOnPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Unknown field `{0}`")]
    UnknownField(String),
    #[error("`{0}` is derived and cannot be edited")]
    ReadOnlyField(String),
    #[error("Field `{field}` is not on the {screen} screen")]
    FieldNotOnScreen { field: Field, screen: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Conversion rate must be greater than zero (got {0})")]
    NonPositiveRate(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No account found for `{0}`")]
    NotFound(String),
    #[error("Account lookup unavailable: {0}")]
    Unavailable(String),
}
