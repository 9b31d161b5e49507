//! Keeps the pay and receive amounts consistent under a conversion rate.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// Decimal places kept by recomputed amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Fixed illustrative rate: units of receive currency per unit of pay currency.
pub const ILLUSTRATIVE_RATE: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);

/// A strictly positive conversion multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ConversionRate(Decimal);

impl ConversionRate {
    pub fn new(rate: Decimal) -> Result<Self, ConversionError> {
        if rate > Decimal::ZERO {
            Ok(Self(rate))
        } else {
            Err(ConversionError::NonPositiveRate(rate))
        }
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl Default for ConversionRate {
    fn default() -> Self {
        Self(ILLUSTRATIVE_RATE)
    }
}

impl TryFrom<Decimal> for ConversionRate {
    type Error = ConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConversionRate> for Decimal {
    fn from(rate: ConversionRate) -> Self {
        rate.0
    }
}

/// Value to write into the field that was not edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recompute {
    Value(String),
    /// The edited input is empty, non-numeric or negative.
    Cleared,
}

impl Recompute {
    pub fn into_field_value(self) -> String {
        match self {
            Recompute::Value(value) => value,
            Recompute::Cleared => String::new(),
        }
    }
}

/// Parses a decimal amount after trimming whitespace. No exponent forms.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Rounds half away from zero and renders exactly two decimals.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

/// `round(pay × rate, 2)`
pub fn pay_to_receive(raw_pay: &str, rate: ConversionRate) -> Recompute {
    recompute(raw_pay, |amount| amount.checked_mul(rate.value()))
}

/// `round(receive ÷ rate, 2)`
pub fn receive_to_pay(raw_receive: &str, rate: ConversionRate) -> Recompute {
    recompute(raw_receive, |amount| amount.checked_div(rate.value()))
}

fn recompute(raw: &str, apply: impl FnOnce(Decimal) -> Option<Decimal>) -> Recompute {
    parse_amount(raw)
        .filter(|amount| !amount.is_sign_negative())
        .and_then(apply)
        .map(|converted| Recompute::Value(format_amount(converted)))
        .unwrap_or(Recompute::Cleared)
}

/// Pair-specific rates with an optional fallback for every other pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateBook {
    pairs: HashMap<(String, String), ConversionRate>,
    fallback: Option<ConversionRate>,
}

impl Default for RateBook {
    fn default() -> Self {
        Self::new(Some(ConversionRate::default()))
    }
}

impl RateBook {
    pub fn new(fallback: Option<ConversionRate>) -> Self {
        Self {
            pairs: HashMap::new(),
            fallback,
        }
    }

    pub fn with_pair(
        mut self,
        pay: impl Into<String>,
        receive: impl Into<String>,
        rate: ConversionRate,
    ) -> Self {
        self.insert(pay, receive, rate);
        self
    }

    pub fn insert(&mut self, pay: impl Into<String>, receive: impl Into<String>, rate: ConversionRate) {
        self.pairs.insert(
            (normalize_code(&pay.into()), normalize_code(&receive.into())),
            rate,
        );
    }

    /// `None` means the rate is unknown and no recompute should happen.
    pub fn rate(&self, pay: &str, receive: &str) -> Option<ConversionRate> {
        self.pairs
            .get(&(normalize_code(pay), normalize_code(receive)))
            .copied()
            .or(self.fallback)
    }

    pub fn fallback(&self) -> Option<ConversionRate> {
        self.fallback
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
