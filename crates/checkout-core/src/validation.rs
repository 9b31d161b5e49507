//! Per-step validation rules.
//!
//! Every step record implements [`Validate`]. Validation is a pure function of
//! the record: callers recompute it on demand instead of caching a validity
//! flag. All failing fields are reported together; within a field the first
//! failing [`Rule`] supplies the message.

use std::collections::BTreeMap;
use std::fmt;

use checkout_domain::{
    Field, PaymentDetails, RecipientBankDetails, RecipientContactDetails, WaitlistSignup,
};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::conversion::parse_amount;

pub const ACCOUNT_NUMBER_LENGTH: usize = 10;
pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@(?:[a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$")
        .expect("email pattern compiles")
});

/// Mapping from field to a human-readable message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Drops a single field's message, leaving the others in place.
    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// A single check over a raw field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Rejects empty or whitespace-only input.
    Required(&'static str),
    /// Requires a strictly positive decimal number.
    PositiveAmount(&'static str),
    MinLength(usize, &'static str),
    MaxLength(usize, &'static str),
    DigitsOnly(&'static str),
    EmailShape(&'static str),
    /// Counts digits after stripping every other character.
    MinDigits(usize, &'static str),
}

impl Rule {
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        let passed = match *self {
            Rule::Required(_) => !value.trim().is_empty(),
            Rule::PositiveAmount(_) => {
                parse_amount(value).is_some_and(|amount| amount > Decimal::ZERO)
            }
            Rule::MinLength(min, _) => value.chars().count() >= min,
            Rule::MaxLength(max, _) => value.chars().count() <= max,
            Rule::DigitsOnly(_) => !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit()),
            Rule::EmailShape(_) => is_email_shaped(value),
            Rule::MinDigits(min, _) => value.chars().filter(char::is_ascii_digit).count() >= min,
        };
        if passed {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    pub fn message(&self) -> &'static str {
        match *self {
            Rule::Required(message)
            | Rule::PositiveAmount(message)
            | Rule::MinLength(_, message)
            | Rule::MaxLength(_, message)
            | Rule::DigitsOnly(message)
            | Rule::EmailShape(message)
            | Rule::MinDigits(_, message) => message,
        }
    }
}

const AMOUNT_RULES: &[Rule] = &[
    Rule::Required("Amount is required"),
    Rule::PositiveAmount("Amount must be greater than 0"),
];
const PAY_CURRENCY_RULES: &[Rule] = &[Rule::Required("Please select a currency to pay")];
const RECEIVE_CURRENCY_RULES: &[Rule] = &[Rule::Required("Please select a currency to receive")];
const PAY_FROM_RULES: &[Rule] = &[Rule::Required("Please select a wallet")];
const PAY_TO_RULES: &[Rule] = &[Rule::Required("Please select a payment method")];
const BANK_RULES: &[Rule] = &[Rule::Required("Please select a bank")];
const ACCOUNT_NUMBER_RULES: &[Rule] = &[
    Rule::MinLength(
        ACCOUNT_NUMBER_LENGTH,
        "Account number must be at least 10 digits",
    ),
    Rule::MaxLength(
        ACCOUNT_NUMBER_LENGTH,
        "Account number must be exactly 10 digits",
    ),
    Rule::DigitsOnly("Account number must contain only numbers"),
];
const EMAIL_RULES: &[Rule] = &[
    Rule::Required("Email is required"),
    Rule::EmailShape("Please enter a valid email address"),
];
const PHONE_RULES: &[Rule] = &[
    Rule::Required("Phone number is required"),
    Rule::MinDigits(
        MIN_PHONE_DIGITS,
        "Phone number must contain at least 10 digits",
    ),
];
const COUNTRY_CODE_RULES: &[Rule] = &[Rule::Required("Country code is required")];

/// Validation contract shared by every step record.
pub trait Validate {
    /// Field values paired with the rules that apply to them.
    fn checks(&self) -> Vec<(Field, &str, &'static [Rule])>;

    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, value, rules) in self.checks() {
            if let Some(message) = rules.iter().find_map(|rule| rule.check(value).err()) {
                errors.insert(field, message);
            }
        }
        errors
    }

    fn is_valid(&self) -> bool {
        self.field_errors().is_empty()
    }
}

impl Validate for PaymentDetails {
    fn checks(&self) -> Vec<(Field, &str, &'static [Rule])> {
        vec![
            (Field::PayAmount, self.pay_amount.as_str(), AMOUNT_RULES),
            (Field::PayCurrency, self.pay_currency.as_str(), PAY_CURRENCY_RULES),
            (Field::ReceiveAmount, self.receive_amount.as_str(), AMOUNT_RULES),
            (
                Field::ReceiveCurrency,
                self.receive_currency.as_str(),
                RECEIVE_CURRENCY_RULES,
            ),
            (Field::PayFrom, self.pay_from.as_str(), PAY_FROM_RULES),
            (Field::PayTo, self.pay_to.as_str(), PAY_TO_RULES),
        ]
    }
}

impl Validate for RecipientBankDetails {
    fn checks(&self) -> Vec<(Field, &str, &'static [Rule])> {
        vec![
            (Field::Bank, self.bank.as_str(), BANK_RULES),
            (
                Field::AccountNumber,
                self.account_number.as_str(),
                ACCOUNT_NUMBER_RULES,
            ),
        ]
    }
}

impl Validate for RecipientContactDetails {
    fn checks(&self) -> Vec<(Field, &str, &'static [Rule])> {
        vec![
            (Field::Email, self.email.as_str(), EMAIL_RULES),
            (Field::PhoneNumber, self.phone_number.as_str(), PHONE_RULES),
            (Field::CountryCode, self.country_code.as_str(), COUNTRY_CODE_RULES),
        ]
    }
}

impl Validate for WaitlistSignup {
    fn checks(&self) -> Vec<(Field, &str, &'static [Rule])> {
        vec![(Field::WaitlistEmail, self.email.as_str(), EMAIL_RULES)]
    }
}

/// `local@domain.tld`, without a leading dot or consecutive dots.
pub fn is_email_shaped(value: &str) -> bool {
    let value = value.trim();
    !value.starts_with('.') && !value.contains("..") && EMAIL_SHAPE.is_match(value)
}
