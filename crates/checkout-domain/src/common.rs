//! Shared enums and traits for the checkout flow.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Read-only access to a reference catalog entry.
pub trait ReferenceEntry {
    fn id(&self) -> &str;
    fn label(&self) -> &str;

    fn icon(&self) -> Option<&str> {
        None
    }
}

/// Top-level flow selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tab {
    #[default]
    CryptoToCash,
    CashToCrypto,
    CryptoToFiatLoan,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::CryptoToCash, Tab::CashToCrypto, Tab::CryptoToFiatLoan];

    pub fn key(self) -> &'static str {
        match self {
            Tab::CryptoToCash => "crypto-to-cash",
            Tab::CashToCrypto => "cash-to-crypto",
            Tab::CryptoToFiatLoan => "crypto-to-fiat-loan",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::CryptoToCash => "Crypto to cash",
            Tab::CashToCrypto => "Cash to crypto",
            Tab::CryptoToFiatLoan => "Crypto to fiat loan",
        }
    }

    /// Returns `true` for tabs that only show the waitlist capture screen.
    pub fn is_placeholder(self) -> bool {
        !matches!(self, Tab::CryptoToCash)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tab {
    type Err = ParseKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_key(value);
        Tab::ALL
            .into_iter()
            .find(|tab| normalize_key(tab.key()) == normalized)
            .ok_or_else(|| ParseKeyError::new("tab", value))
    }
}

/// One screen of the linear crypto-to-cash sequence.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    #[default]
    PaymentDetails,
    RecipientBank,
    RecipientContact,
    SendPayment,
    Processing,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::PaymentDetails,
        Step::RecipientBank,
        Step::RecipientContact,
        Step::SendPayment,
        Step::Processing,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Step::PaymentDetails => "payment-details",
            Step::RecipientBank => "recipient-bank",
            Step::RecipientContact => "recipient-contact",
            Step::SendPayment => "send-payment",
            Step::Processing => "processing",
        }
    }

    pub fn next(self) -> Option<Step> {
        match self {
            Step::PaymentDetails => Some(Step::RecipientBank),
            Step::RecipientBank => Some(Step::RecipientContact),
            Step::RecipientContact => Some(Step::SendPayment),
            Step::SendPayment => Some(Step::Processing),
            Step::Processing => None,
        }
    }

    /// Processing has no backward transition; only a restart leaves it.
    pub fn previous(self) -> Option<Step> {
        match self {
            Step::PaymentDetails | Step::Processing => None,
            Step::RecipientBank => Some(Step::PaymentDetails),
            Step::RecipientContact => Some(Step::RecipientBank),
            Step::SendPayment => Some(Step::RecipientContact),
        }
    }

    /// Position in the sequence, starting at 1.
    pub fn ordinal(self) -> usize {
        self as usize + 1
    }

    pub fn form(self) -> Option<FormKind> {
        match self {
            Step::PaymentDetails => Some(FormKind::PaymentDetails),
            Step::RecipientBank => Some(FormKind::RecipientBank),
            Step::RecipientContact => Some(FormKind::RecipientContact),
            Step::SendPayment | Step::Processing => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Editable record owned by a screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    PaymentDetails,
    RecipientBank,
    RecipientContact,
    Waitlist,
}

/// Identifier of every user-editable input.
///
/// `accountName` is intentionally absent: it is derived from the account
/// number and never set by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PayAmount,
    PayCurrency,
    ReceiveAmount,
    ReceiveCurrency,
    PayFrom,
    PayTo,
    Bank,
    AccountNumber,
    Email,
    PhoneNumber,
    CountryCode,
    WaitlistEmail,
}

/// Key of the derived account name, accepted by parsers only to reject it.
pub const ACCOUNT_NAME_KEY: &str = "accountName";

impl Field {
    pub const ALL: [Field; 12] = [
        Field::PayAmount,
        Field::PayCurrency,
        Field::ReceiveAmount,
        Field::ReceiveCurrency,
        Field::PayFrom,
        Field::PayTo,
        Field::Bank,
        Field::AccountNumber,
        Field::Email,
        Field::PhoneNumber,
        Field::CountryCode,
        Field::WaitlistEmail,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::PayAmount => "payAmount",
            Field::PayCurrency => "payCurrency",
            Field::ReceiveAmount => "receiveAmount",
            Field::ReceiveCurrency => "receiveCurrency",
            Field::PayFrom => "payFrom",
            Field::PayTo => "payTo",
            Field::Bank => "bank",
            Field::AccountNumber => "accountNumber",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::CountryCode => "countryCode",
            Field::WaitlistEmail => "waitlistEmail",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::PayAmount => "You pay",
            Field::PayCurrency => "Pay currency",
            Field::ReceiveAmount => "You receive",
            Field::ReceiveCurrency => "Receive currency",
            Field::PayFrom => "Pay from",
            Field::PayTo => "Pay to",
            Field::Bank => "Bank",
            Field::AccountNumber => "Account number",
            Field::Email => "Recipient email",
            Field::PhoneNumber => "Recipient phone number",
            Field::CountryCode => "Country code",
            Field::WaitlistEmail => "Email",
        }
    }

    pub fn form(self) -> FormKind {
        match self {
            Field::PayAmount
            | Field::PayCurrency
            | Field::ReceiveAmount
            | Field::ReceiveCurrency
            | Field::PayFrom
            | Field::PayTo => FormKind::PaymentDetails,
            Field::Bank | Field::AccountNumber => FormKind::RecipientBank,
            Field::Email | Field::PhoneNumber | Field::CountryCode => FormKind::RecipientContact,
            Field::WaitlistEmail => FormKind::Waitlist,
        }
    }

    pub fn for_form(form: FormKind) -> impl Iterator<Item = Field> {
        Field::ALL.into_iter().filter(move |field| field.form() == form)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = ParseKeyError;

    /// Accepts the camelCase key as well as snake_case and kebab-case spellings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_key(value);
        Field::ALL
            .into_iter()
            .find(|field| normalize_key(field.key()) == normalized)
            .ok_or_else(|| ParseKeyError::new("field", value))
    }
}

/// Returns `true` when `value` names the read-only account name.
pub fn is_account_name_key(value: &str) -> bool {
    normalize_key(value) == normalize_key(ACCOUNT_NAME_KEY)
}

fn normalize_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '-' | '_' | ' '))
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when a tab or field key cannot be recognised.
pub struct ParseKeyError {
    pub kind: &'static str,
    pub input: String,
}

impl ParseKeyError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.trim().to_string(),
        }
    }
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.input)
    }
}

impl std::error::Error for ParseKeyError {}
