//! Step data records collected by the wizard.

use serde::{Deserialize, Serialize};

use crate::common::Field;

/// Seed values applied whenever a session starts or restarts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutDefaults {
    pub pay_amount: String,
    pub pay_currency: String,
    pub receive_currency: String,
    pub country_code: String,
}

impl Default for CheckoutDefaults {
    fn default() -> Self {
        Self {
            pay_amount: "1.00".into(),
            pay_currency: "ETH".into(),
            receive_currency: "NGN".into(),
            country_code: "+234".into(),
        }
    }
}

/// Amount entry screen. Amounts stay raw strings so partial input survives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub pay_amount: String,
    pub pay_currency: String,
    pub receive_amount: String,
    pub receive_currency: String,
    pub pay_from: String,
    pub pay_to: String,
}

impl PaymentDetails {
    /// Seeds the record; the receive amount is left for the conversion engine.
    pub fn seeded(defaults: &CheckoutDefaults) -> Self {
        Self {
            pay_amount: defaults.pay_amount.clone(),
            pay_currency: defaults.pay_currency.clone(),
            receive_currency: defaults.receive_currency.clone(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::PayAmount => &self.pay_amount,
            Field::PayCurrency => &self.pay_currency,
            Field::ReceiveAmount => &self.receive_amount,
            Field::ReceiveCurrency => &self.receive_currency,
            Field::PayFrom => &self.pay_from,
            Field::PayTo => &self.pay_to,
            _ => return None,
        };
        Some(value)
    }

    pub fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PayAmount => Some(&mut self.pay_amount),
            Field::PayCurrency => Some(&mut self.pay_currency),
            Field::ReceiveAmount => Some(&mut self.receive_amount),
            Field::ReceiveCurrency => Some(&mut self.receive_currency),
            Field::PayFrom => Some(&mut self.pay_from),
            Field::PayTo => Some(&mut self.pay_to),
            _ => None,
        }
    }
}

/// Recipient bank screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientBankDetails {
    pub bank: String,
    pub account_number: String,
    /// Derived from `account_number`; absent until the number has 10 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
}

impl RecipientBankDetails {
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Bank => Some(&self.bank),
            Field::AccountNumber => Some(&self.account_number),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Bank => Some(&mut self.bank),
            Field::AccountNumber => Some(&mut self.account_number),
            _ => None,
        }
    }
}

/// Recipient contact screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecipientContactDetails {
    pub email: String,
    pub phone_number: String,
    pub country_code: String,
}

impl RecipientContactDetails {
    pub fn seeded(defaults: &CheckoutDefaults) -> Self {
        Self {
            country_code: defaults.country_code.clone(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => Some(&self.email),
            Field::PhoneNumber => Some(&self.phone_number),
            Field::CountryCode => Some(&self.country_code),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::PhoneNumber => Some(&mut self.phone_number),
            Field::CountryCode => Some(&mut self.country_code),
            _ => None,
        }
    }

    /// Country code followed by the number as typed.
    pub fn full_phone_number(&self) -> String {
        format!("{} {}", self.country_code.trim(), self.phone_number.trim())
            .trim()
            .to_string()
    }
}

/// Email capture shown on tabs without a step flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistSignup {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_records_use_defaults() {
        let defaults = CheckoutDefaults::default();
        let payment = PaymentDetails::seeded(&defaults);
        assert_eq!(payment.pay_amount, "1.00");
        assert_eq!(payment.pay_currency, "ETH");
        assert_eq!(payment.receive_currency, "NGN");
        assert!(payment.receive_amount.is_empty());
        assert!(payment.pay_from.is_empty());

        let contact = RecipientContactDetails::seeded(&defaults);
        assert_eq!(contact.country_code, "+234");
    }

    #[test]
    fn slots_only_cover_their_own_fields() {
        let mut bank = RecipientBankDetails::default();
        assert!(bank.slot_mut(Field::PayAmount).is_none());
        *bank.slot_mut(Field::AccountNumber).unwrap() = "0123456789".into();
        assert_eq!(bank.value(Field::AccountNumber), Some("0123456789"));
    }

    #[test]
    fn account_name_is_omitted_when_absent() {
        let json = serde_json::to_value(RecipientBankDetails::default()).unwrap();
        assert!(json.get("accountName").is_none());
        assert_eq!(json["accountNumber"], "");
    }
}
