//! Derived records produced once the recipient details are complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ReferenceData;
use crate::records::{PaymentDetails, RecipientBankDetails, RecipientContactDetails};

/// Network shown when no pay currency has been selected.
pub const FALLBACK_NETWORK: &str = "ETH";
/// Wallet label shown when `payFrom` does not match a known wallet.
pub const FALLBACK_WALLET_LABEL: &str = "Other";

/// Instructions rendered on the send-payment screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendInstructions {
    pub address: String,
    pub network: String,
    pub amount_to_send: String,
    pub wallet: String,
}

impl SendInstructions {
    pub fn derive(payment: &PaymentDetails, reference: &ReferenceData, address: &str) -> Self {
        let network = non_empty(&payment.pay_currency)
            .unwrap_or(FALLBACK_NETWORK)
            .to_string();
        let wallet = reference
            .wallet(&payment.pay_from)
            .map(|wallet| wallet.name.clone())
            .unwrap_or_else(|| FALLBACK_WALLET_LABEL.to_string());
        Self {
            address: address.to_string(),
            amount_to_send: format!("{} {}", payment.pay_amount, payment.pay_currency)
                .trim()
                .to_string(),
            network,
            wallet,
        }
    }
}

/// Snapshot of a confirmed checkout, built when the user reports the payment as sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub send_address: String,
    pub network: String,
    pub pay_amount: String,
    pub pay_currency: String,
    pub receive_amount: String,
    pub receive_currency: String,
    pub payout_method: String,
    pub bank: String,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn derive(
        transaction_id: &str,
        instructions: &SendInstructions,
        payment: &PaymentDetails,
        bank: &RecipientBankDetails,
        contact: &RecipientContactDetails,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.to_string(),
            send_address: instructions.address.clone(),
            network: instructions.network.clone(),
            pay_amount: payment.pay_amount.clone(),
            pay_currency: payment.pay_currency.clone(),
            receive_amount: payment.receive_amount.clone(),
            receive_currency: payment.receive_currency.clone(),
            payout_method: payment.pay_to.clone(),
            bank: bank.bank.clone(),
            account_number: bank.account_number.clone(),
            account_name: bank.account_name.clone(),
            recipient_email: contact.email.trim().to_string(),
            recipient_phone: contact.full_phone_number(),
            submitted_at,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> PaymentDetails {
        PaymentDetails {
            pay_amount: "2.50".into(),
            pay_currency: "BTC".into(),
            receive_amount: "3750.00".into(),
            receive_currency: "NGN".into(),
            pay_from: "metamask".into(),
            pay_to: "bank".into(),
        }
    }

    #[test]
    fn instructions_use_pay_currency_and_wallet_name() {
        let reference = ReferenceData::builtin();
        let instructions = SendInstructions::derive(&payment(), &reference, "addr");
        assert_eq!(instructions.network, "BTC");
        assert_eq!(instructions.amount_to_send, "2.50 BTC");
        assert_eq!(instructions.wallet, "Metamask");
    }

    #[test]
    fn instructions_fall_back_when_unset() {
        let reference = ReferenceData::builtin();
        let mut details = payment();
        details.pay_currency.clear();
        details.pay_from.clear();
        let instructions = SendInstructions::derive(&details, &reference, "addr");
        assert_eq!(instructions.network, FALLBACK_NETWORK);
        assert_eq!(instructions.wallet, FALLBACK_WALLET_LABEL);
    }

    #[test]
    fn record_joins_phone_and_copies_recipient() {
        let reference = ReferenceData::builtin();
        let details = payment();
        let instructions = SendInstructions::derive(&details, &reference, "addr");
        let bank = RecipientBankDetails {
            bank: "gtb".into(),
            account_number: "0123456789".into(),
            account_name: Some("ODUTUGA GBEKE".into()),
        };
        let contact = RecipientContactDetails {
            email: "ada@example.com".into(),
            phone_number: "801 234 5678".into(),
            country_code: "+234".into(),
        };
        let record = TransactionRecord::derive(
            "NC1",
            &instructions,
            &details,
            &bank,
            &contact,
            Utc::now(),
        );
        assert_eq!(record.recipient_phone, "+234 801 234 5678");
        assert_eq!(record.account_name.as_deref(), Some("ODUTUGA GBEKE"));
        assert_eq!(record.payout_method, "bank");
    }
}
