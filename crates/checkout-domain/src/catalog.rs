//! Static reference data fed to the wizard at session start.

use serde::{Deserialize, Serialize};

use crate::common::{Field, ReferenceEntry};

const CRYPTO_LOGO_BASE: &str = "https://assets.coingecko.com/coins/images";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Currency {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            symbol: None,
            icon: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

impl ReferenceEntry for Currency {
    fn id(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Wallet {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.map(str::to_string),
        }
    }
}

impl ReferenceEntry for Wallet {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }
}

/// Payout channel for the fiat side (bank transfer, mobile money, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: String,
    pub label: String,
}

impl ReferenceEntry for PaymentMethod {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bank {
    pub id: String,
    pub label: String,
}

impl ReferenceEntry for Bank {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryCode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl ReferenceEntry for CountryCode {
    fn id(&self) -> &str {
        &self.code
    }

    fn label(&self) -> &str {
        &self.code
    }

    fn icon(&self) -> Option<&str> {
        self.flag.as_deref()
    }
}

/// Option lists for every select-style field. Never mutated by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceData {
    pub crypto_currencies: Vec<Currency>,
    pub fiat_currencies: Vec<Currency>,
    pub wallets: Vec<Wallet>,
    pub payment_methods: Vec<PaymentMethod>,
    pub banks: Vec<Bank>,
    pub country_codes: Vec<CountryCode>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData {
    /// The catalog shipped with the checkout.
    pub fn builtin() -> Self {
        let logo = |path: &str| format!("{}/{}", CRYPTO_LOGO_BASE, path);
        let tether = logo("325/large/Tether.png");
        Self {
            crypto_currencies: vec![
                Currency::new("ETH", "Ethereum")
                    .with_symbol("Ξ")
                    .with_icon(logo("279/large/ethereum.png")),
                Currency::new("BTC", "Bitcoin")
                    .with_symbol("₿")
                    .with_icon(logo("1/large/bitcoin.png")),
                Currency::new("USDT", "Tether")
                    .with_symbol("USDT")
                    .with_icon(tether.clone()),
                Currency::new("USDT-CELO", "USDT - CELO")
                    .with_symbol("USDT")
                    .with_icon(tether.clone()),
                Currency::new("USDT-TON", "USDT - TON")
                    .with_symbol("USDT")
                    .with_icon(tether.clone()),
                Currency::new("USDT-BNB", "USDT - BNB")
                    .with_symbol("USDT")
                    .with_icon(tether),
            ],
            fiat_currencies: vec![
                Currency::new("NGN", "Nigerian Naira").with_symbol("₦"),
                Currency::new("USD", "US Dollar").with_symbol("$"),
                Currency::new("EUR", "Euro").with_symbol("€"),
            ],
            wallets: vec![
                Wallet::new(
                    "metamask",
                    "Metamask",
                    Some("https://upload.wikimedia.org/wikipedia/commons/3/36/MetaMask_Fox.svg"),
                ),
                Wallet::new(
                    "rainbow",
                    "Rainbow",
                    Some("https://avatars.githubusercontent.com/u/43248574?s=200&v=4"),
                ),
                Wallet::new(
                    "walletconnect",
                    "WalletConnect",
                    Some("https://avatars.githubusercontent.com/u/37784886?s=200&v=4"),
                ),
                Wallet::new(
                    "other",
                    "Other Crypto Wallets (Binance, Coinbase, Bybit etc)",
                    Some("wallet-icon"),
                ),
            ],
            payment_methods: vec![
                method("bank", "Bank Transfer"),
                method("mobile", "Mobile Money"),
                method("cash", "Cash Pickup"),
            ],
            banks: vec![
                bank("access", "Access Bank"),
                bank("gtb", "GTBank"),
                bank("first", "First Bank"),
                bank("zenith", "Zenith Bank"),
                bank("uba", "UBA"),
                bank("fidelity", "Fidelity Bank"),
            ],
            country_codes: vec![
                CountryCode {
                    code: "+234".into(),
                    flag: Some("🇳🇬".into()),
                },
                CountryCode {
                    code: "+1".into(),
                    flag: None,
                },
                CountryCode {
                    code: "+44".into(),
                    flag: None,
                },
            ],
        }
    }

    /// `(id, label)` pairs for a select-style field, or `None` for free text.
    pub fn options_for(&self, field: Field) -> Option<Vec<(&str, &str)>> {
        let options = match field {
            Field::PayCurrency => entries(&self.crypto_currencies),
            Field::ReceiveCurrency => entries(&self.fiat_currencies),
            Field::PayFrom => entries(&self.wallets),
            Field::PayTo => entries(&self.payment_methods),
            Field::Bank => entries(&self.banks),
            Field::CountryCode => entries(&self.country_codes),
            _ => return None,
        };
        Some(options)
    }

    /// Display label for an id of a select-style field.
    pub fn label_for(&self, field: Field, id: &str) -> Option<&str> {
        self.options_for(field)?
            .into_iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, label)| label)
    }

    pub fn wallet(&self, id: &str) -> Option<&Wallet> {
        self.wallets.iter().find(|wallet| wallet.id == id)
    }
}

fn entries<T: ReferenceEntry>(items: &[T]) -> Vec<(&str, &str)> {
    items.iter().map(|item| (item.id(), item.label())).collect()
}

fn method(id: &str, label: &str) -> PaymentMethod {
    PaymentMethod {
        id: id.into(),
        label: label.into(),
    }
}

fn bank(id: &str, label: &str) -> Bank {
    Bank {
        id: id.into(),
        label: label.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_covers_select_fields() {
        let data = ReferenceData::builtin();
        for field in [
            Field::PayCurrency,
            Field::ReceiveCurrency,
            Field::PayFrom,
            Field::PayTo,
            Field::Bank,
            Field::CountryCode,
        ] {
            let options = data.options_for(field).expect("select field");
            assert!(!options.is_empty(), "{field} has no options");
        }
        assert!(data.options_for(Field::PayAmount).is_none());
    }

    #[test]
    fn label_lookup_uses_ids() {
        let data = ReferenceData::builtin();
        assert_eq!(data.label_for(Field::Bank, "gtb"), Some("GTBank"));
        assert_eq!(data.label_for(Field::PayCurrency, "BTC"), Some("Bitcoin"));
        assert_eq!(data.label_for(Field::Bank, "missing"), None);
    }
}
