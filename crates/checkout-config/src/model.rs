use std::{env, path::PathBuf};

use checkout_domain::CheckoutDefaults;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Overrides the directory holding `config/config.json`.
pub const HOME_ENV: &str = "NOVA_CHECKOUT_HOME";
const APP_DIR: &str = "nova_checkout";

/// Stores user-configurable checkout preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionSettings,
    #[serde(default)]
    pub defaults: CheckoutDefaults,
    #[serde(default)]
    pub placeholders: Placeholders,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub quiet_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            conversion: ConversionSettings::default(),
            defaults: CheckoutDefaults::default(),
            placeholders: Placeholders::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            quiet_mode: false,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// `NOVA_CHECKOUT_HOME`, else the platform config dir, else `.`.
    pub fn resolve_base_dir() -> PathBuf {
        if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Rejects rates that could never drive a conversion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rate) = self.conversion.default_rate {
            if rate <= Decimal::ZERO {
                return Err(ConfigError::invalid(
                    "conversion.default_rate",
                    format!("rate must be greater than zero (got {rate})"),
                ));
            }
        }
        for pair in &self.conversion.pairs {
            if pair.pay.trim().is_empty() || pair.receive.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "conversion.pairs",
                    "currency codes must not be empty",
                ));
            }
            if pair.rate <= Decimal::ZERO {
                return Err(ConfigError::invalid(
                    "conversion.pairs",
                    format!(
                        "{}/{} rate must be greater than zero (got {})",
                        pair.pay, pair.receive, pair.rate
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Applied to every pair without an override. `null` disables conversion
    /// for such pairs.
    #[serde(default = "ConversionSettings::default_rate")]
    pub default_rate: Option<Decimal>,
    #[serde(default)]
    pub pairs: Vec<PairRate>,
}

impl ConversionSettings {
    pub fn default_rate() -> Option<Decimal> {
        Some(Decimal::from(1500))
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            default_rate: Self::default_rate(),
            pairs: Vec::new(),
        }
    }
}

/// Rate for one pay/receive currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRate {
    pub pay: String,
    pub receive: String,
    pub rate: Decimal,
}

/// Illustrative values shown by the checkout. `None` keeps the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}
