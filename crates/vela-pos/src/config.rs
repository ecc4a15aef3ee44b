//! # Terminal Configuration
//!
//! Configuration loaded at terminal startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`VELA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};

use vela_core::types::TaxRate;
use vela_core::validation::validate_tax_rate_bps;

/// Terminal configuration.
///
/// Most fields have sensible defaults for development; production
/// deployments configure them per store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosConfig {
    /// Store name (displayed on receipts).
    pub store_name: String,

    /// Terminal/register identifier.
    pub register_id: String,

    /// Operator tag carried on orders created by this terminal.
    pub cashier: Option<String>,

    /// Default tax rate in basis points (825 = 8.25%).
    pub default_tax_rate_bps: u32,

    /// Currency symbol (for receipt text).
    pub currency_symbol: String,

    /// Number of decimal places for currency.
    pub currency_decimals: u8,
}

impl Default for PosConfig {
    /// Development defaults: "Vela Dev Store", register "pos-01",
    /// 8.25% tax, USD formatting.
    fn default() -> Self {
        PosConfig {
            store_name: "Vela Dev Store".to_string(),
            register_id: "pos-01".to_string(),
            cashier: None,
            default_tax_rate_bps: 825,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl PosConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `VELA_STORE_NAME`: Override store name
    /// - `VELA_REGISTER_ID`: Override register id
    /// - `VELA_CASHIER`: Operator tag
    /// - `VELA_TAX_RATE`: Override tax rate as a percentage (e.g., "8.25")
    pub fn from_env() -> Self {
        let mut config = PosConfig::default();

        if let Ok(store_name) = std::env::var("VELA_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(register_id) = std::env::var("VELA_REGISTER_ID") {
            config.register_id = register_id;
        }

        if let Ok(cashier) = std::env::var("VELA_CASHIER") {
            config.cashier = Some(cashier);
        }

        if let Ok(rate_str) = std::env::var("VELA_TAX_RATE") {
            if let Ok(rate) = rate_str.parse::<f64>() {
                let bps = (rate * 100.0).round() as u32;
                if validate_tax_rate_bps(bps).is_ok() {
                    config.default_tax_rate_bps = bps;
                }
            }
        }

        config
    }

    /// The default tax rate as a typed rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.default_tax_rate_bps)
    }

    /// Formats a cent amount as a currency string for receipt text.
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PosConfig::default();
        assert_eq!(config.default_tax_rate_bps, 825);
        assert_eq!(config.tax_rate().bps(), 825);
    }

    #[test]
    fn test_format_currency() {
        let config = PosConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(0), "$0.00");
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }
}
