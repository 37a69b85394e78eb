use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Theme;

const APP_DIR_NAME: &str = "cardcycle";

/// Stores user-configurable preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency_symbol: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for card data. When unset, `Tracker::open_default`
    /// uses the platform data dir and `Tracker::open_in` uses `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-ES".into(),
            currency_symbol: "$".into(),
            theme: Theme::default(),
            alerts: AlertSettings::default(),
            backup_retention: Self::default_backup_retention(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join(APP_DIR_NAME)
    }

    /// Formats an amount with the configured symbol and two decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        if amount < 0.0 {
            format!("-{}{:.2}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{:.2}", self.currency_symbol, amount)
        }
    }
}

/// Day and percentage limits used for payment and usage alerts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub urgent_days: i64,
    pub soon_days: i64,
    pub high_usage_percent: f64,
    pub critical_usage_percent: f64,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            urgent_days: 3,
            soon_days: 7,
            high_usage_percent: 75.0,
            critical_usage_percent: 90.0,
        }
    }
}
