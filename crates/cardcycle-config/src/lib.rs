//! cardcycle-config
//!
//! Persistent user preferences: theme, alert thresholds, data directory and
//! display settings, plus their disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;
pub mod theme;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AlertSettings, Config};
pub use theme::{Theme, ThemeInfo};
