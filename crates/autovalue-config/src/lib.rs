//! autovalue-config
//!
//! Persistent pricing settings and runtime preferences.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{BackupInfo, ConfigBackup, ConfigManager};
pub use model::{Config, PricingSettings};
