use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DATA_DIR_NAME: &str = ".autovalue";

/// Runtime configuration for the pricing services and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub currency: String,
    #[serde(default)]
    pub pricing: PricingSettings,
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for stored records. Defaults to `<data root>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            pricing: PricingSettings::default(),
            log_filter: Self::default_log_filter(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_log_filter() -> String {
        "autovalue=info".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Application data root: `AUTOVALUE_HOME` when set, else `~/.autovalue`.
    pub fn resolve_data_root() -> PathBuf {
        if let Some(custom) = std::env::var_os("AUTOVALUE_HOME") {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME)
    }

    pub fn resolve_data_dir(&self, root: &std::path::Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => root.join("data"),
        }
    }
}

/// Knobs read by the calculators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingSettings {
    pub offer_validity_days: i64,
    pub clamp_negative_offers: bool,
    pub warranty_deductible: f64,
    pub fallback_distance_miles: f64,
    pub insurance_floor: f64,
    pub insurance_provider: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            offer_validity_days: 7,
            clamp_negative_offers: true,
            warranty_deductible: 100.0,
            fallback_distance_miles: 500.0,
            insurance_floor: 50_000.0,
            insurance_provider: "AutoValue Transit Insurance".into(),
        }
    }
}

impl PricingSettings {
    /// Rejects settings no calculator could honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.offer_validity_days <= 0 {
            return Err("offer_validity_days must be positive".into());
        }
        if !(self.warranty_deductible.is_finite() && self.warranty_deductible >= 0.0) {
            return Err("warranty_deductible must be a non-negative amount".into());
        }
        if !(self.fallback_distance_miles.is_finite() && self.fallback_distance_miles >= 0.0) {
            return Err("fallback_distance_miles must be non-negative".into());
        }
        if !(self.insurance_floor.is_finite() && self.insurance_floor >= 0.0) {
            return Err("insurance_floor must be a non-negative amount".into());
        }
        if self.insurance_provider.trim().is_empty() {
            return Err("insurance_provider must not be empty".into());
        }
        Ok(())
    }
}
