//! Vehicle attributes consumed by every estimator.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};

use crate::common::Money;

/// Earliest model year accepted as a plausible vehicle.
pub const EARLIEST_MODEL_YEAR: i32 = 1886;

/// Assessed physical condition of a vehicle.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    /// Also the bucket for unknown or missing labels.
    #[default]
    Poor,
}

impl Condition {
    /// Parses a condition label. Anything unrecognised lands in the lowest bucket.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Condition::Excellent,
            "good" => Condition::Good,
            "fair" => Condition::Fair,
            _ => Condition::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|label| Condition::from_label(&label))
            .unwrap_or_default())
    }
}

/// Read-only view of the vehicle attributes that drive pricing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VehicleSnapshot {
    pub price: Money,
    pub year: i32,
    pub mileage: u32,
    pub condition: Condition,
}

impl VehicleSnapshot {
    pub fn new(price: Money, year: i32, mileage: u32, condition: Condition) -> Self {
        Self {
            price,
            year,
            mileage,
            condition,
        }
    }

    /// Whole years between the model year and `current_year`. Negative for next-year models.
    pub fn age(&self, current_year: i32) -> i32 {
        current_year - self.year
    }

    /// True when the model year falls between the first automobile and next year's models.
    pub fn has_plausible_year(&self, current_year: i32) -> bool {
        (EARLIEST_MODEL_YEAR..=current_year + 1).contains(&self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_labels_are_case_insensitive() {
        assert_eq!(Condition::from_label("EXCELLENT"), Condition::Excellent);
        assert_eq!(Condition::from_label(" good "), Condition::Good);
        assert_eq!(Condition::from_label("Fair"), Condition::Fair);
        assert_eq!(Condition::from_label("salvage"), Condition::Poor);
    }

    #[test]
    fn condition_deserializes_leniently() {
        let parsed: Condition = serde_json::from_str("\"Excellent\"").unwrap();
        assert_eq!(parsed, Condition::Excellent);
        let missing: Condition = serde_json::from_str("null").unwrap();
        assert_eq!(missing, Condition::Poor);
    }

    #[test]
    fn snapshot_year_plausibility() {
        let snapshot = VehicleSnapshot::new(20_000.0, 2026, 0, Condition::Good);
        assert!(snapshot.has_plausible_year(2025));
        assert!(!snapshot.has_plausible_year(2024));
        assert_eq!(snapshot.age(2025), -1);
    }
}
