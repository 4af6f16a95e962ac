//! Shapes of the records read back from the external store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    common::{Displayable, Money},
    vehicle::{Condition, VehicleSnapshot},
    warranty::{CoverageTerms, CoverageTier},
};

/// Row of the `vehicles` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleRecord {
    pub id: String,
    pub price: Money,
    pub year: i32,
    #[serde(default)]
    pub mileage: u32,
    /// Rows without a condition are priced in the lowest bucket.
    #[serde(default)]
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub vehicle_type: Option<String>,
}

impl VehicleRecord {
    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot::new(self.price, self.year, self.mileage, self.condition)
    }
}

impl Displayable for VehicleRecord {
    fn display_label(&self) -> String {
        let make = self.make.as_deref().unwrap_or("vehicle");
        match self.model.as_deref() {
            Some(model) => format!("{} {} {}", self.year, make, model),
            None => format!("{} {}", self.year, make),
        }
    }
}

/// Row of the `warranty_providers` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub coverage: BTreeMap<CoverageTier, CoverageTerms>,
}

impl ProviderRecord {
    /// Published terms for a tier, or the built-in defaults.
    pub fn terms_for(&self, tier: CoverageTier) -> CoverageTerms {
        self.coverage
            .get(&tier)
            .cloned()
            .unwrap_or_else(|| CoverageTerms::builtin(tier))
    }
}

/// Row of the `profiles` table (buyers and sellers).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}
