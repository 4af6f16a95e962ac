//! Depreciation forecast produced for a single vehicle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::Money;

/// Projected value of the vehicle at the end of a calendar year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyValue {
    pub year: i32,
    pub value: Money,
    /// Projected value divided by the original price.
    pub retention_rate: f64,
}

/// Inputs reported alongside the forecast so callers can explain the curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationFactors {
    pub base_rate: f64,
    pub mileage_impact: f64,
    pub condition_factor: f64,
    pub market_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationForecast {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub yearly_values: Vec<YearlyValue>,
    pub confidence: f64,
    pub factors: DepreciationFactors,
    /// Calendar year with the best retention rate, earliest wins ties.
    pub optimal_sell_year: Option<i32>,
    pub generated_at: DateTime<Utc>,
}

impl DepreciationForecast {
    pub fn with_vehicle(mut self, vehicle_id: impl Into<String>) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self
    }
}
