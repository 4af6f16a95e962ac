//! Instant trade-in offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::Money, vehicle::Condition};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionReport {
    pub condition: Condition,
    pub assessment_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Multipliers applied to the base trade-in value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeInFactors {
    pub year_multiplier: f64,
    pub mileage_multiplier: f64,
    pub condition_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeInOffer {
    pub instant_offer: Money,
    pub offer_expiry: DateTime<Utc>,
    pub condition_report: ConditionReport,
    pub factors: TradeInFactors,
}
