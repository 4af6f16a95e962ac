//! Market trend inputs and summaries.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::common::Money;

/// A single observed listing price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub price: Money,
    pub recorded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_listed: Option<u32>,
}

impl PriceSample {
    pub fn new(price: Money, recorded_at: DateTime<Utc>) -> Self {
        Self {
            price,
            recorded_at,
            days_listed: None,
        }
    }

    pub fn listed_for(mut self, days: u32) -> Self {
        self.days_listed = Some(days);
        self
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.recorded_at.month())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
        };
        f.write_str(label)
    }
}

/// Meteorological seasons, northern hemisphere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ListingDurationStats {
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrendSummary {
    pub trend_direction: TrendDirection,
    pub quarterly_change: f64,
    pub seasonal_factors: BTreeMap<Season, f64>,
    pub median_price: Money,
    pub price_volatility: f64,
    pub listing_duration_stats: ListingDurationStats,
    pub demand_index: f64,
    pub sample_size: usize,
}

/// Inclusive model-year window used to select comparable listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn months_map_to_meteorological_seasons() {
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(8), Season::Summer);
        assert_eq!(Season::from_month(11), Season::Fall);
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
    }

    #[test]
    fn seasonal_factors_serialize_with_lowercase_keys() {
        let mut factors = BTreeMap::new();
        factors.insert(Season::Spring, 1.05);
        let json = serde_json::to_value(&factors).unwrap();
        assert_eq!(json["spring"], 1.05);
    }

    #[test]
    fn year_range_is_inclusive() {
        let range = YearRange::new(2018, 2020);
        assert!(range.contains(2018));
        assert!(range.contains(2020));
        assert!(!range.contains(2021));
        assert!(!YearRange::new(2021, 2019).is_ordered());
    }
}
