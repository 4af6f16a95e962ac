//! Vehicle shipping between a seller and a buyer.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::Deserializer, Deserialize, Serialize};

use crate::common::Money;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Enclosed,
    Flatbed,
    Tow,
    #[default]
    Open,
}

impl TransportType {
    /// Parses a transport label. Unknown labels ship on an open carrier.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "enclosed" => TransportType::Enclosed,
            "flatbed" => TransportType::Flatbed,
            "tow" => TransportType::Tow,
            _ => TransportType::Open,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportType::Enclosed => "enclosed",
            TransportType::Flatbed => "flatbed",
            TransportType::Tow => "tow",
            TransportType::Open => "open",
        }
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransportType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|label| TransportType::from_label(&label))
            .unwrap_or_default())
    }
}

/// Pickup or delivery point. Coordinates are optional; addresses alone cannot be measured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            address: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            latitude: None,
            longitude: None,
        }
    }

    /// Latitude/longitude pair when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsuranceDetails {
    pub coverage: String,
    pub amount: Money,
    pub provider: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// New estimates start here; confirmation happens outside this crate.
    #[default]
    Pending,
}

/// How the distance behind a cost estimate was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    GreatCircle,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransportBooking {
    pub cost: Money,
    pub distance_miles: f64,
    pub distance_source: DistanceSource,
    pub transport_type: TransportType,
    #[serde(rename = "insuranceDetails")]
    pub insurance: InsuranceDetails,
    pub pickup: Location,
    pub delivery: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<NaiveDate>,
    pub status: BookingStatus,
    pub quoted_at: DateTime<Utc>,
}
