//! Typed request payloads and their validation rules.

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use autovalue_core::geo;
use autovalue_domain::{Location, YearRange, EARLIEST_MODEL_YEAR};

use crate::errors::{ApiError, Result};

/// Decodes a JSON body into a typed request, reporting missing or mistyped fields.
pub fn decode<T: DeserializeOwned>(body: &Value) -> Result<T> {
    if body.is_null() {
        return Err(ApiError::Validation("request body is required".into()));
    }
    serde_json::from_value(body.clone()).map_err(|err| ApiError::Validation(err.to_string()))
}

fn require_id(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_year(year: i32, current_year: i32) -> Result<()> {
    if !(EARLIEST_MODEL_YEAR..=current_year + 1).contains(&year) {
        return Err(ApiError::Validation(format!(
            "year {year} is outside {EARLIEST_MODEL_YEAR}..={}",
            current_year + 1
        )));
    }
    Ok(())
}

fn check_location(field: &str, location: &Location) -> Result<()> {
    match (location.latitude, location.longitude) {
        (Some(latitude), Some(longitude)) if !geo::valid_coordinates(latitude, longitude) => Err(
            ApiError::Validation(format!("{field} coordinates are out of range")),
        ),
        (Some(_), None) | (None, Some(_)) => Err(ApiError::Validation(format!(
            "{field} needs both latitude and longitude"
        ))),
        _ if location.coordinates().is_none()
            && location.address.as_deref().map_or(true, |a| a.trim().is_empty()) =>
        {
            Err(ApiError::Validation(format!(
                "{field} needs coordinates or an address"
            )))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationRequest {
    pub vehicle_id: String,
}

impl DepreciationRequest {
    pub fn validate(&self) -> Result<()> {
        require_id("vehicleId", &self.vehicle_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub year: i32,
    pub mileage: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInRequest {
    pub vehicle_details: VehicleDetails,
    pub condition: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TradeInRequest {
    pub fn validate(&self, current_year: i32) -> Result<()> {
        check_year(self.vehicle_details.year, current_year)?;
        let mileage = self.vehicle_details.mileage;
        if !mileage.is_finite() || mileage < 0.0 || mileage > f64::from(u32::MAX) {
            return Err(ApiError::Validation(
                "mileage must be a non-negative number".into(),
            ));
        }
        if self.condition.trim().is_empty() {
            return Err(ApiError::Validation("condition must not be empty".into()));
        }
        Ok(())
    }

    /// Mileage rounded to whole miles. Call after [`Self::validate`].
    pub fn mileage(&self) -> u32 {
        self.vehicle_details.mileage.round() as u32
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyRequest {
    pub vehicle_id: String,
    pub provider_id: String,
    pub coverage_type: String,
    pub term_months: u32,
}

impl WarrantyRequest {
    pub fn validate(&self) -> Result<()> {
        require_id("vehicleId", &self.vehicle_id)?;
        require_id("providerId", &self.provider_id)?;
        if self.term_months == 0 {
            return Err(ApiError::Validation("termMonths must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisRequest {
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year_range: Option<YearRange>,
    #[serde(default)]
    pub region: Option<String>,
}

impl MarketAnalysisRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(range) = self.year_range {
            if !range.is_ordered() {
                return Err(ApiError::Validation(format!(
                    "yearRange.min {} is greater than yearRange.max {}",
                    range.min, range.max
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportBookingRequest {
    pub vehicle_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub pickup: Location,
    pub delivery: Location,
    pub transport_type: String,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
}

impl TransportBookingRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        require_id("vehicleId", &self.vehicle_id)?;
        require_id("buyerId", &self.buyer_id)?;
        require_id("sellerId", &self.seller_id)?;
        check_location("pickup", &self.pickup)?;
        check_location("delivery", &self.delivery)?;
        if let Some(date) = self.preferred_date {
            if date < today {
                return Err(ApiError::Validation(format!(
                    "preferredDate {date} is in the past"
                )));
            }
        }
        Ok(())
    }
}
