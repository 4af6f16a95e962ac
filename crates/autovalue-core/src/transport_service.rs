//! Shipping cost estimates between pickup and delivery points.

use chrono::{DateTime, NaiveDate, Utc};

use autovalue_domain::{
    round_money, BookingStatus, DistanceSource, InsuranceDetails, Location, TransportBooking,
    TransportType,
};

use crate::{geo, CoreError, PricingPolicy};

const INSURANCE_MULTIPLE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub pickup: Location,
    pub delivery: Location,
    pub transport_type: TransportType,
    pub preferred_date: Option<NaiveDate>,
}

pub struct TransportService;

impl TransportService {
    pub fn estimate(
        request: &TransportRequest,
        now: DateTime<Utc>,
        policy: &PricingPolicy,
    ) -> Result<TransportBooking, CoreError> {
        for (label, location) in [("pickup", &request.pickup), ("delivery", &request.delivery)] {
            if let Some((latitude, longitude)) = location.coordinates() {
                if !geo::valid_coordinates(latitude, longitude) {
                    return Err(CoreError::Validation(format!(
                        "{label} coordinates ({latitude}, {longitude}) are out of range"
                    )));
                }
            }
        }

        let (distance_miles, distance_source) = Self::distance(request, policy);
        let cost = Self::cost(distance_miles, request.transport_type);
        Ok(TransportBooking {
            cost,
            distance_miles,
            distance_source,
            transport_type: request.transport_type,
            insurance: Self::insurance(cost, policy),
            pickup: request.pickup.clone(),
            delivery: request.delivery.clone(),
            preferred_date: request.preferred_date,
            status: BookingStatus::Pending,
            quoted_at: now,
        })
    }

    /// Great-circle miles when both ends have coordinates, otherwise the policy fallback.
    pub fn distance(request: &TransportRequest, policy: &PricingPolicy) -> (f64, DistanceSource) {
        match (request.pickup.coordinates(), request.delivery.coordinates()) {
            (Some(from), Some(to)) => (geo::haversine_miles(from, to), DistanceSource::GreatCircle),
            _ => (policy.fallback_distance_miles, DistanceSource::Fallback),
        }
    }

    pub fn rate_per_mile(transport_type: TransportType) -> f64 {
        match transport_type {
            TransportType::Enclosed => 2.5,
            TransportType::Flatbed => 2.0,
            TransportType::Tow => 1.8,
            TransportType::Open => 1.5,
        }
    }

    pub fn cost(distance_miles: f64, transport_type: TransportType) -> f64 {
        round_money(distance_miles * Self::rate_per_mile(transport_type))
    }

    pub fn insurance(cost: f64, policy: &PricingPolicy) -> InsuranceDetails {
        InsuranceDetails {
            coverage: "comprehensive".into(),
            amount: policy.insurance_floor.max(cost * INSURANCE_MULTIPLE),
            provider: policy.insurance_provider.clone(),
        }
    }
}
