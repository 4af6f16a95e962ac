//! Five-year depreciation forecasting.

use chrono::{DateTime, Datelike, Utc};

use autovalue_domain::{
    round_money, Condition, DepreciationFactors, DepreciationForecast, VehicleSnapshot,
    YearlyValue,
};

use crate::CoreError;

/// Nominal yearly depreciation before condition and age adjustments.
pub const BASE_DEPRECIATION: f64 = 0.15;
pub const FORECAST_HORIZON_YEARS: usize = 5;
/// Reported confidence. Fixed; the curve has no statistical fit behind it.
pub const FORECAST_CONFIDENCE: f64 = 0.85;
/// Later years depreciate more slowly. Year one is scaled by condition instead.
const RATE_DECAY: [f64; FORECAST_HORIZON_YEARS] = [1.0, 0.9, 0.8, 0.7, 0.6];
const MILEAGE_IMPACT_PER_100K: f64 = 0.05;

pub struct DepreciationService;

impl DepreciationService {
    /// Projects the vehicle's value for each of the next five calendar years.
    pub fn forecast(
        snapshot: &VehicleSnapshot,
        generated_at: DateTime<Utc>,
    ) -> Result<DepreciationForecast, CoreError> {
        if !snapshot.price.is_finite() || snapshot.price < 0.0 {
            return Err(CoreError::Validation(
                "price must be a non-negative amount".into(),
            ));
        }

        let condition_factor = Self::condition_factor(snapshot.condition);
        let rates = Self::yearly_rates(condition_factor);
        let current_year = generated_at.year();

        let yearly_values: Vec<YearlyValue> = rates
            .iter()
            .enumerate()
            .map(|(index, rate)| {
                let periods = index as i32 + 1;
                let value = round_money(snapshot.price * (1.0 - rate).powi(periods)).max(0.0);
                YearlyValue {
                    year: current_year + periods,
                    value,
                    retention_rate: retention(value, snapshot.price),
                }
            })
            .collect();

        Ok(DepreciationForecast {
            vehicle_id: None,
            optimal_sell_year: Self::optimal_sell_year(&yearly_values),
            yearly_values,
            confidence: FORECAST_CONFIDENCE,
            factors: DepreciationFactors {
                base_rate: BASE_DEPRECIATION,
                mileage_impact: Self::mileage_impact(snapshot.mileage),
                condition_factor,
                market_conditions: "stable".into(),
            },
            generated_at,
        })
    }

    pub fn condition_factor(condition: Condition) -> f64 {
        match condition {
            Condition::Excellent => 0.9,
            Condition::Good => 1.0,
            Condition::Fair | Condition::Poor => 1.1,
        }
    }

    /// Reported only; the yearly values do not apply it.
    pub fn mileage_impact(mileage: u32) -> f64 {
        f64::from(mileage) / 100_000.0 * MILEAGE_IMPACT_PER_100K
    }

    pub fn yearly_rates(condition_factor: f64) -> [f64; FORECAST_HORIZON_YEARS] {
        let mut rates = RATE_DECAY.map(|decay| BASE_DEPRECIATION * decay);
        rates[0] = BASE_DEPRECIATION * condition_factor;
        rates
    }

    /// Year with the highest retention rate; the earliest year wins ties.
    pub fn optimal_sell_year(values: &[YearlyValue]) -> Option<i32> {
        let mut best: Option<&YearlyValue> = None;
        for entry in values {
            match best {
                Some(current) if entry.retention_rate <= current.retention_rate => {}
                _ => best = Some(entry),
            }
        }
        best.map(|entry| entry.year)
    }
}

fn retention(value: f64, price: f64) -> f64 {
    if price > 0.0 {
        value / price
    } else {
        0.0
    }
}
