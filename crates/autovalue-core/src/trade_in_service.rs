//! Instant cash offers for trade-ins.

use chrono::{DateTime, Datelike, Duration, Utc};

use autovalue_domain::{round_money, Condition, ConditionReport, TradeInFactors, TradeInOffer};

use crate::{CoreError, PricingPolicy};

pub const TRADE_IN_BASE_VALUE: f64 = 10_000.0;
const YEAR_DEPRECIATION: f64 = 0.05;
const MILEAGE_DEPRECIATION_PER_10K: f64 = 0.1;

/// Vehicle details supplied by the seller.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeInInput {
    pub year: i32,
    pub mileage: u32,
    pub condition: Condition,
    pub notes: Option<String>,
}

pub struct TradeInService;

impl TradeInService {
    pub fn offer(
        input: &TradeInInput,
        now: DateTime<Utc>,
        policy: &PricingPolicy,
    ) -> Result<TradeInOffer, CoreError> {
        if policy.offer_validity_days <= 0 {
            return Err(CoreError::Validation(
                "offer validity must be at least one day".into(),
            ));
        }

        let factors = Self::factors(input, now.year());
        let instant_offer = Self::instant_offer(&factors, policy.clamp_negative_offers);

        Ok(TradeInOffer {
            instant_offer,
            offer_expiry: now + Duration::days(policy.offer_validity_days),
            condition_report: ConditionReport {
                condition: input.condition,
                assessment_date: now,
                notes: input.notes.clone(),
            },
            factors,
        })
    }

    pub fn factors(input: &TradeInInput, current_year: i32) -> TradeInFactors {
        TradeInFactors {
            year_multiplier: f64::from(current_year - input.year) * YEAR_DEPRECIATION,
            mileage_multiplier: f64::from(input.mileage) / 10_000.0 * MILEAGE_DEPRECIATION_PER_10K,
            condition_multiplier: Self::condition_multiplier(input.condition),
        }
    }

    pub fn condition_multiplier(condition: Condition) -> f64 {
        match condition {
            Condition::Excellent => 1.2,
            Condition::Good => 1.0,
            Condition::Fair => 0.8,
            Condition::Poor => 0.6,
        }
    }

    /// With `clamp` set, each depreciation factor bottoms out at zero so the offer does too.
    pub fn instant_offer(factors: &TradeInFactors, clamp: bool) -> f64 {
        let mut age = 1.0 - factors.year_multiplier;
        let mut usage = 1.0 - factors.mileage_multiplier;
        if clamp {
            age = age.max(0.0);
            usage = usage.max(0.0);
        }
        round_money(TRADE_IN_BASE_VALUE * age * usage * factors.condition_multiplier)
    }
}
