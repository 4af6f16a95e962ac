//! Extended warranty pricing.

use chrono::{DateTime, Datelike, Duration, Utc};

use autovalue_domain::{
    round_money, CoverageDetails, CoverageTier, ProviderRecord, VehicleSnapshot, WarrantyQuote,
};

use crate::{CoreError, PricingPolicy};

pub const WARRANTY_BASE_PRICE: f64 = 1_000.0;
pub const MAX_TERM_MONTHS: u32 = 120;
const AGE_LOADING: f64 = 0.1;
const MILEAGE_LOADING_PER_10K: f64 = 0.05;

pub struct WarrantyService;

impl WarrantyService {
    pub fn quote(
        snapshot: &VehicleSnapshot,
        provider: &ProviderRecord,
        tier: CoverageTier,
        term_months: u32,
        now: DateTime<Utc>,
        policy: &PricingPolicy,
    ) -> Result<WarrantyQuote, CoreError> {
        if term_months == 0 || term_months > MAX_TERM_MONTHS {
            return Err(CoreError::Validation(format!(
                "term must be between 1 and {MAX_TERM_MONTHS} months, got {term_months}"
            )));
        }

        let terms = provider.terms_for(tier);
        Ok(WarrantyQuote {
            vehicle_id: None,
            provider_id: None,
            price: Self::premium(snapshot, tier, term_months, now.year()),
            deductible: policy.warranty_deductible,
            term_months,
            coverage_details: CoverageDetails {
                coverage_type: tier,
                included_components: terms.included_components,
                exclusions: terms.exclusions,
            },
            expiry_date: now + Duration::days(policy.offer_validity_days),
        })
    }

    /// Premium for the whole term. Next-year models are priced as new.
    pub fn premium(
        snapshot: &VehicleSnapshot,
        tier: CoverageTier,
        term_months: u32,
        current_year: i32,
    ) -> f64 {
        let age = snapshot.age(current_year).max(0);
        let age_multiplier = f64::from(age) * AGE_LOADING;
        let mileage_multiplier = f64::from(snapshot.mileage) / 10_000.0 * MILEAGE_LOADING_PER_10K;
        let term_multiplier = f64::from(term_months) / 12.0;
        round_money(
            WARRANTY_BASE_PRICE
                * (1.0 + age_multiplier)
                * (1.0 + mileage_multiplier)
                * Self::coverage_multiplier(tier)
                * term_multiplier,
        )
    }

    pub fn coverage_multiplier(tier: CoverageTier) -> f64 {
        match tier {
            CoverageTier::Platinum => 1.5,
            CoverageTier::Premium => 1.2,
            CoverageTier::Standard => 1.0,
        }
    }
}
