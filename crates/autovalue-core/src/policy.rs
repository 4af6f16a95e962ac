//! Tunable knobs shared by the calculators.

/// Pricing settings the calculators read instead of hard-coding.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Days an instant offer or warranty quote stays valid.
    pub offer_validity_days: i64,
    /// Clamp trade-in factors at zero so offers never go negative.
    pub clamp_negative_offers: bool,
    pub warranty_deductible: f64,
    /// Distance used when a pickup or delivery location has no coordinates.
    pub fallback_distance_miles: f64,
    pub insurance_floor: f64,
    pub insurance_provider: String,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            offer_validity_days: 7,
            clamp_negative_offers: true,
            warranty_deductible: 100.0,
            fallback_distance_miles: 500.0,
            insurance_floor: 50_000.0,
            insurance_provider: "AutoValue Transit Insurance".into(),
        }
    }
}
