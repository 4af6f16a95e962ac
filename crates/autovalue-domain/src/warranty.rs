//! Extended warranty plans and quotes.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize,
};

use crate::common::Money;

/// Warranty plan level. Higher tiers cover more components and cost more.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoverageTier {
    Platinum,
    Premium,
    #[default]
    Standard,
}

impl CoverageTier {
    const LABELS: &'static [&'static str] = &["platinum", "premium", "standard"];

    /// Exact tier label, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "platinum" => Some(CoverageTier::Platinum),
            "premium" => Some(CoverageTier::Premium),
            "standard" => Some(CoverageTier::Standard),
            _ => None,
        }
    }

    /// Parses a requested tier. Unknown labels are quoted as standard coverage.
    pub fn from_label(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoverageTier::Platinum => "platinum",
            CoverageTier::Premium => "premium",
            CoverageTier::Standard => "standard",
        }
    }

    /// Built-in component list used when a provider does not publish its own.
    pub fn default_components(self) -> BTreeSet<String> {
        let mut components = vec!["engine", "transmission", "drivetrain"];
        if matches!(self, CoverageTier::Premium | CoverageTier::Platinum) {
            components.extend(["electrical", "air conditioning", "steering"]);
        }
        if self == CoverageTier::Platinum {
            components.extend(["suspension", "fuel system", "navigation", "roadside assistance"]);
        }
        components.into_iter().map(String::from).collect()
    }

    pub fn default_exclusions(self) -> BTreeSet<String> {
        let mut exclusions = vec!["wear items", "cosmetic damage", "routine maintenance"];
        if self == CoverageTier::Standard {
            exclusions.extend(["electrical", "air conditioning"]);
        }
        exclusions.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for CoverageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CoverageTier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stored data is strict so an unknown provider tier cannot shadow a real one.
        let label = String::deserialize(deserializer)?;
        CoverageTier::parse(&label)
            .ok_or_else(|| <D::Error as de::Error>::unknown_variant(&label, CoverageTier::LABELS))
    }
}

/// Components a provider covers (and excludes) for one tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CoverageTerms {
    #[serde(default)]
    pub included_components: BTreeSet<String>,
    #[serde(default)]
    pub exclusions: BTreeSet<String>,
}

impl CoverageTerms {
    pub fn builtin(tier: CoverageTier) -> Self {
        Self {
            included_components: tier.default_components(),
            exclusions: tier.default_exclusions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverageDetails {
    #[serde(rename = "type")]
    pub coverage_type: CoverageTier,
    pub included_components: BTreeSet<String>,
    pub exclusions: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    pub price: Money,
    pub deductible: Money,
    pub term_months: u32,
    pub coverage_details: CoverageDetails,
    pub expiry_date: DateTime<Utc>,
}

impl WarrantyQuote {
    pub fn for_vehicle(
        mut self,
        vehicle_id: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> Self {
        self.vehicle_id = Some(vehicle_id.into());
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Premium spread over the term, rounded to cents.
    pub fn monthly_cost(&self) -> f64 {
        if self.term_months == 0 {
            return 0.0;
        }
        (self.price / f64::from(self.term_months) * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_requested_tier_is_standard() {
        assert_eq!(CoverageTier::from_label("gold"), CoverageTier::Standard);
        assert_eq!(CoverageTier::from_label("Platinum"), CoverageTier::Platinum);
        assert_eq!(CoverageTier::parse("gold"), None);
    }

    #[test]
    fn stored_tiers_deserialize_strictly() {
        let tier: CoverageTier = serde_json::from_str("\"Premium\"").unwrap();
        assert_eq!(tier, CoverageTier::Premium);
        assert!(serde_json::from_str::<CoverageTier>("\"gold\"").is_err());
    }

    #[test]
    fn higher_tiers_cover_more_components() {
        let standard = CoverageTier::Standard.default_components();
        let premium = CoverageTier::Premium.default_components();
        let platinum = CoverageTier::Platinum.default_components();
        assert!(standard.is_subset(&premium));
        assert!(premium.is_subset(&platinum));
        assert!(platinum.len() > premium.len());
    }

    #[test]
    fn coverage_type_serializes_as_type_key() {
        let details = CoverageDetails {
            coverage_type: CoverageTier::Premium,
            included_components: BTreeSet::new(),
            exclusions: BTreeSet::new(),
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["type"], "premium");
    }
}
