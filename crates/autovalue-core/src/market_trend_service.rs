//! Aggregates historical listing prices into trend statistics.

use std::collections::BTreeMap;

use chrono::Duration;

use autovalue_domain::{
    round_money, ListingDurationStats, MarketTrendSummary, PriceSample, Season, TrendDirection,
};

/// Quarterly change reported when there is not enough history to measure one.
pub const BASELINE_QUARTERLY_CHANGE: f64 = 0.02;
pub const BASELINE_DEMAND_INDEX: f64 = 1.0;
/// Changes within this band either way count as a stable market.
pub const TREND_THRESHOLD: f64 = 0.02;
const QUARTER_DAYS: i64 = 91;
/// Listings that sell in this many days score a demand index of 1.0.
const TYPICAL_DAYS_ON_MARKET: f64 = 30.0;
const MAX_DEMAND_INDEX: f64 = 2.0;

pub struct MarketTrendService;

impl MarketTrendService {
    pub fn summarize(samples: &[PriceSample]) -> MarketTrendSummary {
        let prices: Vec<f64> = samples
            .iter()
            .map(|sample| sample.price)
            .filter(|price| price.is_finite())
            .collect();
        let quarterly_change =
            Self::quarterly_change(samples).unwrap_or(BASELINE_QUARTERLY_CHANGE);
        let durations: Vec<f64> = samples
            .iter()
            .filter_map(|sample| sample.days_listed.map(f64::from))
            .collect();
        let listing_duration_stats = ListingDurationStats {
            mean: mean(&durations).unwrap_or(0.0),
            median: median(&durations).unwrap_or(0.0),
        };

        MarketTrendSummary {
            trend_direction: Self::direction(quarterly_change),
            quarterly_change,
            seasonal_factors: Self::seasonal_factors(samples),
            median_price: median(&prices).map(round_money).unwrap_or(0.0),
            price_volatility: coefficient_of_variation(&prices),
            demand_index: Self::demand_index(&durations),
            listing_duration_stats,
            sample_size: samples.len(),
        }
    }

    pub fn baseline_seasonal_factors() -> BTreeMap<Season, f64> {
        BTreeMap::from([
            (Season::Spring, 1.05),
            (Season::Summer, 1.02),
            (Season::Fall, 0.98),
            (Season::Winter, 0.95),
        ])
    }

    pub fn direction(quarterly_change: f64) -> TrendDirection {
        if quarterly_change > TREND_THRESHOLD {
            TrendDirection::Rising
        } else if quarterly_change < -TREND_THRESHOLD {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }

    /// Mean price of the latest quarter relative to the quarter before it.
    /// `None` unless both quarters hold samples and the earlier mean is positive.
    pub fn quarterly_change(samples: &[PriceSample]) -> Option<f64> {
        let newest = samples.iter().map(|sample| sample.recorded_at).max()?;
        let quarter = Duration::days(QUARTER_DAYS);
        let recent_start = newest - quarter;
        let prior_start = recent_start - quarter;

        let recent: Vec<f64> = samples
            .iter()
            .filter(|sample| sample.recorded_at > recent_start)
            .map(|sample| sample.price)
            .collect();
        let prior: Vec<f64> = samples
            .iter()
            .filter(|sample| sample.recorded_at > prior_start && sample.recorded_at <= recent_start)
            .map(|sample| sample.price)
            .collect();

        let recent_mean = mean(&recent)?;
        let prior_mean = mean(&prior)?;
        if prior_mean <= 0.0 {
            return None;
        }
        Some((recent_mean - prior_mean) / prior_mean)
    }

    /// Seasonal mean over overall mean; seasons without samples keep their baseline.
    pub fn seasonal_factors(samples: &[PriceSample]) -> BTreeMap<Season, f64> {
        let mut factors = Self::baseline_seasonal_factors();
        let all: Vec<f64> = samples.iter().map(|sample| sample.price).collect();
        let overall = match mean(&all) {
            Some(value) if value > 0.0 => value,
            _ => return factors,
        };

        let mut by_season: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
        for sample in samples {
            by_season.entry(sample.season()).or_default().push(sample.price);
        }
        for (season, prices) in by_season {
            if let Some(season_mean) = mean(&prices) {
                factors.insert(season, season_mean / overall);
            }
        }
        factors
    }

    pub fn demand_index(durations: &[f64]) -> f64 {
        match mean(durations) {
            None => BASELINE_DEMAND_INDEX,
            Some(days) if days <= 0.0 => MAX_DEMAND_INDEX,
            Some(days) => (TYPICAL_DAYS_ON_MARKET / days).clamp(0.0, MAX_DEMAND_INDEX),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation over the mean; zero when the mean is not positive.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let Some(avg) = mean(values) else {
        return 0.0;
    };
    if avg <= 0.0 {
        return 0.0;
    }
    let squared_deviations: f64 = values.iter().map(|value| (value - avg).powi(2)).sum();
    let variance = squared_deviations / values.len() as f64;
    variance.sqrt() / avg
}
