use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, info_span, warn};

use autovalue_config::Config;
use autovalue_core::{
    Clock, CoreError, DepreciationService, Filter, MarketTrendService, PricingPolicy,
    RecordStore, TradeInInput, TradeInService, TransportRequest, TransportService,
    WarrantyService,
};
use autovalue_domain::{
    Condition, CoverageTier, Displayable, DistanceSource, MarketTrendSummary, PriceSample,
    ProfileRecord, ProviderRecord, TransportType, VehicleRecord,
};

use super::{
    requests::{
        decode, DepreciationRequest, MarketAnalysisRequest, TradeInRequest,
        TransportBookingRequest, WarrantyRequest,
    },
    ApiRequest, ApiResponse, Method, Operation,
};
use crate::errors::{ApiError, Result};

const VEHICLES: &str = "vehicles";
const PROVIDERS: &str = "warranty_providers";
const PROFILES: &str = "profiles";
const PRICE_HISTORY: &str = "price_history";

/// Row of the `price_history` table.
#[derive(Debug, Clone, Deserialize)]
struct PriceHistoryRow {
    price: f64,
    recorded_at: DateTime<Utc>,
    #[serde(default)]
    days_listed: Option<u32>,
}

impl From<PriceHistoryRow> for PriceSample {
    fn from(row: PriceHistoryRow) -> Self {
        PriceSample {
            price: row.price,
            recorded_at: row.recorded_at,
            days_listed: row.days_listed,
        }
    }
}

/// Request handlers for the five pricing operations.
///
/// The store and clock are injected per instance; nothing here is process-wide.
pub struct PricingApi {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    policy: PricingPolicy,
}

impl PricingApi {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self::with_policy(store, clock, policy_from_config(config))
    }

    pub fn with_policy(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        policy: PricingPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Runs a request to completion. Failures come back as error envelopes, never panics.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let span = info_span!("pricing_request", operation = %request.operation);
        let _entered = span.enter();

        if request.method == Method::Options {
            return ApiResponse::preflight();
        }

        match self.dispatch(request.operation, &request.body) {
            Ok(data) => {
                info!(status = 200, "request completed");
                ApiResponse::ok(data)
            }
            Err(err) => {
                if err.is_client_error() {
                    warn!(status = err.status(), error = %err, "request rejected");
                } else {
                    error!(status = err.status(), error = %err, "request failed");
                }
                ApiResponse::error(&err)
            }
        }
    }

    pub fn dispatch(&self, operation: Operation, body: &Value) -> Result<Value> {
        match operation {
            Operation::DepreciationForecast => self.depreciation_forecast(&decode(body)?),
            Operation::TradeInValuation => self.trade_in_valuation(&decode(body)?),
            Operation::WarrantyQuote => self.warranty_quote(&decode(body)?),
            Operation::MarketAnalysis => self.market_analysis(&decode(body)?),
            Operation::TransportBooking => self.transport_booking(&decode(body)?),
        }
    }

    pub fn depreciation_forecast(&self, request: &DepreciationRequest) -> Result<Value> {
        request.validate()?;
        let vehicle: VehicleRecord = self.fetch(VEHICLES, "vehicle", &request.vehicle_id)?;
        let snapshot = vehicle.snapshot();
        if !snapshot.has_plausible_year(self.clock.current_year()) {
            return Err(ApiError::Validation(format!(
                "vehicle `{}` has implausible year {}",
                vehicle.id, vehicle.year
            )));
        }

        let forecast =
            DepreciationService::forecast(&snapshot, self.clock.now())?.with_vehicle(&vehicle.id);
        info!(
            vehicle = %vehicle.display_label(),
            optimal_sell_year = ?forecast.optimal_sell_year,
            "depreciation forecast computed"
        );
        self.persist(Operation::DepreciationForecast, &forecast)
    }

    pub fn trade_in_valuation(&self, request: &TradeInRequest) -> Result<Value> {
        request.validate(self.clock.current_year())?;
        let input = TradeInInput {
            year: request.vehicle_details.year,
            mileage: request.mileage(),
            condition: Condition::from_label(&request.condition),
            notes: request.notes.clone(),
        };
        let offer = TradeInService::offer(&input, self.clock.now(), &self.policy)?;

        let mut record = to_record(&offer)?;
        record["vehicleDetails"] = json!({
            "year": input.year,
            "mileage": input.mileage,
        });
        if let Some(vehicle_id) = &request.vehicle_id {
            record["vehicleId"] = json!(vehicle_id);
        }
        if let Some(user_id) = &request.user_id {
            record["userId"] = json!(user_id);
        }
        self.insert(Operation::TradeInValuation, record)
    }

    pub fn warranty_quote(&self, request: &WarrantyRequest) -> Result<Value> {
        request.validate()?;
        let vehicle: VehicleRecord = self.fetch(VEHICLES, "vehicle", &request.vehicle_id)?;
        let provider: ProviderRecord =
            self.fetch(PROVIDERS, "warranty provider", &request.provider_id)?;

        let quote = WarrantyService::quote(
            &vehicle.snapshot(),
            &provider,
            CoverageTier::from_label(&request.coverage_type),
            request.term_months,
            self.clock.now(),
            &self.policy,
        )?
        .for_vehicle(&vehicle.id, &provider.id);
        info!(
            provider = %provider.name,
            monthly = quote.monthly_cost(),
            "warranty quote priced"
        );
        self.persist(Operation::WarrantyQuote, &quote)
    }

    pub fn market_analysis(&self, request: &MarketAnalysisRequest) -> Result<Value> {
        request.validate()?;
        let rows = self
            .store
            .select_all(PRICE_HISTORY, &market_filter(request))?;

        let total = rows.len();
        let samples: Vec<PriceSample> = rows
            .into_iter()
            .filter_map(|row| serde_json::from_value::<PriceHistoryRow>(row).ok())
            .map(PriceSample::from)
            .collect();
        if samples.len() < total {
            warn!(
                skipped = total - samples.len(),
                "ignoring malformed price history rows"
            );
        }

        let summary = MarketTrendService::summarize(&samples);
        let record = json!({
            "query": {
                "vehicleType": request.vehicle_type,
                "make": request.make,
                "model": request.model,
                "yearRange": request.year_range,
                "region": request.region,
            },
            "trendData": trend_data(&summary),
        });
        self.insert(Operation::MarketAnalysis, record)
    }

    pub fn transport_booking(&self, request: &TransportBookingRequest) -> Result<Value> {
        let now = self.clock.now();
        request.validate(now.date_naive())?;
        let vehicle: VehicleRecord = self.fetch(VEHICLES, "vehicle", &request.vehicle_id)?;
        let _buyer: ProfileRecord = self.fetch(PROFILES, "buyer", &request.buyer_id)?;
        let _seller: ProfileRecord = self.fetch(PROFILES, "seller", &request.seller_id)?;

        let booking = TransportService::estimate(
            &TransportRequest {
                pickup: request.pickup.clone(),
                delivery: request.delivery.clone(),
                transport_type: TransportType::from_label(&request.transport_type),
                preferred_date: request.preferred_date,
            },
            now,
            &self.policy,
        )?;
        if booking.distance_source == DistanceSource::Fallback {
            warn!(
                miles = booking.distance_miles,
                "pickup or delivery lacks coordinates; using fallback distance"
            );
        }

        let mut record = to_record(&booking)?;
        record["vehicleId"] = json!(vehicle.id);
        record["buyerId"] = json!(request.buyer_id);
        record["sellerId"] = json!(request.seller_id);
        self.insert(Operation::TransportBooking, record)
    }

    fn fetch<T: DeserializeOwned>(&self, table: &str, kind: &str, id: &str) -> Result<T> {
        let row = self
            .store
            .select(table, &Filter::by_id(id))?
            .ok_or_else(|| CoreError::not_found(kind, id))?;
        serde_json::from_value(row)
            .map_err(|err| ApiError::Store(format!("{kind} `{id}` is malformed: {err}")))
    }

    fn persist<T: Serialize>(&self, operation: Operation, value: &T) -> Result<Value> {
        self.insert(operation, to_record(value)?)
    }

    fn insert(&self, operation: Operation, record: Value) -> Result<Value> {
        let stored = self
            .store
            .insert(operation.table(), record, self.clock.now())?;
        info!(table = operation.table(), "estimate stored");
        Ok(stored)
    }
}

/// Maps the persisted settings onto the calculators' policy.
pub fn policy_from_config(config: &Config) -> PricingPolicy {
    let pricing = &config.pricing;
    PricingPolicy {
        offer_validity_days: pricing.offer_validity_days,
        clamp_negative_offers: pricing.clamp_negative_offers,
        warranty_deductible: pricing.warranty_deductible,
        fallback_distance_miles: pricing.fallback_distance_miles,
        insurance_floor: pricing.insurance_floor,
        insurance_provider: pricing.insurance_provider.clone(),
    }
}

fn to_record<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|err| ApiError::Store(err.to_string()))
}

fn market_filter(request: &MarketAnalysisRequest) -> Filter {
    let mut filter = Filter::new();
    let text_fields = [
        ("vehicle_type", &request.vehicle_type),
        ("make", &request.make),
        ("model", &request.model),
        ("region", &request.region),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
            filter = filter.matches_text(field, value);
        }
    }
    if let Some(range) = request.year_range {
        filter = filter
            .gte("year", f64::from(range.min))
            .lte("year", f64::from(range.max));
    }
    filter
}

/// Nests the summary as `{trends, stats, sampleSize}`.
fn trend_data(summary: &MarketTrendSummary) -> Value {
    json!({
        "trends": {
            "trendDirection": summary.trend_direction,
            "quarterlyChange": summary.quarterly_change,
            "seasonalFactors": summary.seasonal_factors,
        },
        "stats": {
            "medianPrice": summary.median_price,
            "priceVolatility": summary.price_volatility,
            "listingDurationStats": summary.listing_duration_stats,
            "demandIndex": summary.demand_index,
        },
        "sampleSize": summary.sample_size,
    })
}
