mod common;

use std::sync::Arc;

use autovalue::api::{ApiRequest, Method, Operation, PricingApi};
use autovalue_config::Config;
use autovalue_core::{CoreError, Filter, RecordStore};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use common::{api_over, clock, seeded_store};

fn post(api: &PricingApi, operation: Operation, body: Value) -> (u16, Value) {
    let response = api.handle(&ApiRequest::post(operation, body));
    (response.status, response.body.expect("envelope body"))
}

#[test]
fn depreciation_forecast_is_returned_and_stored() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let (status, body) = post(
        &api,
        Operation::DepreciationForecast,
        json!({"vehicleId": "veh-outback"}),
    );

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    let values: Vec<f64> = data["yearlyValues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![20_400.0, 17_957.0, 16_355.0, 15_399.0, 14_977.0]);
    assert_eq!(data["vehicleId"], "veh-outback");
    assert_eq!(data["confidence"], 0.85);

    let rows = store.rows("depreciation_forecasts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], data["id"]);
    assert_eq!(rows[0]["created_at"], "2025-06-01T12:00:00Z");
    assert_eq!(rows[0]["created_at"], data["generatedAt"]);
}

#[test]
fn unknown_vehicle_is_not_found() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::DepreciationForecast,
        json!({"vehicleId": "veh-missing"}),
    );

    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("veh-missing"));
    assert!(body.get("data").is_none());
}

#[test]
fn trade_in_offer_keeps_request_context() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let (status, body) = post(
        &api,
        Operation::TradeInValuation,
        json!({
            "vehicleDetails": {"year": 2020, "mileage": 30000},
            "condition": "fair",
            "notes": "minor dents",
            "userId": "buyer-1"
        }),
    );

    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["instantOffer"], 4_200.0);
    assert_eq!(data["conditionReport"]["condition"], "fair");
    assert_eq!(data["vehicleDetails"]["mileage"], 30_000);
    assert_eq!(data["userId"], "buyer-1");
    assert_eq!(store.rows("trade_in_offers").len(), 1);
}

#[test]
fn trade_in_rejects_implausible_year() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::TradeInValuation,
        json!({"vehicleDetails": {"year": 1700, "mileage": 10}, "condition": "good"}),
    );
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[test]
fn warranty_quote_uses_provider_terms() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let (status, body) = post(
        &api,
        Operation::WarrantyQuote,
        json!({
            "vehicleId": "veh-civic",
            "providerId": "prov-shield",
            "coverageType": "premium",
            "termMonths": 24
        }),
    );

    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["price"], 4_500.0);
    assert_eq!(data["deductible"], 100.0);
    assert_eq!(data["providerId"], "prov-shield");
    assert_eq!(data["coverageDetails"]["type"], "premium");
    assert_eq!(
        data["coverageDetails"]["exclusions"],
        json!(["wear items"])
    );
    assert_eq!(store.rows("warranty_quotes").len(), 1);
}

#[test]
fn warranty_term_must_be_positive() {
    let store = seeded_store();
    let api = api_over(store.clone());
    let (status, _) = post(
        &api,
        Operation::WarrantyQuote,
        json!({
            "vehicleId": "veh-civic",
            "providerId": "prov-shield",
            "coverageType": "standard",
            "termMonths": 0
        }),
    );
    assert_eq!(status, 400);
    assert!(store.rows("warranty_quotes").is_empty());
}

#[test]
fn warranty_for_unknown_provider_is_not_found() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::WarrantyQuote,
        json!({
            "vehicleId": "veh-civic",
            "providerId": "prov-nobody",
            "coverageType": "standard",
            "termMonths": 12
        }),
    );
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("prov-nobody"));
}

#[test]
fn market_analysis_aggregates_matching_history() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let (status, body) = post(
        &api,
        Operation::MarketAnalysis,
        json!({"make": "honda", "model": "CIVIC", "yearRange": {"min": 2018, "max": 2022}}),
    );

    assert_eq!(status, 200);
    let trend = &body["data"]["trendData"];
    // The malformed 2021 row is skipped; Toyota and the 2012 Accord are filtered out.
    assert_eq!(trend["sampleSize"], 2);
    assert_eq!(trend["stats"]["medianPrice"], 19_000.0);
    assert_eq!(trend["trends"]["trendDirection"], "rising");
    assert_eq!(trend["stats"]["listingDurationStats"]["mean"], 25.0);
    assert_eq!(store.rows("market_analyses").len(), 1);
}

#[test]
fn market_analysis_without_history_reports_baseline() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::MarketAnalysis,
        json!({"make": "Lada"}),
    );

    assert_eq!(status, 200);
    let trend = &body["data"]["trendData"];
    assert_eq!(trend["sampleSize"], 0);
    assert_eq!(trend["trends"]["trendDirection"], "stable");
    assert_eq!(trend["trends"]["quarterlyChange"], 0.02);
    assert_eq!(trend["trends"]["seasonalFactors"]["spring"], 1.05);
    assert_eq!(trend["trends"]["seasonalFactors"]["winter"], 0.95);
}

#[test]
fn transport_booking_falls_back_without_coordinates() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let (status, body) = post(
        &api,
        Operation::TransportBooking,
        json!({
            "vehicleId": "veh-civic",
            "buyerId": "buyer-1",
            "sellerId": "seller-1",
            "pickup": {"address": "Springfield"},
            "delivery": {"address": "Shelbyville"},
            "transportType": "tow"
        }),
    );

    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["cost"], 900.0);
    assert_eq!(data["distanceSource"], "fallback");
    assert_eq!(data["insuranceDetails"]["amount"], 50_000.0);
    assert_eq!(data["status"], "pending");
    assert_eq!(data["buyerId"], "buyer-1");
    assert_eq!(store.rows("transport_bookings").len(), 1);
}

#[test]
fn transport_booking_measures_great_circle_distance() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::TransportBooking,
        json!({
            "vehicleId": "veh-civic",
            "buyerId": "buyer-1",
            "sellerId": "seller-1",
            "pickup": {"latitude": 40.7128, "longitude": -74.0060},
            "delivery": {"latitude": 34.0522, "longitude": -118.2437},
            "transportType": "enclosed",
            "preferredDate": "2025-07-01"
        }),
    );

    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["distanceSource"], "great_circle");
    let miles = data["distanceMiles"].as_f64().unwrap();
    assert!((miles - 2445.0).abs() < 15.0, "{miles}");
    assert_eq!(data["cost"].as_f64().unwrap(), (miles * 2.5).round());
}

#[test]
fn transport_booking_requires_known_parties() {
    let api = api_over(seeded_store());
    let (status, body) = post(
        &api,
        Operation::TransportBooking,
        json!({
            "vehicleId": "veh-civic",
            "buyerId": "buyer-404",
            "sellerId": "seller-1",
            "pickup": {"address": "Springfield"},
            "delivery": {"address": "Shelbyville"},
            "transportType": "open"
        }),
    );
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("buyer"));
}

#[test]
fn missing_body_is_a_validation_error() {
    let api = api_over(seeded_store());
    for operation in Operation::ALL {
        let response = api.handle(&ApiRequest::post(operation, Value::Null));
        assert_eq!(response.status, 400, "{operation}");
    }
}

#[test]
fn preflight_returns_cors_headers_without_body() {
    let store = seeded_store();
    let api = api_over(store.clone());

    let response = api.handle(&ApiRequest::preflight(Operation::WarrantyQuote));

    assert_eq!(response.status, 200);
    assert!(response.body.is_none());
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    assert!(store.rows("warranty_quotes").is_empty());
}

#[test]
fn every_response_carries_cors_headers() {
    let api = api_over(seeded_store());
    let ok = api.handle(&ApiRequest::post(
        Operation::MarketAnalysis,
        json!({}),
    ));
    let failed = api.handle(&ApiRequest::post(
        Operation::DepreciationForecast,
        json!({"vehicleId": "nope"}),
    ));
    for response in [ok, failed] {
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }
}

#[test]
fn raw_requests_map_method_and_operation_errors() {
    let err = ApiRequest::from_parts("DELETE", "warranty-quote", "{}").unwrap_err();
    assert_eq!(err.status(), 405);
    let err = ApiRequest::from_parts("POST", "car-wash", "{}").unwrap_err();
    assert_eq!(err.status(), 404);

    let request = ApiRequest::from_parts(
        "post",
        "depreciation_forecast",
        r#"{"vehicleId": "veh-outback"}"#,
    )
    .unwrap();
    assert_eq!(request.method, Method::Post);
    assert!(api_over(seeded_store()).handle(&request).is_success());
}

struct BrokenStore;

impl RecordStore for BrokenStore {
    fn select(&self, _table: &str, _filter: &Filter) -> Result<Option<Value>, CoreError> {
        Err(CoreError::Store("backend unavailable".into()))
    }

    fn select_all(&self, _table: &str, _filter: &Filter) -> Result<Vec<Value>, CoreError> {
        Err(CoreError::Store("backend unavailable".into()))
    }

    fn insert(
        &self,
        _table: &str,
        _record: Value,
        _now: DateTime<Utc>,
    ) -> Result<Value, CoreError> {
        Err(CoreError::Store("backend unavailable".into()))
    }
}

#[test]
fn store_failures_are_server_errors() {
    let api = PricingApi::new(Arc::new(BrokenStore), clock(), &Config::default());

    let lookup = api.handle(&ApiRequest::post(
        Operation::DepreciationForecast,
        json!({"vehicleId": "veh-outback"}),
    ));
    let write = api.handle(&ApiRequest::post(
        Operation::TradeInValuation,
        json!({"vehicleDetails": {"year": 2020, "mileage": 1000}, "condition": "good"}),
    ));

    for response in [lookup, write] {
        assert_eq!(response.status, 500);
        assert!(response
            .error_message()
            .unwrap()
            .contains("backend unavailable"));
    }
}

#[test]
fn pricing_settings_flow_into_calculations() {
    let mut config = Config::default();
    config.pricing.warranty_deductible = 250.0;
    config.pricing.clamp_negative_offers = false;
    let api = PricingApi::new(seeded_store(), clock(), &config);

    let (_, quote) = post(
        &api,
        Operation::WarrantyQuote,
        json!({"vehicleId": "veh-civic", "providerId": "prov-shield",
               "coverageType": "standard", "termMonths": 12}),
    );
    assert_eq!(quote["data"]["deductible"], 250.0);

    let (_, offer) = post(
        &api,
        Operation::TradeInValuation,
        json!({"vehicleDetails": {"year": 2000, "mileage": 50000}, "condition": "good"}),
    );
    assert_eq!(offer["data"]["instantOffer"], -1_250.0);
}
