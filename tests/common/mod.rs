#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use autovalue::api::PricingApi;
use autovalue_config::Config;
use autovalue_core::{FixedClock, MemoryRecordStore};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(2025, 6, 1))
}

pub fn vehicles() -> Vec<Value> {
    vec![
        json!({"id": "veh-outback", "price": 24000.0, "year": 2020, "mileage": 10000,
               "condition": "good", "make": "Subaru", "model": "Outback", "type": "wagon"}),
        json!({"id": "veh-civic", "price": 22000.0, "year": 2020, "mileage": 50000,
               "condition": "good", "make": "Honda", "model": "Civic", "type": "sedan"}),
    ]
}

pub fn providers() -> Vec<Value> {
    vec![json!({
        "id": "prov-shield",
        "name": "Shield Auto",
        "coverage": {
            "premium": {
                "included_components": ["engine", "transmission", "electrical"],
                "exclusions": ["wear items"]
            }
        }
    })]
}

pub fn profiles() -> Vec<Value> {
    vec![
        json!({"id": "buyer-1", "full_name": "Avery Buyer"}),
        json!({"id": "seller-1", "full_name": "Sam Seller"}),
    ]
}

pub fn price_history() -> Vec<Value> {
    vec![
        json!({"make": "Honda", "model": "Civic", "vehicle_type": "sedan", "year": 2019,
               "region": "west", "price": 18000.0, "recorded_at": "2025-01-15T00:00:00Z", "days_listed": 30}),
        json!({"make": "Honda", "model": "Civic", "vehicle_type": "sedan", "year": 2020,
               "region": "west", "price": 20000.0, "recorded_at": "2025-05-10T00:00:00Z", "days_listed": 20}),
        json!({"make": "Honda", "model": "Civic", "vehicle_type": "sedan", "year": 2021,
               "region": "west", "price": "not a number", "recorded_at": "2025-05-11T00:00:00Z"}),
        json!({"make": "Toyota", "model": "Camry", "vehicle_type": "sedan", "year": 2020,
               "region": "west", "price": 21000.0, "recorded_at": "2025-05-12T00:00:00Z", "days_listed": 15}),
        json!({"make": "Honda", "model": "Accord", "vehicle_type": "sedan", "year": 2012,
               "region": "east", "price": 9000.0, "recorded_at": "2025-05-12T00:00:00Z", "days_listed": 60}),
    ]
}

/// In-memory store holding every lookup table the operations read.
pub fn seeded_store() -> Arc<MemoryRecordStore> {
    Arc::new(
        MemoryRecordStore::new()
            .with_rows("vehicles", vehicles())
            .with_rows("warranty_providers", providers())
            .with_rows("profiles", profiles())
            .with_rows("price_history", price_history()),
    )
}

pub fn api_over(store: Arc<MemoryRecordStore>) -> PricingApi {
    PricingApi::new(store, clock(), &Config::default())
}

/// Writes each seeded table as a JSON array under `<home>/data`.
pub fn seed_json_home(home: &std::path::Path) {
    let data = home.join("data");
    std::fs::create_dir_all(&data).expect("create data dir");
    for (table, rows) in [
        ("vehicles", vehicles()),
        ("warranty_providers", providers()),
        ("profiles", profiles()),
        ("price_history", price_history()),
    ] {
        let text = serde_json::to_string_pretty(&rows).expect("serialize rows");
        std::fs::write(data.join(format!("{table}.json")), text).expect("write table");
    }
}
