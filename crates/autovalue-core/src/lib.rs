//! autovalue-core
//!
//! Pricing calculators and the store abstraction for autovalue.
//! Depends on autovalue-domain. No CLI, no terminal I/O, no filesystem access.

pub mod depreciation_service;
pub mod error;
pub mod geo;
pub mod market_trend_service;
pub mod policy;
pub mod storage;
pub mod time;
pub mod trade_in_service;
pub mod transport_service;
pub mod warranty_service;

pub use depreciation_service::*;
pub use error::CoreError;
pub use market_trend_service::*;
pub use policy::PricingPolicy;
pub use storage::{Filter, MemoryRecordStore, Predicate, RecordStore};
pub use time::{Clock, FixedClock, SystemClock};
pub use trade_in_service::*;
pub use transport_service::*;
pub use warranty_service::*;
