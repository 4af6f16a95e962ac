#![doc(test(attr(deny(warnings))))]

//! autovalue prices used vehicles: five-year depreciation forecasts, instant trade-in
//! offers, extended warranty quotes, market trend summaries and transport estimates.
//!
//! [`api::PricingApi`] is the request boundary; the `autovalue_cli` binary drives it
//! against a JSON record store.

pub mod api;
pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(utils::DEFAULT_LOG_FILTER);
}

/// Initializes global tracing once; later calls are no-ops. `RUST_LOG` still wins over `filter`.
pub fn init_with_filter(filter: &str) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(Some(filter));
        tracing::debug!("autovalue tracing initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init_with_filter("autovalue=debug");
    }
}
