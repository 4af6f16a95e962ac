//! Transport-agnostic request boundary: parses a request, runs one calculator,
//! persists the estimate, and renders the JSON envelope.

pub mod handlers;
pub mod requests;
pub mod response;

use std::{fmt, str::FromStr};

use serde_json::Value;

use crate::errors::{ApiError, Result};

pub use handlers::PricingApi;
pub use response::ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Options,
}

impl FromStr for Method {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "POST" => Ok(Method::Post),
            "OPTIONS" => Ok(Method::Options),
            other => Err(ApiError::MethodNotAllowed(format!(
                "`{other}` is not supported; use POST"
            ))),
        }
    }
}

/// The five pricing operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DepreciationForecast,
    TradeInValuation,
    WarrantyQuote,
    MarketAnalysis,
    TransportBooking,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::DepreciationForecast,
        Operation::TradeInValuation,
        Operation::WarrantyQuote,
        Operation::MarketAnalysis,
        Operation::TransportBooking,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::DepreciationForecast => "depreciation-forecast",
            Operation::TradeInValuation => "trade-in-valuation",
            Operation::WarrantyQuote => "warranty-quote",
            Operation::MarketAnalysis => "market-analysis",
            Operation::TransportBooking => "transport-booking",
        }
    }

    /// Table the operation's result is written to.
    pub fn table(self) -> &'static str {
        match self {
            Operation::DepreciationForecast => "depreciation_forecasts",
            Operation::TradeInValuation => "trade_in_offers",
            Operation::WarrantyQuote => "warranty_quotes",
            Operation::MarketAnalysis => "market_analyses",
            Operation::TransportBooking => "transport_bookings",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Operation::ALL
            .into_iter()
            .find(|operation| operation.name() == normalized)
            .ok_or_else(|| ApiError::NotFound(format!("unknown operation `{}`", value.trim())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub operation: Operation,
    pub body: Value,
}

impl ApiRequest {
    pub fn post(operation: Operation, body: Value) -> Self {
        Self {
            method: Method::Post,
            operation,
            body,
        }
    }

    pub fn preflight(operation: Operation) -> Self {
        Self {
            method: Method::Options,
            operation,
            body: Value::Null,
        }
    }

    /// Builds a request from raw parts. An empty body is only accepted for OPTIONS.
    pub fn from_parts(method: &str, operation: &str, body: &str) -> Result<Self> {
        let method = method.parse::<Method>()?;
        let operation = operation.parse::<Operation>()?;
        let body = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body)
                .map_err(|err| ApiError::Validation(format!("request body is not JSON: {err}")))?
        };
        Ok(Self {
            method,
            operation,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_parse_with_either_separator() {
        assert_eq!(
            "trade_in_valuation".parse::<Operation>().unwrap(),
            Operation::TradeInValuation
        );
        assert_eq!(
            " Market-Analysis ".parse::<Operation>().unwrap(),
            Operation::MarketAnalysis
        );
        assert!(matches!(
            "appraisal".parse::<Operation>(),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn only_post_and_options_are_accepted() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("OPTIONS".parse::<Method>().unwrap(), Method::Options);
        let err = "GET".parse::<Method>().unwrap_err();
        assert_eq!(err.status(), 405);
    }

    #[test]
    fn from_parts_rejects_malformed_json() {
        let err = ApiRequest::from_parts("POST", "warranty-quote", "{not json").unwrap_err();
        assert_eq!(err.status(), 400);
        let preflight = ApiRequest::from_parts("OPTIONS", "warranty-quote", "").unwrap();
        assert_eq!(preflight.body, Value::Null);
    }
}
