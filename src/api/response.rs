use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
];

/// `{success, data?, error?}` body shared by every operation.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self::with_body(
            200,
            Envelope {
                success: true,
                data: Some(data),
                error: None,
            },
        )
    }

    pub fn error(err: &ApiError) -> Self {
        Self::with_body(
            err.status(),
            Envelope {
                success: false,
                data: None,
                error: Some(err.to_string()),
            },
        )
    }

    /// CORS preflight: headers only, empty body.
    pub fn preflight() -> Self {
        Self {
            status: 200,
            headers: cors_headers(),
            body: None,
        }
    }

    fn with_body(status: u16, envelope: Envelope) -> Self {
        let mut headers = cors_headers();
        headers.push(("Content-Type".into(), "application/json".into()));
        Self {
            status,
            headers,
            body: serde_json::to_value(envelope).ok(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `data` payload of a successful response.
    pub fn data(&self) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get("data"))
    }

    pub fn error_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| body.get("error"))
            .and_then(Value::as_str)
    }
}

fn cors_headers() -> Vec<(String, String)> {
    CORS_HEADERS
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
