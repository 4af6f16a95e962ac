pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_FILTER: &str = "autovalue=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins over `filter`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let fallback = filter.unwrap_or(DEFAULT_LOG_FILTER);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
