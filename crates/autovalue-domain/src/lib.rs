//! autovalue-domain
//!
//! Pure pricing models (vehicle snapshots, forecasts, offers, quotes, market summaries, bookings).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod forecast;
pub mod market;
pub mod offer;
pub mod records;
pub mod transport;
pub mod vehicle;
pub mod warranty;

pub use common::*;
pub use forecast::*;
pub use market::*;
pub use offer::*;
pub use records::*;
pub use transport::*;
pub use vehicle::*;
pub use warranty::*;
