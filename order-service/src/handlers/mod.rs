//! HTTP handlers for the order service.

pub mod auth;
pub mod metrics;
pub mod orders;

pub use auth::*;
pub use metrics::*;
pub use orders::*;
