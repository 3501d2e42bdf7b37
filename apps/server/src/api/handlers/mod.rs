//! Request handlers for API endpoints
//!
//! Handlers coordinate between routes and services, handling:
//! - Request extraction and validation
//! - Service invocation
//! - Response formatting

pub mod bundles;
pub mod metadata;
pub mod metrics;

pub use bundles::*;
pub use metadata::*;
pub use metrics::*;
