//! NPHIES Gateway
//!
//! Receives NPHIES FHIR message bundles and:
//! - Classifies them into one of the twelve NPHIES message types
//! - Extracts patients, claims, coverage and related resources
//! - Fans the extracted data out to the HealthLinc handler services
//! - Answers with an aggregated result and an acknowledgement bundle

#![allow(
    clippy::too_many_arguments,      // Functions with many args are acceptable for domain operations
    clippy::type_complexity,         // Complex types are acceptable when they represent domain concepts
    clippy::large_enum_variant,      // Large enum variants acceptable; boxing may impact performance
    clippy::question_mark,           // let-else vs ? operator is a style preference
    clippy::vec_init_then_push,      // Vec initialization patterns are acceptable
)]

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod response;
pub mod routing;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
