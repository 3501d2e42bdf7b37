pub mod metrics;
pub mod nphies;
