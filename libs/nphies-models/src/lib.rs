//! NPHIES data models
//!
//! Strongly-typed projections of the FHIR resources exchanged with the Saudi
//! NPHIES clearinghouse, plus the wire-level Bundle used for acknowledgements.
//!
//! # Module Organization
//!
//! - `message_type`: the closed set of NPHIES message events
//! - `datatypes`: shared value types (Coding, Reference, Money, Identifier, ...)
//! - `patient`, `organization`, `coverage`, `claim`, `eligibility`,
//!   `communication`, `clinical`: canonical resource records
//! - `header`: the MessageHeader projection
//! - `extracted`: the per-bundle `ExtractedData` snapshot
//! - `bundle`: outbound Bundle model
//!
//! # Example
//!
//! ```rust
//! use nphies_models::{MessageType, Reference};
//!
//! let message_type: MessageType = "eligibility-request".parse().unwrap();
//! assert_eq!(message_type, MessageType::EligibilityRequest);
//!
//! let patient = Reference::new("Patient/123");
//! assert_eq!(patient.local_id(), Some("123"));
//! ```

pub mod bundle;
pub mod claim;
pub mod clinical;
pub mod communication;
pub mod coverage;
pub mod datatypes;
pub mod eligibility;
pub mod error;
pub mod extracted;
pub mod header;
pub mod message_type;
pub mod organization;
pub mod patient;

// Re-export commonly used types
pub use bundle::*;
pub use claim::*;
pub use clinical::*;
pub use communication::*;
pub use coverage::*;
pub use datatypes::*;
pub use eligibility::*;
pub use error::{Error, Result};
pub use extracted::*;
pub use header::*;
pub use message_type::*;
pub use organization::*;
pub use patient::*;
